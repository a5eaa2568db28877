// Dweve ParScale - Parallel Scaling Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Record store: CSV benchmark sources into validated [`RecordSet`]s.
//!
//! The header must carry `n`, `threads`, and either `total_ms` or `time_ms`.
//! `algorithm`, the phase columns, `throughput_M_per_sec` and `num_selected`
//! are optional; an empty optional cell is an absent value.
//!
//! # Security
//!
//! Rows are capped by [`LoadConfig::max_rows`] so an unexpectedly large source
//! fails fast instead of exhausting memory.

use crate::config::LoadConfig;
use crate::error::{AnalysisError, Result};
use crate::phase::{Phase, PhaseTimings};
use crate::record::{BenchmarkRecord, RecordSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Column positions resolved from the header row.
#[derive(Debug)]
struct ColumnMap {
    n: usize,
    threads: usize,
    total: (usize, &'static str),
    algorithm: Option<usize>,
    phases: Vec<(Phase, usize)>,
    throughput: Option<usize>,
    num_selected: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| AnalysisError::SourceSchema {
                column: name.to_string(),
            })
        };

        let n = required("n")?;
        let threads = required("threads")?;
        let total = match (position("total_ms"), position("time_ms")) {
            (Some(idx), _) => (idx, "total_ms"),
            (None, Some(idx)) => (idx, "time_ms"),
            (None, None) => {
                return Err(AnalysisError::SourceSchema {
                    column: "total_ms".to_string(),
                })
            }
        };

        let phases = Phase::ALL
            .iter()
            .filter_map(|phase| position(phase.column()).map(|idx| (*phase, idx)))
            .collect();

        Ok(Self {
            n,
            threads,
            total,
            algorithm: position("algorithm"),
            phases,
            throughput: position("throughput_M_per_sec"),
            num_selected: position("num_selected"),
        })
    }
}

/// Loads benchmark records from a CSV file with default settings.
///
/// # Errors
///
/// Returns [`AnalysisError::SourceNotFound`] when `path` does not exist and
/// any load error described in [`load_from_reader`].
pub fn load(path: impl AsRef<Path>) -> Result<RecordSet> {
    load_with_config(path, &LoadConfig::default())
}

/// Loads benchmark records from a CSV file.
pub fn load_with_config(path: impl AsRef<Path>, config: &LoadConfig) -> Result<RecordSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalysisError::from_io(path, e))?;
    let records = load_from_reader(file, config)?;
    debug!(path = %path.display(), rows = records.len(), "loaded benchmark records");
    Ok(records)
}

/// Parses benchmark records from any reader.
///
/// # Errors
///
/// - [`AnalysisError::SourceSchema`] when a required column is missing.
/// - [`AnalysisError::MalformedRecord`] when a value does not parse or is out
///   of its domain, or when the phases exceed the total beyond tolerance.
/// - [`AnalysisError::Csv`] when the CSV layer rejects a row.
/// - [`AnalysisError::TooManyRows`] when `config.max_rows` is exceeded.
///
/// # Example
///
/// ```
/// use parscale_core::{load_from_reader, LoadConfig, Phase};
///
/// let csv = "n,threads,find_furthest_ms,build_linklist_ms,scan_linklist_ms,extract_valid_ms,total_ms\n\
///            1000,1,40,30,20,10,100\n\
///            1000,4,10,9,6,5,30\n";
/// let records = load_from_reader(csv.as_bytes(), &LoadConfig::default()).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records.as_slice()[1].phase(Phase::FindFurthest), Some(10.0));
/// ```
pub fn load_from_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<RecordSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| AnalysisError::Csv {
        line: 1,
        message: e.to_string(),
    })?;
    let columns = ColumnMap::from_headers(headers)?;

    let mut records = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        if row_idx >= config.max_rows {
            return Err(AnalysisError::TooManyRows {
                limit: config.max_rows,
                actual: row_idx + 1,
            });
        }

        let row = result.map_err(|e| AnalysisError::Csv {
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(row_idx as u64 + 2),
            message: e.to_string(),
        })?;

        // Blank lines carry no data.
        if row.iter().all(str::is_empty) {
            continue;
        }

        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(row_idx as u64 + 2);
        records.push(parse_row(&row, &columns, line, config)?);
    }

    Ok(RecordSet::new(records))
}

fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnMap,
    line: u64,
    config: &LoadConfig,
) -> Result<BenchmarkRecord> {
    let field = |idx: usize| row.get(idx).unwrap_or("");

    let n = parse_positive(field(columns.n), "n", line)?;
    let threads = parse_positive(field(columns.threads), "threads", line)?;
    let threads = u32::try_from(threads).map_err(|_| {
        AnalysisError::malformed(line, "threads", field(columns.threads), "thread count too large")
    })?;

    let (total_idx, total_name) = columns.total;
    let total_ms = parse_measurement(field(total_idx), total_name, line)?;

    let mut phases = PhaseTimings::new();
    for (phase, idx) in &columns.phases {
        let raw = field(*idx);
        if raw.is_empty() {
            continue;
        }
        phases.insert(*phase, parse_measurement(raw, phase.column(), line)?);
    }

    if !phases.is_empty() {
        let sum: f64 = phases.values().sum();
        if !config.phase_tolerance.admits(sum, total_ms) {
            return Err(AnalysisError::malformed(
                line,
                "phases",
                format!("{}", sum),
                format!(
                    "phase times exceed {} = {} beyond tolerance of {} ms",
                    total_name,
                    total_ms,
                    config.phase_tolerance.allowance(total_ms)
                ),
            ));
        }
    }

    let mut record = BenchmarkRecord::new(n, threads, total_ms);
    record.phases = phases;
    record.algorithm = columns
        .algorithm
        .map(field)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    record.throughput_m_per_sec = cell(row, columns.throughput)
        .map(|raw| parse_measurement(raw, "throughput_M_per_sec", line))
        .transpose()?;
    record.num_selected = optional::<u64>(row, columns.num_selected, "num_selected", line)?;

    Ok(record)
}

fn parse_positive(raw: &str, field: &str, line: u64) -> Result<u64> {
    let value: i64 = raw
        .parse()
        .map_err(|_| AnalysisError::malformed(line, field, raw, "expected an integer"))?;
    if value <= 0 {
        return Err(AnalysisError::malformed(line, field, raw, "must be positive"));
    }
    Ok(value as u64)
}

fn parse_measurement(raw: &str, field: &str, line: u64) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| AnalysisError::malformed(line, field, raw, "expected a number"))?;
    if !value.is_finite() {
        return Err(AnalysisError::malformed(line, field, raw, "must be finite"));
    }
    if value < 0.0 {
        return Err(AnalysisError::malformed(line, field, raw, "must not be negative"));
    }
    Ok(value)
}

/// Non-empty value of an optional column.
fn cell(row: &csv::StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).filter(|s| !s.is_empty())
}

fn optional<T: FromStr>(
    row: &csv::StringRecord,
    idx: Option<usize>,
    field: &str,
    line: u64,
) -> Result<Option<T>> {
    match cell(row, idx) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AnalysisError::malformed(line, field, raw, "expected a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseTolerance;

    const BREAKDOWN_HEADER: &str =
        "n,threads,find_furthest_ms,build_linklist_ms,scan_linklist_ms,extract_valid_ms,total_ms";

    fn load_str(csv: &str) -> Result<RecordSet> {
        load_from_reader(csv.as_bytes(), &LoadConfig::default())
    }

    #[test]
    fn test_breakdown_rows() {
        let csv = format!("{}\n100,1,40,30,20,10,100\n100,2,20,15,10,5,50\n", BREAKDOWN_HEADER);
        let records = load_str(&csv).unwrap();
        assert_eq!(records.len(), 2);
        let first = &records.as_slice()[0];
        assert_eq!(first.n, 100);
        assert_eq!(first.threads, 1);
        assert_eq!(first.phases.len(), 4);
        assert_eq!(first.phase(Phase::ExtractValid), Some(10.0));
        assert!(first.algorithm.is_none());
    }

    #[test]
    fn test_scaling_rows_use_time_ms() {
        let csv = "algorithm,n,threads,time_ms,num_selected,throughput_M_per_sec\n\
                   serial,1000000,1,12.5,42,80.0\n\
                   parallel,1000000,8,3.1,42,322.58\n";
        let records = load_str(csv).unwrap();
        let parallel = &records.as_slice()[1];
        assert_eq!(parallel.algorithm.as_deref(), Some("parallel"));
        assert_eq!(parallel.total_ms, 3.1);
        assert_eq!(parallel.num_selected, Some(42));
        assert_eq!(parallel.throughput_m_per_sec, Some(322.58));
        assert!(parallel.phases.is_empty());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = " n , threads , total_ms \n 10 , 2 , 5.0 \n";
        let records = load_str(csv).unwrap();
        assert_eq!(records.as_slice()[0].threads, 2);
    }

    #[test]
    fn test_missing_required_column() {
        let err = load_str("n,total_ms\n10,5\n").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::SourceSchema {
                column: "threads".to_string()
            }
        );
    }

    #[test]
    fn test_missing_total_column() {
        let err = load_str("n,threads\n10,1\n").unwrap_err();
        assert!(matches!(err, AnalysisError::SourceSchema { column } if column == "total_ms"));
    }

    #[test]
    fn test_zero_threads_rejected_with_line() {
        let err = load_str("n,threads,total_ms\n10,1,5\n10,0,5\n").unwrap_err();
        match err {
            AnalysisError::MalformedRecord {
                line, field, value, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(field, "threads");
                assert_eq!(value, "0");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_number_rejected() {
        let err = load_str("n,threads,total_ms\nten,1,5\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { field, .. } if field == "n"));
    }

    #[test]
    fn test_negative_and_non_finite_times_rejected() {
        let err = load_str("n,threads,total_ms\n10,1,-1\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { field, .. } if field == "total_ms"));

        let err = load_str("n,threads,total_ms\n10,1,NaN\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));

        let err = load_str("n,threads,total_ms\n10,1,inf\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { .. }));
    }

    #[test]
    fn test_phase_sum_beyond_tolerance_rejected() {
        let csv = format!("{}\n100,1,40,30,20,20,100\n", BREAKDOWN_HEADER);
        let err = load_str(&csv).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { field, .. } if field == "phases"));
    }

    #[test]
    fn test_phase_sum_within_tolerance_accepted() {
        let csv = format!("{}\n100,1,40,30,20,10.5,100\n", BREAKDOWN_HEADER);
        assert_eq!(load_str(&csv).unwrap().len(), 1);

        let strict = LoadConfig::default().with_phase_tolerance(PhaseTolerance::exact());
        assert!(load_from_reader(csv.as_bytes(), &strict).is_err());
    }

    #[test]
    fn test_empty_optional_cells_are_absent() {
        let csv = "algorithm,n,threads,time_ms,num_selected,throughput_M_per_sec\n,10,1,5,,\n";
        let records = load_str(csv).unwrap();
        let record = &records.as_slice()[0];
        assert!(record.algorithm.is_none());
        assert!(record.num_selected.is_none());
        assert!(record.throughput_m_per_sec.is_none());
    }

    #[test]
    fn test_unparseable_optional_rejected() {
        let csv = "n,threads,time_ms,num_selected\n10,1,5,many\n";
        let err = load_str(csv).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRecord { field, .. } if field == "num_selected"));
    }

    #[test]
    fn test_invalid_throughput_rejected() {
        for bad in ["NaN", "inf", "-3.5"] {
            let csv = format!("n,threads,time_ms,throughput_M_per_sec\n10,1,5,{}\n", bad);
            let err = load_str(&csv).unwrap_err();
            assert!(
                matches!(err, AnalysisError::MalformedRecord { ref field, line: 2, .. } if field == "throughput_M_per_sec"),
                "accepted throughput {}",
                bad
            );
        }
        let csv = "n,threads,time_ms,throughput_M_per_sec\n10,1,5,0\n";
        assert_eq!(load_str(csv).unwrap().as_slice()[0].throughput_m_per_sec, Some(0.0));
    }

    #[test]
    fn test_row_limit() {
        let config = LoadConfig::default().with_max_rows(2);
        let csv = "n,threads,total_ms\n1,1,1\n2,1,1\n3,1,1\n";
        let err = load_from_reader(csv.as_bytes(), &config).unwrap_err();
        assert_eq!(err, AnalysisError::TooManyRows { limit: 2, actual: 3 });
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let err = load_str("n,threads,total_ms\n1,1\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Csv { .. }));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let config = LoadConfig::default().with_delimiter(b';');
        let records = load_from_reader("n;threads;total_ms\n5;2;1.5\n".as_bytes(), &config).unwrap();
        assert_eq!(records.as_slice()[0].total_ms, 1.5);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::SourceNotFound { .. }));
        assert_eq!(err.to_string(), "definitely/not/here.csv not found");
    }
}
