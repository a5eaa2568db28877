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

//! Thread scaling flow.
//!
//! Compares parallel runs against the serial implementation across input
//! sizes: time vs size, speedup, throughput and efficiency vs threads.

use crate::console::group_digits;
use crate::series::{ReferenceLine, Series, SeriesIdentity, XAxis};
use crate::types::{Report, RunComparison, RunSummary, ScalingSummary, SizeSummary, Summary};
use parscale_core::{
    collapse_repeats, normalize, overhead_pct, resolve_baseline, AnalysisConfig, BaselinePolicy,
    BenchmarkRecord, GroupKey, Measure, Normalized, NormalizedPoint, RecordSet, SERIAL_ALGORITHM,
};
use tracing::debug;

/// A family of parallel runs: one algorithm variant at one input size.
struct Variant<'a> {
    algorithm: Option<&'a str>,
    n: u64,
    suffix: String,
}

impl Variant<'_> {
    fn group(&self) -> GroupKey {
        let group = GroupKey::new().n(self.n);
        match self.algorithm {
            Some(tag) => group.algorithm(tag),
            None => group,
        }
    }
}

/// Builds the thread scaling report.
///
/// Speedup uses `config.baseline_policy`; efficiency always compares against
/// the variant's own single-thread run. Per-size failures become
/// diagnostics.
///
/// # Example
///
/// ```
/// use parscale_core::{load_from_reader, AnalysisConfig, LoadConfig};
/// use parscale_report::scaling_report;
///
/// let csv = "algorithm,n,threads,time_ms\n\
///            serial,1000000,1,10\n\
///            parallel,1000000,1,12\n\
///            parallel,1000000,4,4\n";
/// let records = load_from_reader(csv.as_bytes(), &LoadConfig::default()).unwrap();
/// let report = scaling_report(&records, &AnalysisConfig::default());
/// let speedup = report.series("speedup_vs_threads/n=1000000").unwrap();
/// assert_eq!(speedup.points, vec![(1.0, 10.0 / 12.0), (4.0, 2.5)]);
/// ```
pub fn scaling_report(records: &RecordSet, config: &AnalysisConfig) -> Report {
    let records = if config.collapse_repeats {
        collapse_repeats(records)
    } else {
        records.clone()
    };

    let mut report = Report::new(
        "Thread Scaling",
        Summary::Scaling(ScalingSummary { sizes: Vec::new() }),
    );
    if records.is_empty() {
        report.add_diagnostic("all records", "no benchmark records to analyze");
        return report;
    }

    let tagged = records.models_algorithm();
    let algorithms: Vec<String> = records
        .algorithms()
        .into_iter()
        .filter(|a| a != SERIAL_ALGORITHM)
        .collect();
    let variants: Vec<Option<&str>> = if tagged {
        algorithms.iter().map(|a| Some(a.as_str())).collect()
    } else {
        vec![None]
    };

    let parallel: RecordSet = records
        .iter()
        .filter(|r| !r.is_algorithm(SERIAL_ALGORITHM))
        .cloned()
        .collect();
    let thread_counts = parallel.thread_counts();
    debug!(
        sizes = records.sizes().len(),
        threads = thread_counts.len(),
        variants = variants.len(),
        "building thread scaling report"
    );

    add_time_vs_size(&mut report, &records, &variants, &thread_counts);

    let mut sizes = Vec::new();
    for n in records.sizes() {
        for algorithm in &variants {
            let suffix = match algorithm {
                Some(tag) if variants.len() > 1 => format!("{}/n={}", tag, n),
                _ => format!("n={}", n),
            };
            let variant = Variant {
                algorithm: *algorithm,
                n,
                suffix,
            };
            if let Some(summary) = add_variant(&mut report, &records, &variant, config) {
                sizes.push(summary);
            }
        }
    }

    if let Some(max) = thread_counts.last().map(|t| f64::from(*t)) {
        let min = thread_counts.first().map_or(1.0, |t| f64::from(*t));
        report.add_series(Series::reference(
            "reference/serial_baseline",
            ReferenceLine::SerialBaseline,
            XAxis::Threads,
            vec![(min, 1.0), (max, 1.0)],
        ));
        report.add_series(Series::reference(
            "reference/ideal_linear",
            ReferenceLine::IdealLinear,
            XAxis::Threads,
            vec![(1.0, 1.0), (max, max)],
        ));
        report.add_series(Series::reference(
            "reference/ideal_efficiency",
            ReferenceLine::IdealEfficiency,
            XAxis::Threads,
            vec![(min, 100.0), (max, 100.0)],
        ));
    }

    report.summary = Summary::Scaling(ScalingSummary { sizes });
    report
}

fn add_time_vs_size(
    report: &mut Report,
    records: &RecordSet,
    variants: &[Option<&str>],
    thread_counts: &[u32],
) {
    let by_size = records.sorted_by_size();

    if records.models_algorithm() {
        let mut serial = Series::new(
            format!("time_vs_size/{}", SERIAL_ALGORITHM),
            "Serial",
            SeriesIdentity::Algorithm(SERIAL_ALGORITHM.to_string()),
            XAxis::InputSize,
        );
        for record in by_size.iter().filter(|r| r.is_algorithm(SERIAL_ALGORITHM)) {
            serial.push(record.n as f64, record.total_ms);
        }
        report.add_series(serial);
    }

    for algorithm in variants {
        for threads in thread_counts {
            let (name, label, identity) = match algorithm {
                Some(tag) => (
                    format!("time_vs_size/{}-{}", tag, threads),
                    format!("{}-{}-threads", capitalize(tag), threads),
                    SeriesIdentity::Algorithm((*tag).to_string()),
                ),
                None => (
                    format!("time_vs_size/{}", threads),
                    format!("{}-threads", threads),
                    SeriesIdentity::Threads(*threads),
                ),
            };
            let mut series = Series::new(name, label, identity, XAxis::InputSize);
            for record in by_size.iter().filter(|r| {
                r.threads == *threads && algorithm.map_or(true, |tag| r.is_algorithm(tag))
            }) {
                series.push(record.n as f64, record.total_ms);
            }
            report.add_series(series);
        }
    }
}

/// Adds the per-size series of one variant and returns its summary.
fn add_variant(
    report: &mut Report,
    records: &RecordSet,
    variant: &Variant<'_>,
    config: &AnalysisConfig,
) -> Option<SizeSummary> {
    let group = variant.group();
    let members = group.members(records).sorted_by_threads();
    if members.is_empty() {
        return None;
    }
    let label = format!("n={}", group_digits(variant.n));

    let mut throughput = Series::new(
        format!("throughput_vs_threads/{}", variant.suffix),
        format!("Parallel {}", label),
        SeriesIdentity::InputSize(variant.n),
        XAxis::Threads,
    );
    for record in &members {
        if let Some(tp) = record.throughput() {
            throughput.push(f64::from(record.threads), tp);
        }
    }
    report.add_series(throughput);

    let speedup = resolve_baseline(records, &group, config.baseline_policy)
        .and_then(|base| Ok((base, normalize(base, &members, Measure::Total)?)));

    let mut summary = SizeSummary {
        n: variant.n,
        baseline: None,
        baseline_ms: None,
        baseline_throughput: None,
        runs: Vec::new(),
    };

    match &speedup {
        Ok((base, normalized)) => {
            summary.baseline = Some(base.config());
            summary.baseline_ms = Some(base.total_ms);
            summary.baseline_throughput = base.throughput();

            report_skipped(report, normalized);
            report.add_series(ratio_series(
                format!("speedup_vs_threads/{}", variant.suffix),
                &label,
                variant.n,
                normalized,
                |p| p.ratio,
            ));

            if let Some(tp) = base.throughput() {
                let xs: Vec<f64> = members.iter().map(|r| f64::from(r.threads)).collect();
                let points = match (xs.first(), xs.last()) {
                    (Some(lo), Some(hi)) => vec![(*lo, tp), (*hi, tp)],
                    _ => Vec::new(),
                };
                report.add_series(Series::reference(
                    format!("reference/serial_throughput/{}", variant.suffix),
                    ReferenceLine::SerialThroughput,
                    XAxis::Threads,
                    points,
                ));
            }
        }
        Err(e) => report.add_diagnostic(group.to_string(), e.to_string()),
    }

    add_efficiency(report, records, variant, &group, &members, &label);

    for record in &members {
        if record.is_algorithm(SERIAL_ALGORITHM) {
            continue;
        }
        summary.runs.push(run_summary(record, speedup.as_ref().ok().map(|(_, n)| n)));
    }

    Some(summary)
}

fn add_efficiency(
    report: &mut Report,
    records: &RecordSet,
    variant: &Variant<'_>,
    group: &GroupKey,
    members: &RecordSet,
    label: &str,
) {
    let result = resolve_baseline(records, group, BaselinePolicy::SingleThread)
        .and_then(|base| normalize(base, members, Measure::Total));
    match result {
        Ok(normalized) => report.add_series(ratio_series(
            format!("efficiency_vs_threads/{}", variant.suffix),
            label,
            variant.n,
            &normalized,
            |p| p.efficiency,
        )),
        Err(e) => report.add_diagnostic(format!("{} (efficiency)", group), e.to_string()),
    }
}

fn ratio_series(
    name: String,
    label: &str,
    n: u64,
    normalized: &Normalized,
    y: impl Fn(&NormalizedPoint) -> f64,
) -> Series {
    let mut series = Series::new(name, label, SeriesIdentity::InputSize(n), XAxis::Threads);
    for point in &normalized.points {
        series.push(f64::from(point.threads()), y(point));
    }
    series
}

fn report_skipped(report: &mut Report, normalized: &Normalized) {
    for skipped in &normalized.skipped {
        report.add_diagnostic(skipped.candidate.to_string(), skipped.error.to_string());
    }
}

fn run_summary(record: &BenchmarkRecord, speedup: Option<&Normalized>) -> RunSummary {
    let config = record.config();
    let comparison = speedup
        .and_then(|n| n.points.iter().find(|p| p.candidate == config))
        .map(|p| match overhead_pct(p.ratio) {
            Some(pct) => RunComparison::Overhead(pct),
            None => RunComparison::Speedup(p.ratio),
        });
    RunSummary {
        config,
        time_ms: record.total_ms,
        throughput: record.throughput(),
        comparison,
    }
}

fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged() -> RecordSet {
        RecordSet::new(vec![
            BenchmarkRecord::new(1_000, 1, 2.0).with_algorithm("serial"),
            BenchmarkRecord::new(1_000, 1, 2.5).with_algorithm("parallel"),
            BenchmarkRecord::new(1_000, 2, 4.0).with_algorithm("parallel"),
            BenchmarkRecord::new(1_000_000, 1, 100.0).with_algorithm("serial"),
            BenchmarkRecord::new(1_000_000, 1, 110.0).with_algorithm("parallel"),
            BenchmarkRecord::new(1_000_000, 2, 55.0).with_algorithm("parallel"),
            BenchmarkRecord::new(1_000_000, 4, 25.0).with_algorithm("parallel"),
        ])
    }

    #[test]
    fn test_speedup_against_serial() {
        let report = scaling_report(&tagged(), &AnalysisConfig::default());
        assert!(report.diagnostics.is_empty());

        let speedup = report.series("speedup_vs_threads/n=1000000").unwrap();
        assert_eq!(speedup.y_at(4.0), Some(4.0));
        assert_eq!(speedup.len(), 3);
        assert!(report.series("reference/serial_baseline").is_some());
        assert_eq!(
            report.series("reference/ideal_linear").unwrap().points,
            vec![(1.0, 1.0), (4.0, 4.0)]
        );
    }

    #[test]
    fn test_efficiency_against_parallel_single_thread() {
        let report = scaling_report(&tagged(), &AnalysisConfig::default());
        let efficiency = report.series("efficiency_vs_threads/n=1000000").unwrap();
        assert_eq!(efficiency.y_at(1.0), Some(100.0));
        assert_eq!(efficiency.y_at(2.0), Some(100.0));
        assert!((efficiency.y_at(4.0).unwrap() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_vs_size_series() {
        let report = scaling_report(&tagged(), &AnalysisConfig::default());
        let serial = report.series("time_vs_size/serial").unwrap();
        assert_eq!(serial.points, vec![(1_000.0, 2.0), (1_000_000.0, 100.0)]);
        let two = report.series("time_vs_size/parallel-2").unwrap();
        assert_eq!(two.label, "Parallel-2-threads");
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn test_summary_reports_overhead_for_slow_runs() {
        let report = scaling_report(&tagged(), &AnalysisConfig::default());
        let Summary::Scaling(summary) = &report.summary else {
            panic!("expected scaling summary");
        };
        assert_eq!(summary.sizes.len(), 2);
        let small = &summary.sizes[0];
        assert_eq!(small.baseline_ms, Some(2.0));
        assert_eq!(small.runs.len(), 2);
        assert_eq!(small.runs[1].comparison, Some(RunComparison::Overhead(100.0)));

        let large = &summary.sizes[1];
        assert_eq!(large.runs[2].comparison, Some(RunComparison::Speedup(4.0)));
    }

    #[test]
    fn test_missing_serial_is_diagnostic_for_that_size_only() {
        let mut rows: Vec<BenchmarkRecord> = tagged().iter().cloned().collect();
        rows.retain(|r| !(r.n == 1_000 && r.is_algorithm("serial")));
        let report = scaling_report(&RecordSet::new(rows), &AnalysisConfig::default());

        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].scope.contains("n=1000"));
        assert!(report.series("speedup_vs_threads/n=1000").is_none());
        assert!(report.series("speedup_vs_threads/n=1000000").is_some());
        // Efficiency only needs the parallel single-thread run.
        assert!(report.series("efficiency_vs_threads/n=1000").is_some());
    }

    #[test]
    fn test_untagged_uses_single_thread_baseline() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(500, 1, 10.0),
            BenchmarkRecord::new(500, 2, 5.0),
        ]);
        let report = scaling_report(&records, &AnalysisConfig::default());
        let speedup = report.series("speedup_vs_threads/n=500").unwrap();
        assert_eq!(speedup.points, vec![(1.0, 1.0), (2.0, 2.0)]);
        assert!(report.series("time_vs_size/2").is_some());
    }
}
