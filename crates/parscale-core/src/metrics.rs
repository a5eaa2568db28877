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

//! Derived metrics: speedup, efficiency, phase shares and bottlenecks.
//!
//! Everything here is computed from a (baseline, candidate) pair and is
//! never persisted. [`normalize`] is the single routine behind total-time,
//! per-phase and throughput comparisons.

use crate::baseline::{resolve_baseline, BaselinePolicy};
use crate::error::{AnalysisError, Result};
use crate::phase::Phase;
use crate::query::GroupKey;
use crate::record::{BenchmarkRecord, ConfigKey, RecordSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// The measurement a comparison normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "phase", rename_all = "snake_case")]
pub enum Measure {
    /// Whole-run time; lower is better.
    Total,
    /// One phase's time; lower is better.
    Phase(Phase),
    /// Throughput in M items/s; higher is better.
    Throughput,
}

impl Measure {
    /// Value of this measure on `record`, if present.
    pub fn value(&self, record: &BenchmarkRecord) -> Option<f64> {
        match self {
            Measure::Total => Some(record.total_ms),
            Measure::Phase(phase) => record.phase(*phase),
            Measure::Throughput => record.throughput(),
        }
    }

    /// Source column name, used in diagnostics.
    pub fn field(&self) -> &'static str {
        match self {
            Measure::Total => "total_ms",
            Measure::Phase(phase) => phase.column(),
            Measure::Throughput => "throughput_M_per_sec",
        }
    }

    /// Returns whether larger values are improvements.
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Measure::Throughput)
    }

    /// Improvement ratio of `candidate` over `baseline` (> 1 is better).
    ///
    /// Times compare as `baseline / candidate`, throughput as
    /// `candidate / baseline`. Returns `Ok(None)` when either record lacks
    /// the measure. A zero baseline value, or a zero denominator, fails with
    /// [`AnalysisError::DivisionByZero`] naming the record that holds it.
    pub fn ratio(
        &self,
        baseline: &BenchmarkRecord,
        candidate: &BenchmarkRecord,
    ) -> Result<Option<f64>> {
        let (Some(base), Some(cand)) = (self.value(baseline), self.value(candidate)) else {
            return Ok(None);
        };
        if base == 0.0 {
            return Err(AnalysisError::division_by_zero(baseline.config(), self.field()));
        }
        let (numerator, denominator, holder) = if self.higher_is_better() {
            (cand, base, baseline)
        } else {
            (base, cand, candidate)
        };
        if denominator == 0.0 {
            return Err(AnalysisError::division_by_zero(holder.config(), self.field()));
        }
        Ok(Some(numerator / denominator))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Parallel efficiency as a percentage of linear scaling.
pub fn efficiency(speedup: f64, threads: u32) -> f64 {
    speedup / f64::from(threads) * 100.0
}

/// How much slower than the baseline a run is, in percent.
///
/// Returns `None` when the run is not slower (`speedup >= 1`) or the speedup
/// is not positive.
pub fn overhead_pct(speedup: f64) -> Option<f64> {
    (speedup > 0.0 && speedup < 1.0).then(|| (1.0 / speedup - 1.0) * 100.0)
}

/// Each phase's share of `record.total_ms`, in percent.
///
/// # Errors
///
/// [`AnalysisError::DivisionByZero`] when the record has phases but a zero
/// total.
pub fn percentage_breakdown(record: &BenchmarkRecord) -> Result<BTreeMap<Phase, f64>> {
    if record.phases.is_empty() {
        return Ok(BTreeMap::new());
    }
    if record.total_ms == 0.0 {
        return Err(AnalysisError::division_by_zero(record.config(), "total_ms"));
    }
    Ok(record
        .phases
        .iter()
        .map(|(phase, ms)| (*phase, ms / record.total_ms * 100.0))
        .collect())
}

/// The phase with the largest time; ties go to the earliest canonical phase.
pub fn bottleneck_phase(record: &BenchmarkRecord) -> Option<Phase> {
    let mut best: Option<(Phase, f64)> = None;
    for (phase, ms) in &record.phases {
        match best {
            Some((_, best_ms)) if *ms <= best_ms => {}
            _ => best = Some((*phase, *ms)),
        }
    }
    best.map(|(phase, _)| phase)
}

/// Metrics of one candidate run against its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetric {
    /// Baseline configuration.
    pub baseline: ConfigKey,
    /// Candidate configuration.
    pub candidate: ConfigKey,
    /// Baseline total time in ms.
    pub baseline_total_ms: f64,
    /// Candidate total time in ms.
    pub candidate_total_ms: f64,
    /// `baseline_total_ms / candidate_total_ms`.
    pub speedup: f64,
    /// Speedup per thread, in percent.
    pub efficiency: f64,
    /// Speedup of each phase present in both runs.
    pub phase_speedups: BTreeMap<Phase, f64>,
    /// Candidate phase shares of its total, in percent.
    pub percentage_breakdown: BTreeMap<Phase, f64>,
    /// Candidate's slowest phase.
    pub bottleneck: Option<Phase>,
    /// Phases left out of `phase_speedups` because a time was zero.
    #[serde(skip)]
    pub phase_errors: Vec<AnalysisError>,
}

impl DerivedMetric {
    /// Thread count of the candidate.
    pub fn threads(&self) -> u32 {
        self.candidate.threads
    }

    /// Speedup of one phase, if both runs recorded it.
    pub fn phase_speedup(&self, phase: Phase) -> Option<f64> {
        self.phase_speedups.get(&phase).copied()
    }

    /// Efficiency of one phase, if both runs recorded it.
    pub fn phase_efficiency(&self, phase: Phase) -> Option<f64> {
        self.phase_speedup(phase)
            .map(|s| efficiency(s, self.candidate.threads))
    }

    /// Candidate's share of time spent in `phase`, in percent.
    pub fn phase_share(&self, phase: Phase) -> Option<f64> {
        self.percentage_breakdown.get(&phase).copied()
    }
}

/// Computes every derived metric of `candidate` against `baseline`.
///
/// # Errors
///
/// [`AnalysisError::DivisionByZero`] when either total is zero. A zero phase
/// time only drops that phase; the error lands in
/// [`DerivedMetric::phase_errors`].
///
/// # Example
///
/// ```
/// use parscale_core::{compute, BenchmarkRecord};
///
/// let baseline = BenchmarkRecord::new(10_000_000, 1, 100.0);
/// let candidate = BenchmarkRecord::new(10_000_000, 4, 30.0);
/// let metric = compute(&baseline, &candidate).unwrap();
/// assert!((metric.speedup - 3.333).abs() < 1e-3);
/// assert!((metric.efficiency - 83.33).abs() < 1e-2);
/// ```
pub fn compute(baseline: &BenchmarkRecord, candidate: &BenchmarkRecord) -> Result<DerivedMetric> {
    let speedup = Measure::Total
        .ratio(baseline, candidate)?
        .unwrap_or_default();

    let mut phase_speedups = BTreeMap::new();
    let mut phase_errors = Vec::new();
    for phase in Phase::ALL {
        match Measure::Phase(phase).ratio(baseline, candidate) {
            Ok(Some(ratio)) => {
                phase_speedups.insert(phase, ratio);
            }
            Ok(None) => {}
            Err(error) => phase_errors.push(error),
        }
    }

    Ok(DerivedMetric {
        baseline: baseline.config(),
        candidate: candidate.config(),
        baseline_total_ms: baseline.total_ms,
        candidate_total_ms: candidate.total_ms,
        speedup,
        efficiency: efficiency(speedup, candidate.threads),
        phase_speedups,
        percentage_breakdown: percentage_breakdown(candidate)?,
        bottleneck: bottleneck_phase(candidate),
        phase_errors,
    })
}

/// The metric with the highest speedup; ties go to the lowest thread count.
pub fn best_configuration(metrics: &[DerivedMetric]) -> Option<&DerivedMetric> {
    metrics.iter().fold(None, |best: Option<&DerivedMetric>, m| match best {
        Some(b) if m.speedup < b.speedup => Some(b),
        Some(b) if m.speedup == b.speedup && m.threads() >= b.threads() => Some(b),
        _ => Some(m),
    })
}

/// One successfully normalized candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoint {
    /// Candidate configuration.
    pub candidate: ConfigKey,
    /// Raw value of the measure on the candidate.
    pub value: f64,
    /// Improvement ratio over the baseline.
    pub ratio: f64,
    /// Ratio per thread, in percent.
    pub efficiency: f64,
}

impl NormalizedPoint {
    /// Thread count of the candidate.
    pub fn threads(&self) -> u32 {
        self.candidate.threads
    }
}

/// A candidate left out of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    /// Candidate configuration.
    pub candidate: ConfigKey,
    /// Why it was left out.
    pub error: AnalysisError,
}

/// Outcome of normalizing a set of candidates against one baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// What was compared.
    pub measure: Measure,
    /// Baseline configuration.
    pub baseline: ConfigKey,
    /// Raw baseline value.
    pub baseline_value: f64,
    /// Candidates that produced a ratio, in input order.
    pub points: Vec<NormalizedPoint>,
    /// Candidates whose ratio was undefined.
    pub skipped: Vec<Skipped>,
}

/// Normalizes each candidate's `measure` against `baseline`.
///
/// Candidates lacking the measure contribute nothing. Candidates whose ratio
/// is undefined are returned in [`Normalized::skipped`] and logged.
///
/// # Errors
///
/// [`AnalysisError::NoBaseline`] when the baseline lacks the measure, and
/// [`AnalysisError::DivisionByZero`] when the baseline value is zero.
pub fn normalize<'a, I>(
    baseline: &BenchmarkRecord,
    candidates: I,
    measure: Measure,
) -> Result<Normalized>
where
    I: IntoIterator<Item = &'a BenchmarkRecord>,
{
    let baseline_value = measure.value(baseline).ok_or_else(|| AnalysisError::NoBaseline {
        group: baseline.config().to_string(),
        expected: format!("a recorded {}", measure.field()),
    })?;
    if baseline_value == 0.0 {
        return Err(AnalysisError::division_by_zero(baseline.config(), measure.field()));
    }

    let mut normalized = Normalized {
        measure,
        baseline: baseline.config(),
        baseline_value,
        points: Vec::new(),
        skipped: Vec::new(),
    };

    for candidate in candidates {
        let Some(value) = measure.value(candidate) else {
            continue;
        };
        match measure.ratio(baseline, candidate) {
            Ok(None) => {}
            Ok(Some(ratio)) => normalized.points.push(NormalizedPoint {
                candidate: candidate.config(),
                value,
                ratio,
                efficiency: efficiency(ratio, candidate.threads),
            }),
            Err(error) => {
                warn!(
                    candidate = %candidate.config(),
                    measure = %measure,
                    "skipping candidate: {}",
                    error
                );
                normalized.skipped.push(Skipped {
                    candidate: candidate.config(),
                    error,
                });
            }
        }
    }

    Ok(normalized)
}

/// Derived metrics for every member of a group, ordered by thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Group the metrics belong to.
    pub group: GroupKey,
    /// The resolved baseline run.
    pub baseline: BenchmarkRecord,
    /// Candidates with defined metrics.
    pub metrics: Vec<DerivedMetric>,
    /// Candidates whose metrics are undefined.
    pub skipped: Vec<Skipped>,
}

impl Derivation {
    /// Best configuration of the group.
    pub fn best(&self) -> Option<&DerivedMetric> {
        best_configuration(&self.metrics)
    }
}

/// Resolves the group's baseline and computes metrics for all its members.
///
/// # Errors
///
/// Baseline resolution errors, and [`AnalysisError::DivisionByZero`] when the
/// baseline total is zero. Per-candidate errors end up in
/// [`Derivation::skipped`].
pub fn derive_all(
    records: &RecordSet,
    group: &GroupKey,
    policy: BaselinePolicy,
) -> Result<Derivation> {
    let baseline = resolve_baseline(records, group, policy)?.clone();
    if baseline.total_ms == 0.0 {
        return Err(AnalysisError::division_by_zero(baseline.config(), "total_ms"));
    }

    let mut derivation = Derivation {
        group: group.clone(),
        baseline,
        metrics: Vec::new(),
        skipped: Vec::new(),
    };

    for candidate in group.members(records).sorted_by_threads().iter() {
        match compute(&derivation.baseline, candidate) {
            Ok(metric) => derivation.metrics.push(metric),
            Err(error) => {
                warn!(
                    group = %group,
                    candidate = %candidate.config(),
                    "omitting candidate: {}",
                    error
                );
                derivation.skipped.push(Skipped {
                    candidate: candidate.config(),
                    error,
                });
            }
        }
    }

    Ok(derivation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phased(threads: u32, phases: [f64; 4], total: f64) -> BenchmarkRecord {
        Phase::ALL
            .iter()
            .zip(phases)
            .fold(BenchmarkRecord::new(1_000, threads, total), |r, (p, ms)| {
                r.with_phase(*p, ms)
            })
    }

    #[test]
    fn test_speedup_and_efficiency() {
        let baseline = BenchmarkRecord::new(10_000_000, 1, 100.0);
        let candidate = BenchmarkRecord::new(10_000_000, 4, 30.0);
        let metric = compute(&baseline, &candidate).unwrap();
        assert!((metric.speedup - 100.0 / 30.0).abs() < 1e-12);
        assert!((metric.efficiency - 83.333_333).abs() < 1e-4);
    }

    #[test]
    fn test_self_comparison_is_exactly_one() {
        let record = phased(1, [40.0, 30.0, 20.0, 10.0], 100.0);
        let metric = compute(&record, &record).unwrap();
        assert_eq!(metric.speedup, 1.0);
        assert_eq!(metric.efficiency, 100.0);
        assert!(metric.phase_speedups.values().all(|s| *s == 1.0));
    }

    #[test]
    fn test_zero_candidate_total() {
        let baseline = BenchmarkRecord::new(100, 1, 10.0);
        let candidate = BenchmarkRecord::new(100, 2, 0.0);
        let err = compute(&baseline, &candidate).unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero { ref field, .. } if field == "total_ms"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_zero_candidate_phase_drops_only_that_phase() {
        let baseline = phased(1, [40.0, 30.0, 20.0, 10.0], 100.0);
        let candidate = phased(2, [20.0, 0.0, 10.0, 5.0], 50.0);
        let metric = compute(&baseline, &candidate).unwrap();
        assert_eq!(metric.speedup, 2.0);
        assert_eq!(metric.phase_speedups.len(), 3);
        assert_eq!(metric.phase_speedup(Phase::BuildLinkList), None);
        assert_eq!(metric.percentage_breakdown.len(), 4);
        assert_eq!(metric.phase_errors.len(), 1);
        assert!(matches!(
            metric.phase_errors[0],
            AnalysisError::DivisionByZero { ref field, .. } if field == "build_linklist_ms"
        ));
    }

    #[test]
    fn test_zero_baseline_phase_keeps_self_speedup() {
        let record = phased(1, [40.0, 30.0, 30.0, 0.0], 100.0);
        let metric = compute(&record, &record).unwrap();
        assert_eq!(metric.speedup, 1.0);
        assert_eq!(metric.phase_speedup(Phase::ExtractValid), None);
        assert_eq!(metric.phase_speedup(Phase::FindFurthest), Some(1.0));
        assert!(matches!(
            metric.phase_errors[0],
            AnalysisError::DivisionByZero { ref record, ref field }
                if record == "n=1000, threads=1" && field == "extract_valid_ms"
        ));
    }

    #[test]
    fn test_zero_baseline_total_is_rejected() {
        let baseline = BenchmarkRecord::new(100, 1, 0.0);
        let candidate = BenchmarkRecord::new(100, 4, 10.0);
        assert!(compute(&baseline, &candidate).is_err());

        let err = normalize(&baseline, [&candidate], Measure::Total).unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero { ref field, .. } if field == "total_ms"));

        let records = RecordSet::new(vec![baseline, candidate]);
        let err = derive_all(&records, &GroupKey::new().n(100), BaselinePolicy::Auto).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DivisionByZero { ref record, .. } if record == "n=100, threads=1"
        ));
    }

    #[test]
    fn test_phase_only_in_one_record_is_skipped() {
        let baseline = BenchmarkRecord::new(100, 1, 10.0)
            .with_phase(Phase::FindFurthest, 5.0)
            .with_phase(Phase::ScanLinkList, 3.0);
        let candidate = BenchmarkRecord::new(100, 2, 5.0).with_phase(Phase::FindFurthest, 2.5);
        let metric = compute(&baseline, &candidate).unwrap();
        assert_eq!(metric.phase_speedups.len(), 1);
        assert_eq!(metric.phase_speedup(Phase::FindFurthest), Some(2.0));
        assert_eq!(metric.phase_efficiency(Phase::FindFurthest), Some(100.0));
        assert_eq!(metric.phase_speedup(Phase::ScanLinkList), None);
    }

    #[test]
    fn test_percentage_breakdown_sums_to_hundred() {
        let record = phased(1, [40.0, 30.0, 20.0, 10.0], 100.0);
        let shares = percentage_breakdown(&record).unwrap();
        assert_eq!(shares[&Phase::FindFurthest], 40.0);
        let sum: f64 = shares.values().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_breakdown_zero_total() {
        let record = BenchmarkRecord::new(100, 1, 0.0).with_phase(Phase::FindFurthest, 0.0);
        assert!(percentage_breakdown(&record).is_err());
        assert!(percentage_breakdown(&BenchmarkRecord::new(100, 1, 0.0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bottleneck_tie_goes_to_canonical_first() {
        let record = BenchmarkRecord::new(100, 1, 30.0)
            .with_phase(Phase::ScanLinkList, 10.0)
            .with_phase(Phase::BuildLinkList, 10.0);
        assert_eq!(bottleneck_phase(&record), Some(Phase::BuildLinkList));
        assert_eq!(bottleneck_phase(&BenchmarkRecord::new(100, 1, 1.0)), None);
    }

    #[test]
    fn test_best_configuration_ties_to_lowest_threads() {
        let baseline = BenchmarkRecord::new(100, 1, 100.0);
        let metrics: Vec<_> = [(8, 25.0), (4, 25.0), (16, 40.0)]
            .iter()
            .map(|(t, ms)| compute(&baseline, &BenchmarkRecord::new(100, *t, *ms)).unwrap())
            .collect();
        assert_eq!(best_configuration(&metrics).map(|m| m.threads()), Some(4));
        assert!(best_configuration(&[]).is_none());
    }

    #[test]
    fn test_overhead() {
        assert_eq!(overhead_pct(0.5), Some(100.0));
        assert_eq!(overhead_pct(1.0), None);
        assert_eq!(overhead_pct(2.0), None);
        assert_eq!(overhead_pct(0.0), None);
    }

    #[test]
    fn test_normalize_throughput_higher_is_better() {
        let baseline = BenchmarkRecord::new(1_000_000, 1, 10.0).with_throughput(100.0);
        let candidates = vec![
            BenchmarkRecord::new(1_000_000, 4, 4.0).with_throughput(250.0),
            BenchmarkRecord::new(1_000_000, 8, 2.0),
        ];
        let normalized = normalize(&baseline, &candidates, Measure::Throughput).unwrap();
        assert_eq!(normalized.points.len(), 2);
        assert_eq!(normalized.points[0].ratio, 2.5);
        // Derived from n / (ms / 1000) / 1e6.
        assert!((normalized.points[1].value - 500.0).abs() < 1e-9);
        assert!((normalized.points[1].ratio - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_skips_missing_and_reports_zero() {
        let baseline = BenchmarkRecord::new(100, 1, 10.0).with_phase(Phase::FindFurthest, 4.0);
        let candidates = vec![
            BenchmarkRecord::new(100, 2, 5.0).with_phase(Phase::FindFurthest, 2.0),
            BenchmarkRecord::new(100, 4, 5.0),
            BenchmarkRecord::new(100, 8, 5.0).with_phase(Phase::FindFurthest, 0.0),
        ];
        let normalized =
            normalize(&baseline, &candidates, Measure::Phase(Phase::FindFurthest)).unwrap();
        assert_eq!(normalized.points.len(), 1);
        assert_eq!(normalized.points[0].ratio, 2.0);
        assert_eq!(normalized.points[0].efficiency, 100.0);
        assert_eq!(normalized.skipped.len(), 1);
        assert_eq!(normalized.skipped[0].candidate.threads, 8);
    }

    #[test]
    fn test_normalize_baseline_without_measure() {
        let baseline = BenchmarkRecord::new(100, 1, 10.0);
        let err = normalize(&baseline, std::iter::empty(), Measure::Phase(Phase::ExtractValid)).unwrap_err();
        assert!(matches!(err, AnalysisError::NoBaseline { .. }));
    }

    #[test]
    fn test_derive_all_isolates_bad_candidates() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(100, 1, 100.0),
            BenchmarkRecord::new(100, 8, 0.0),
            BenchmarkRecord::new(100, 4, 30.0),
        ]);
        let derivation =
            derive_all(&records, &GroupKey::new().n(100), BaselinePolicy::Auto).unwrap();
        let threads: Vec<u32> = derivation.metrics.iter().map(|m| m.threads()).collect();
        assert_eq!(threads, vec![1, 4]);
        assert_eq!(derivation.skipped.len(), 1);
        assert_eq!(derivation.best().map(|m| m.threads()), Some(4));
    }
}
