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

//! Phase breakdown flow.
//!
//! Focuses on one input size and shows how each phase's time, share and
//! speedup evolve with the thread count.

use crate::series::{ReferenceLine, Series, SeriesIdentity, XAxis};
use crate::types::{
    BaselineRow, BottleneckFinding, BreakdownSummary, Findings, PhaseScaling, PhaseShare, Report,
    SpeedupRow, Summary,
};
use parscale_core::{
    bottleneck_phase, collapse_repeats, derive_all, percentage_breakdown, AnalysisConfig,
    AnalysisError, Derivation, DerivedMetric, GroupKey, Phase, RecordSet,
};
use tracing::debug;

/// Builds the phase breakdown report.
///
/// The focus size is `config.focus_n`, or the largest size in the data.
/// Group-level failures become diagnostics; this never fails as a whole.
///
/// # Example
///
/// ```
/// use parscale_core::{load_from_reader, AnalysisConfig, LoadConfig};
/// use parscale_report::breakdown_report;
///
/// let csv = "n,threads,find_furthest_ms,build_linklist_ms,scan_linklist_ms,extract_valid_ms,total_ms\n\
///            1000,1,40,30,20,10,100\n\
///            1000,4,10,10,5,3,28\n";
/// let records = load_from_reader(csv.as_bytes(), &LoadConfig::default()).unwrap();
/// let report = breakdown_report(&records, &AnalysisConfig::default());
/// assert!(report.series("phase_speedup/find_furthest").is_some());
/// assert!(report.diagnostics.is_empty());
/// ```
pub fn breakdown_report(records: &RecordSet, config: &AnalysisConfig) -> Report {
    let records = if config.collapse_repeats {
        collapse_repeats(records)
    } else {
        records.clone()
    };

    let focus_n = config.focus_n.or_else(|| records.sizes().last().copied());
    let mut report = Report::new(
        title(focus_n),
        Summary::Breakdown(BreakdownSummary {
            n: focus_n,
            baseline: None,
            speedups: Vec::new(),
            findings: None,
        }),
    );

    let Some(n) = focus_n else {
        report.add_diagnostic("all records", "no benchmark records to analyze");
        return report;
    };

    let group = GroupKey::new().n(n);
    let members = group.members(&records).sorted_by_threads();
    if members.is_empty() {
        report.add_diagnostic(group.to_string(), format!("no records with n={}", n));
        return report;
    }
    debug!(n, runs = members.len(), "building phase breakdown");

    add_phase_series(&mut report, &members);

    let derivation = match derive_all(&records, &group, config.baseline_policy) {
        Ok(derivation) => derivation,
        Err(e) => {
            report.add_diagnostic(group.to_string(), e.to_string());
            return report;
        }
    };
    for skipped in &derivation.skipped {
        report.add_diagnostic(skipped.candidate.to_string(), skipped.error.to_string());
    }
    for metric in &derivation.metrics {
        for error in &metric.phase_errors {
            report.add_diagnostic(zero_holder(error, metric), error.to_string());
        }
    }

    add_speedup_series(&mut report, &derivation);
    report.summary = Summary::Breakdown(summarize(n, &derivation));
    report
}

/// The run whose zero time left a phase out, so repeats collapse into one line.
fn zero_holder(error: &AnalysisError, metric: &DerivedMetric) -> String {
    match error {
        AnalysisError::DivisionByZero { record, .. } => record.clone(),
        _ => metric.candidate.to_string(),
    }
}

fn title(n: Option<u64>) -> String {
    match n {
        Some(n) => format!("Phase Breakdown (n={})", crate::console::group_digits(n)),
        None => "Phase Breakdown".to_string(),
    }
}

fn phase_series(prefix: &str, phase: Phase) -> Series {
    Series::new(
        format!("{}/{}", prefix, phase.key()),
        phase.label(),
        SeriesIdentity::Phase(phase),
        XAxis::Threads,
    )
}

fn add_phase_series(report: &mut Report, members: &RecordSet) {
    for phase in Phase::ALL {
        let mut times = phase_series("phase_time", phase);
        let mut shares = phase_series("phase_percentage", phase);

        for record in members {
            let Some(ms) = record.phase(phase) else {
                continue;
            };
            let threads = f64::from(record.threads);
            times.push(threads, ms);
            match percentage_breakdown(record) {
                Ok(pct) => {
                    if let Some(share) = pct.get(&phase) {
                        shares.push(threads, *share);
                    }
                }
                Err(e) => report.add_diagnostic(record.config().to_string(), e.to_string()),
            }
        }

        report.add_series(times);
        report.add_series(shares);
    }
}

fn add_speedup_series(report: &mut Report, derivation: &Derivation) {
    for phase in Phase::ALL {
        let mut series = phase_series("phase_speedup", phase);
        for metric in &derivation.metrics {
            if let Some(speedup) = metric.phase_speedup(phase) {
                series.push(f64::from(metric.threads()), speedup);
            }
        }
        report.add_series(series);
    }

    let ideal = derivation
        .metrics
        .iter()
        .map(|m| {
            let t = f64::from(m.threads());
            (t, t)
        })
        .collect();
    report.add_series(Series::reference(
        "reference/ideal_linear",
        ReferenceLine::IdealLinear,
        XAxis::Threads,
        ideal,
    ));
}

fn summarize(n: u64, derivation: &Derivation) -> BreakdownSummary {
    let baseline = &derivation.baseline;
    let shares = percentage_breakdown(baseline).unwrap_or_default();

    let baseline_row = BaselineRow {
        config: baseline.config(),
        total_ms: baseline.total_ms,
        phases: baseline
            .phases
            .iter()
            .map(|(phase, ms)| PhaseShare {
                phase: *phase,
                ms: *ms,
                pct: shares.get(phase).copied().unwrap_or_default(),
            })
            .collect(),
    };

    let speedups = derivation
        .metrics
        .iter()
        .map(|m| SpeedupRow {
            threads: m.threads(),
            phase_speedups: m.phase_speedups.clone(),
            total_speedup: m.speedup,
        })
        .collect();

    let findings = derivation.best().map(|best| Findings {
        best_threads: best.threads(),
        best_speedup: best.speedup,
        best_total_ms: best.candidate_total_ms,
        baseline_total_ms: best.baseline_total_ms,
        bottleneck: bottleneck_phase(baseline).map(|phase| BottleneckFinding {
            phase,
            baseline_pct: shares.get(&phase).copied().unwrap_or_default(),
            best_pct: best.phase_share(phase),
        }),
        phase_scaling: Phase::ALL
            .iter()
            .filter_map(|phase| {
                Some(PhaseScaling {
                    phase: *phase,
                    speedup: best.phase_speedup(*phase)?,
                    efficiency: best.phase_efficiency(*phase)?,
                })
            })
            .collect(),
    });

    BreakdownSummary {
        n: Some(n),
        baseline: Some(baseline_row),
        speedups,
        findings,
    }
}
