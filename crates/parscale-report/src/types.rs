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

//! Report types and structures.
//!
//! A [`Report`] carries the plot series, a structured summary that the
//! console renderer turns into text, and a diagnostic for every group or
//! record that had to be left out.

use crate::series::Series;
use parscale_core::{ConfigKey, Phase};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Why part of the data was left out of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The group or record that was skipped.
    pub scope: String,
    /// Why it was skipped.
    pub reason: String,
}

/// One phase's time and share in the baseline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseShare {
    /// Phase.
    pub phase: Phase,
    /// Elapsed ms.
    pub ms: f64,
    /// Share of the total, in percent.
    pub pct: f64,
}

/// The baseline run of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineRow {
    /// Baseline configuration.
    pub config: ConfigKey,
    /// Total ms.
    pub total_ms: f64,
    /// Per-phase times and shares.
    pub phases: Vec<PhaseShare>,
}

/// One line of the speedup table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedupRow {
    /// Thread count.
    pub threads: u32,
    /// Speedup per phase.
    pub phase_speedups: BTreeMap<Phase, f64>,
    /// Speedup of the whole run.
    pub total_speedup: f64,
}

/// Where the baseline spends most of its time, and how that changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckFinding {
    /// The baseline's slowest phase.
    pub phase: Phase,
    /// Its share at the baseline, in percent.
    pub baseline_pct: f64,
    /// Its share at the best configuration, in percent.
    pub best_pct: Option<f64>,
}

/// Scaling of one phase at the best configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseScaling {
    /// Phase.
    pub phase: Phase,
    /// Speedup against the baseline.
    pub speedup: f64,
    /// Efficiency, in percent.
    pub efficiency: f64,
}

/// Narrative findings of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Findings {
    /// Thread count of the best configuration.
    pub best_threads: u32,
    /// Total speedup of the best configuration.
    pub best_speedup: f64,
    /// Total ms of the best configuration.
    pub best_total_ms: f64,
    /// Total ms of the baseline.
    pub baseline_total_ms: f64,
    /// Primary bottleneck, when phases were recorded.
    pub bottleneck: Option<BottleneckFinding>,
    /// Per-phase scaling at the best configuration.
    pub phase_scaling: Vec<PhaseScaling>,
}

/// Summary of a phase breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownSummary {
    /// Input size the breakdown focuses on.
    pub n: Option<u64>,
    /// Baseline run, when resolved.
    pub baseline: Option<BaselineRow>,
    /// Speedup table in ascending thread order.
    pub speedups: Vec<SpeedupRow>,
    /// Findings, when a best configuration exists.
    pub findings: Option<Findings>,
}

/// How a run compares with its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RunComparison {
    /// Faster or equal: `baseline / run`.
    Speedup(f64),
    /// Slower: percent of extra time.
    Overhead(f64),
}

/// One parallel run of a thread-scaling summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run configuration.
    pub config: ConfigKey,
    /// Elapsed ms.
    pub time_ms: f64,
    /// Throughput in M items/s.
    pub throughput: Option<f64>,
    /// Comparison with the baseline, when resolved.
    pub comparison: Option<RunComparison>,
}

/// Thread-scaling results for one input size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeSummary {
    /// Input size.
    pub n: u64,
    /// Baseline configuration, when resolved.
    pub baseline: Option<ConfigKey>,
    /// Baseline time.
    pub baseline_ms: Option<f64>,
    /// Baseline throughput.
    pub baseline_throughput: Option<f64>,
    /// Compared runs in ascending thread order.
    pub runs: Vec<RunSummary>,
}

/// Summary of a thread-scaling report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingSummary {
    /// Per input size, ascending.
    pub sizes: Vec<SizeSummary>,
}

/// Structured summary of either report flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum Summary {
    /// Phase breakdown.
    Breakdown(BreakdownSummary),
    /// Thread scaling.
    Scaling(ScalingSummary),
}

/// Complete analysis report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Report title.
    pub title: String,
    /// Plot series.
    pub series: Vec<Series>,
    /// Structured summary.
    pub summary: Summary,
    /// Omitted groups and records.
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Creates an empty report.
    pub fn new(title: impl Into<String>, summary: Summary) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            summary,
            diagnostics: Vec::new(),
        }
    }

    /// Adds a series. Empty series are dropped.
    pub fn add_series(&mut self, series: Series) {
        if !series.is_empty() {
            self.series.push(series);
        }
    }

    /// Records an omission and logs it. Repeats are ignored.
    pub fn add_diagnostic(&mut self, scope: impl Into<String>, reason: impl Into<String>) {
        let diagnostic = Diagnostic {
            scope: scope.into(),
            reason: reason.into(),
        };
        if self.diagnostics.contains(&diagnostic) {
            return;
        }
        warn!(scope = %diagnostic.scope, "omitted from report: {}", diagnostic.reason);
        self.diagnostics.push(diagnostic);
    }

    /// Looks up a series by name.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Returns whether anything was omitted.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
