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

//! Load and analysis configuration.
//!
//! Provides builder-style configuration for reading benchmark sources and
//! for the report flows built on top of the core.

use crate::baseline::BaselinePolicy;

/// Default maximum number of data rows read from one source.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Default relative phase-sum tolerance (fraction of `total_ms`).
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 0.01;

/// Default absolute phase-sum tolerance floor in milliseconds.
pub const DEFAULT_ABSOLUTE_TOLERANCE_MS: f64 = 0.001;

/// How far the sum of phase times may exceed the recorded total.
///
/// Phases may undercount unmeasured overhead, so a sum below the total is
/// always accepted. Above it, the allowance is the larger of
/// `relative * total_ms` and `absolute_ms`.
///
/// # Example
///
/// ```
/// use parscale_core::config::PhaseTolerance;
///
/// let tolerance = PhaseTolerance::new(0.01, 0.001);
/// assert!(tolerance.admits(100.5, 100.0));
/// assert!(!tolerance.admits(102.0, 100.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTolerance {
    /// Allowance as a fraction of the total.
    pub relative: f64,
    /// Minimum allowance in milliseconds.
    pub absolute_ms: f64,
}

impl PhaseTolerance {
    /// Creates a tolerance from its two components.
    pub fn new(relative: f64, absolute_ms: f64) -> Self {
        Self {
            relative,
            absolute_ms,
        }
    }

    /// A tolerance that admits no excess at all.
    pub fn exact() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Allowed excess in milliseconds for a run of `total_ms`.
    pub fn allowance(&self, total_ms: f64) -> f64 {
        (total_ms * self.relative).max(self.absolute_ms)
    }

    /// Returns whether a phase sum is consistent with `total_ms`.
    pub fn admits(&self, phase_sum: f64, total_ms: f64) -> bool {
        phase_sum <= total_ms + self.allowance(total_ms)
    }
}

impl Default for PhaseTolerance {
    fn default() -> Self {
        Self::new(DEFAULT_RELATIVE_TOLERANCE, DEFAULT_ABSOLUTE_TOLERANCE_MS)
    }
}

/// Configuration for reading a benchmark source.
///
/// # Example
///
/// ```
/// use parscale_core::config::{LoadConfig, PhaseTolerance};
///
/// let config = LoadConfig::default()
///     .with_delimiter(b';')
///     .with_phase_tolerance(PhaseTolerance::exact());
/// assert_eq!(config.delimiter, b';');
/// ```
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Field delimiter (default `,`).
    pub delimiter: u8,
    /// Maximum number of data rows before loading fails.
    pub max_rows: usize,
    /// Accepted excess of phase sums over totals.
    pub phase_tolerance: PhaseTolerance,
}

impl LoadConfig {
    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the row limit.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Sets the phase-sum tolerance.
    pub fn with_phase_tolerance(mut self, tolerance: PhaseTolerance) -> Self {
        self.phase_tolerance = tolerance;
        self
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_rows: DEFAULT_MAX_ROWS,
            phase_tolerance: PhaseTolerance::default(),
        }
    }
}

/// Configuration for the report flows.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Rule for choosing each group's baseline.
    pub baseline_policy: BaselinePolicy,
    /// Input size the phase breakdown focuses on; the largest size when unset.
    pub focus_n: Option<u64>,
    /// Average repeated runs of one configuration before comparing.
    pub collapse_repeats: bool,
}

impl AnalysisConfig {
    /// Sets the baseline policy.
    pub fn with_baseline_policy(mut self, policy: BaselinePolicy) -> Self {
        self.baseline_policy = policy;
        self
    }

    /// Sets (or clears) the focus input size.
    pub fn with_focus_n(mut self, n: Option<u64>) -> Self {
        self.focus_n = n;
        self
    }

    /// Enables or disables averaging of repeated runs.
    pub fn with_collapse_repeats(mut self, collapse: bool) -> Self {
        self.collapse_repeats = collapse;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            baseline_policy: BaselinePolicy::Auto,
            focus_n: None,
            collapse_repeats: true,
        }
    }
}
