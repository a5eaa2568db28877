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

//! Baseline resolution.
//!
//! Every comparison family needs exactly one reference run: the serial
//! implementation when the dataset tags algorithms, otherwise the
//! single-thread run of the group.

use crate::error::{AnalysisError, Result};
use crate::query::{GroupKey, Query};
use crate::record::{BenchmarkRecord, RecordSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Algorithm tag of the serial reference implementation.
pub const SERIAL_ALGORITHM: &str = "serial";

/// Rule for picking a group's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaselinePolicy {
    /// `Serial` when the dataset tags algorithms, `SingleThread` otherwise.
    ///
    /// The choice is made per dataset, not per group: a tagged group without
    /// a serial run has no baseline.
    #[default]
    Auto,
    /// The `algorithm == "serial"` run with the group's input size.
    Serial,
    /// The `threads == 1` run within the group.
    SingleThread,
}

impl BaselinePolicy {
    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselinePolicy::Auto => "auto",
            BaselinePolicy::Serial => "serial",
            BaselinePolicy::SingleThread => "single-thread",
        }
    }

    /// Resolves `Auto` against a concrete dataset.
    pub fn effective(self, records: &RecordSet) -> BaselinePolicy {
        match self {
            BaselinePolicy::Auto if records.models_algorithm() => BaselinePolicy::Serial,
            BaselinePolicy::Auto => BaselinePolicy::SingleThread,
            other => other,
        }
    }

    /// Constraints a baseline for `group` must satisfy under this rule.
    ///
    /// `Auto` is treated as `SingleThread`; resolve it with
    /// [`BaselinePolicy::effective`] first.
    pub fn baseline_query(&self, group: &GroupKey) -> Query {
        match self {
            BaselinePolicy::Serial => group.query().clone().algorithm(SERIAL_ALGORITHM),
            BaselinePolicy::Auto | BaselinePolicy::SingleThread => group.query().clone().threads(1),
        }
    }
}

impl fmt::Display for BaselinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaselinePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BaselinePolicy::Auto),
            "serial" => Ok(BaselinePolicy::Serial),
            "single-thread" | "single_thread" | "threads=1" => Ok(BaselinePolicy::SingleThread),
            other => Err(format!(
                "unknown baseline policy '{}' (expected auto, serial or single-thread)",
                other
            )),
        }
    }
}

/// Locates the unique baseline record for `group`.
///
/// # Errors
///
/// - [`AnalysisError::NoBaseline`] when no record qualifies. This is never
///   defaulted to a neutral value.
/// - [`AnalysisError::AmbiguousBaseline`] when several records qualify;
///   average repeated runs with [`crate::collapse_repeats`] first.
///
/// # Example
///
/// ```
/// use parscale_core::{resolve_baseline, BaselinePolicy, BenchmarkRecord, GroupKey, RecordSet};
///
/// let records = RecordSet::new(vec![
///     BenchmarkRecord::new(1_000, 1, 100.0),
///     BenchmarkRecord::new(1_000, 4, 30.0),
/// ]);
/// let group = GroupKey::new().n(1_000);
/// let baseline = resolve_baseline(&records, &group, BaselinePolicy::Auto).unwrap();
/// assert_eq!(baseline.threads, 1);
/// ```
pub fn resolve_baseline<'a>(
    records: &'a RecordSet,
    group: &GroupKey,
    policy: BaselinePolicy,
) -> Result<&'a BenchmarkRecord> {
    let rule = policy.effective(records);
    let query = rule.baseline_query(group);
    let mut matches = records.iter().filter(|r| query.matches(r));

    let baseline = matches.next().ok_or_else(|| AnalysisError::NoBaseline {
        group: group.to_string(),
        expected: query.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(AnalysisError::AmbiguousBaseline {
            group: group.to_string(),
            expected: query.to_string(),
            count: extra + 1,
        });
    }

    debug!(
        group = %group,
        policy = %rule,
        baseline = %baseline.config(),
        "resolved baseline"
    );
    Ok(baseline)
}
