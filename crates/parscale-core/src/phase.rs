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

//! Execution phases of the benchmarked kernel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A separately timed sub-step of the kernel.
///
/// Variant order is the canonical phase order. Ordered maps keyed by
/// `Phase` iterate in that order, which makes tie-breaking deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Find the furthest reachable interval for every interval.
    #[serde(rename = "find_furthest")]
    FindFurthest,
    /// Build the successor linked list.
    #[serde(rename = "build_linklist")]
    BuildLinkList,
    /// Scan the linked list from the head.
    #[serde(rename = "scan_linklist")]
    ScanLinkList,
    /// Extract the selected intervals.
    #[serde(rename = "extract_valid")]
    ExtractValid,
}

/// Per-phase elapsed milliseconds, iterated in canonical order.
pub type PhaseTimings = BTreeMap<Phase, f64>;

impl Phase {
    /// All phases in canonical order.
    pub const ALL: [Phase; 4] = [
        Phase::FindFurthest,
        Phase::BuildLinkList,
        Phase::ScanLinkList,
        Phase::ExtractValid,
    ];

    /// CSV column holding this phase's time.
    pub fn column(&self) -> &'static str {
        match self {
            Phase::FindFurthest => "find_furthest_ms",
            Phase::BuildLinkList => "build_linklist_ms",
            Phase::ScanLinkList => "scan_linklist_ms",
            Phase::ExtractValid => "extract_valid_ms",
        }
    }

    /// Identifier used in series names (`find_furthest`).
    pub fn key(&self) -> &'static str {
        self.column().trim_end_matches("_ms")
    }

    /// Short label used in tables and series.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::FindFurthest => "FindFurthest",
            Phase::BuildLinkList => "BuildLinkList",
            Phase::ScanLinkList => "ScanLinkList",
            Phase::ExtractValid => "ExtractValid",
        }
    }

    /// Spaced title used in narrative text.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::FindFurthest => "Find Furthest",
            Phase::BuildLinkList => "Build Linklist",
            Phase::ScanLinkList => "Scan Linklist",
            Phase::ExtractValid => "Extract Valid",
        }
    }

    /// Looks up a phase by its CSV column name.
    pub fn from_column(column: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.column() == column)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
