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

//! Report flows for ParScale.
//!
//! Turns derived metrics into named plot series for an external renderer and
//! a plain-text summary for the terminal.
//!
//! # Modules
//!
//! - `series`: plot series and their styling identities
//! - `types`: report, summary and diagnostic structures
//! - `breakdown`: per-phase breakdown at one input size
//! - `scaling`: thread scaling across input sizes
//! - `console`: text rendering
//! - `json`: JSON export

pub mod breakdown;
pub mod console;
pub mod json;
pub mod scaling;
pub mod series;
pub mod types;

pub use breakdown::breakdown_report;
pub use console::{group_digits, print_report, render_summary};
pub use json::{export_json, to_json};
pub use scaling::scaling_report;
pub use series::{ReferenceLine, Series, SeriesIdentity, XAxis};
pub use types::{
    BaselineRow, BottleneckFinding, BreakdownSummary, Diagnostic, Findings, PhaseScaling,
    PhaseShare, Report, RunComparison, RunSummary, ScalingSummary, SizeSummary, SpeedupRow,
    Summary,
};
