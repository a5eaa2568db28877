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

use super::{analysis_config, load_input, publish};
use crate::cli::{InputArgs, DEFAULT_BREAKDOWN_INPUT, DEFAULT_BREAKDOWN_REGEN};
use crate::error::CliError;
use parscale_report::breakdown_report;

/// Runs the phase breakdown analysis.
///
/// # Arguments
///
/// * `args` - Shared input options
/// * `size` - Input size to focus on; the largest in the data when `None`
pub fn breakdown(args: &InputArgs, size: Option<u64>) -> Result<(), CliError> {
    let records = load_input(args, DEFAULT_BREAKDOWN_INPUT, DEFAULT_BREAKDOWN_REGEN)?;
    let config = analysis_config(args).with_focus_n(size);
    let report = breakdown_report(&records, &config);
    publish(&report, args.series_out.as_deref())
}
