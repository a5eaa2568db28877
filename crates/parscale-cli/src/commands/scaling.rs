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
use crate::cli::{InputArgs, DEFAULT_SCALING_INPUT, DEFAULT_SCALING_REGEN};
use crate::error::CliError;
use parscale_report::scaling_report;

/// Runs the thread scaling analysis.
pub fn scaling(args: &InputArgs) -> Result<(), CliError> {
    let records = load_input(args, DEFAULT_SCALING_INPUT, DEFAULT_SCALING_REGEN)?;
    let report = scaling_report(&records, &analysis_config(args));
    publish(&report, args.series_out.as_deref())
}
