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

//! CLI command implementations

mod breakdown;
mod scaling;

pub use breakdown::breakdown;
pub use scaling::scaling;

use crate::cli::InputArgs;
use crate::error::CliError;
use colored::Colorize;
use parscale_core::{
    load_with_config, AnalysisConfig, AnalysisError, LoadConfig, PhaseTolerance, RecordSet,
};
use parscale_report::{export_json, print_report, Report};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads the command's input, mapping a missing file to a regeneration hint.
fn load_input(
    args: &InputArgs,
    default_input: &str,
    default_regen: &str,
) -> Result<RecordSet, CliError> {
    let path = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_input));

    let config = load_config(args)?;
    match load_with_config(&path, &config) {
        Ok(records) => {
            info!(path = %path.display(), records = records.len(), "loaded input");
            Ok(records)
        }
        Err(AnalysisError::SourceNotFound { path }) => Err(CliError::MissingInput {
            path,
            regenerate: args
                .regen_command
                .clone()
                .unwrap_or_else(|| default_regen.to_string()),
        }),
        Err(e) => Err(e.into()),
    }
}

fn load_config(args: &InputArgs) -> Result<LoadConfig, CliError> {
    let mut config = LoadConfig::default();
    if let Some(relative) = args.phase_tolerance {
        if !relative.is_finite() || relative < 0.0 {
            return Err(CliError::invalid_argument(
                "--phase-tolerance",
                format!("expected a non-negative number, got {}", relative),
            ));
        }
        let absolute_ms = config.phase_tolerance.absolute_ms;
        config = config.with_phase_tolerance(PhaseTolerance::new(relative, absolute_ms));
    }
    Ok(config)
}

fn analysis_config(args: &InputArgs) -> AnalysisConfig {
    AnalysisConfig::default()
        .with_baseline_policy(args.baseline)
        .with_collapse_repeats(!args.no_collapse)
}

/// Prints the summary and writes the series file, if requested.
fn publish(report: &Report, series_out: Option<&Path>) -> Result<(), CliError> {
    print_report(report);

    if report.has_diagnostics() {
        eprintln!(
            "{} {} group(s) or record(s) omitted; see OMITTED above",
            "Warning:".yellow().bold(),
            report.diagnostics.len()
        );
    }

    if let Some(path) = series_out {
        export_json(report, path).map_err(|e| CliError::io_error(path, e))?;
        eprintln!(
            "{} {} series to {}",
            "Wrote".green(),
            report.series.len(),
            path.display()
        );
    }
    Ok(())
}
