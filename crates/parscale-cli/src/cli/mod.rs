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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use parscale_core::BaselinePolicy;
use std::path::PathBuf;

/// Default input of the `breakdown` command.
pub const DEFAULT_BREAKDOWN_INPUT: &str = "results/parallel_breakdown.csv";

/// Command that regenerates the breakdown input.
pub const DEFAULT_BREAKDOWN_REGEN: &str = "tools/run_parallel_breakdown.sh";

/// Default input of the `scaling` command.
pub const DEFAULT_SCALING_INPUT: &str = "results/thread_scaling.csv";

/// Command that regenerates the scaling input.
pub const DEFAULT_SCALING_REGEN: &str = "tools/run_thread_scaling.sh";

/// Arguments shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Benchmark CSV (defaults to the command's standard results file)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write plot series as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub series_out: Option<PathBuf>,

    /// Relative tolerance for phase times exceeding the total
    #[arg(long, value_name = "F")]
    pub phase_tolerance: Option<f64>,

    /// Baseline rule: auto, serial or single-thread
    #[arg(long, default_value_t = BaselinePolicy::Auto)]
    pub baseline: BaselinePolicy,

    /// Compare individual runs instead of averaging repeated configurations
    #[arg(long)]
    pub no_collapse: bool,

    /// Command suggested when the input is missing
    #[arg(long, value_name = "CMD")]
    pub regen_command: Option<String>,
}

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use parscale_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze per-phase scaling at one input size
    ///
    /// Prints the baseline breakdown, a per-phase speedup table and the best
    /// configuration with its bottleneck phase.
    Breakdown {
        #[command(flatten)]
        input: InputArgs,

        /// Input size to focus on (defaults to the largest in the data)
        #[arg(short = 'n', long = "size", value_name = "N")]
        size: Option<u64>,
    },

    /// Analyze thread scaling across input sizes
    ///
    /// Prints serial and parallel timings per input size with speedup or
    /// overhead for every thread count.
    Scaling {
        #[command(flatten)]
        input: InputArgs,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is missing or malformed, or the series file
    /// cannot be written.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Breakdown { input, size } => commands::breakdown(&input, size),
            Commands::Scaling { input } => commands::scaling(&input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_breakdown_arguments() {
        let cli = Cli::parse_from([
            "parscale",
            "breakdown",
            "data.csv",
            "-n",
            "1000",
            "--baseline",
            "single-thread",
            "--phase-tolerance",
            "0.05",
        ]);
        match cli.command {
            Commands::Breakdown { input, size } => {
                assert_eq!(input.input, Some(PathBuf::from("data.csv")));
                assert_eq!(size, Some(1000));
                assert_eq!(input.baseline, BaselinePolicy::SingleThread);
                assert_eq!(input.phase_tolerance, Some(0.05));
                assert!(!input.no_collapse);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_scaling_defaults() {
        let cli = Cli::parse_from(["parscale", "scaling"]);
        match cli.command {
            Commands::Scaling { input } => {
                assert!(input.input.is_none());
                assert!(input.series_out.is_none());
                assert_eq!(input.baseline, BaselinePolicy::Auto);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_baseline() {
        assert!(Cli::try_parse_from(["parscale", "scaling", "--baseline", "fastest"]).is_err());
    }
}
