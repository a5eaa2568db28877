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

//! Structured error types for the ParScale CLI.
//!
//! All command handlers return `Result<T, CliError>`; `main` prints the
//! message after an `Error: ` prefix and exits with a failure status.

use parscale_core::AnalysisError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ParScale CLI operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CliError {
    /// The benchmark input does not exist yet.
    ///
    /// The message names the command that produces it.
    #[error("{} not found\nPlease run: {regenerate}", .path.display())]
    MissingInput {
        /// Expected input path
        path: PathBuf,
        /// Command that regenerates the input
        regenerate: String,
    },

    /// Loading or analysis failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Writing an output file failed.
    #[error("I/O error for '{}': {message}", .path.display())]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A command-line value is out of range.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// What is wrong with it
        message: String,
    },
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = CliError::MissingInput {
            path: PathBuf::from("results/thread_scaling.csv"),
            regenerate: "tools/run_thread_scaling.sh".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "results/thread_scaling.csv not found\nPlease run: tools/run_thread_scaling.sh"
        );
    }

    #[test]
    fn test_analysis_error_is_transparent() {
        let err: CliError = AnalysisError::SourceSchema {
            column: "n".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Missing required column: n");
    }

    #[test]
    fn test_io_error_context() {
        let err = CliError::io_error(
            "out/series.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("out/series.json"));
        assert!(err.to_string().contains("denied"));
    }
}
