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

//! Error types for loading benchmark data and deriving metrics.
//!
//! Structural problems with the input (missing file, missing column, a row
//! that fails validation) are fatal: nothing downstream can be trusted once
//! one of them occurs. Baseline and division errors are scoped to a single
//! comparison group or record, and report flows turn them into diagnostics
//! instead of aborting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while loading records or computing derived metrics.
///
/// # Examples
///
/// ```
/// use parscale_core::AnalysisError;
///
/// let err = AnalysisError::SourceSchema {
///     column: "threads".to_string(),
/// };
/// assert_eq!(err.to_string(), "Missing required column: threads");
/// assert!(err.is_fatal());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The benchmark source does not exist.
    #[error("{} not found", .path.display())]
    SourceNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The source exists but could not be read.
    #[error("I/O error for '{}': {message}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The header lacks a required column.
    #[error("Missing required column: {column}")]
    SourceSchema {
        /// Name of the missing column.
        column: String,
    },

    /// A row holds a value that cannot be parsed or is out of its domain.
    #[error("Malformed record at line {line}: field '{field}' = '{value}' ({reason})")]
    MalformedRecord {
        /// Line number in the source (1-based, header is line 1).
        line: u64,
        /// Column (or pseudo-field) that failed validation.
        field: String,
        /// Offending text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The CSV layer rejected a row (bad quoting, wrong field count).
    #[error("CSV parse error at line {line}: {message}")]
    Csv {
        /// Line number where the error occurred.
        line: u64,
        /// Detailed error message.
        message: String,
    },

    /// The source has more rows than the configured limit.
    #[error("Security limit exceeded: more than {limit} rows (reached row {actual})")]
    TooManyRows {
        /// Configured row limit.
        limit: usize,
        /// Row index at which the limit was hit.
        actual: usize,
    },

    /// No record in the group qualifies as the baseline.
    #[error("No baseline for group [{group}]: no record matches {expected}")]
    NoBaseline {
        /// Display form of the group key.
        group: String,
        /// Constraints the baseline had to satisfy.
        expected: String,
    },

    /// More than one record qualifies as the baseline.
    #[error("Ambiguous baseline for group [{group}]: {count} records match {expected}")]
    AmbiguousBaseline {
        /// Display form of the group key.
        group: String,
        /// Constraints the baseline had to satisfy.
        expected: String,
        /// Number of matching records.
        count: usize,
    },

    /// A ratio would divide by a zero measurement.
    #[error("Division by zero: {field} of [{record}] is zero")]
    DivisionByZero {
        /// Configuration whose measurement is zero.
        record: String,
        /// Measurement field that is zero.
        field: String,
    },
}

impl AnalysisError {
    /// Creates a malformed-record error.
    pub fn malformed(
        line: u64,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            line,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a division-by-zero error for a record's measurement.
    pub fn division_by_zero(record: impl ToString, field: impl Into<String>) -> Self {
        Self::DivisionByZero {
            record: record.to_string(),
            field: field.into(),
        }
    }

    /// Maps an I/O error on `path`, keeping "not found" distinct.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::SourceNotFound { path }
        } else {
            Self::Io {
                path,
                message: source.to_string(),
            }
        }
    }

    /// Returns whether the error aborts the whole pipeline.
    ///
    /// Baseline and division errors only invalidate one group or record.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::NoBaseline { .. } | Self::AmbiguousBaseline { .. } | Self::DivisionByZero { .. }
        )
    }
}
