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

//! Dimensional index: distinct values along one dimension.
//!
//! Used to build chart axes (thread counts, input sizes, algorithm tags).

use crate::record::RecordSet;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A dimension along which records vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Algorithm variant tag.
    Algorithm,
    /// Input size.
    N,
    /// Thread count.
    Threads,
}

impl Dimension {
    /// Column name of the dimension.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Algorithm => "algorithm",
            Dimension::N => "n",
            Dimension::Threads => "threads",
        }
    }
}

/// A value along one dimension.
///
/// Values of the same dimension order naturally (numerically for sizes and
/// thread counts, lexically for tags).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum DimensionValue {
    /// Algorithm tag.
    Algorithm(String),
    /// Input size.
    N(u64),
    /// Thread count.
    Threads(u32),
}

impl DimensionValue {
    /// The dimension this value belongs to.
    pub fn dimension(&self) -> Dimension {
        match self {
            DimensionValue::Algorithm(_) => Dimension::Algorithm,
            DimensionValue::N(_) => Dimension::N,
            DimensionValue::Threads(_) => Dimension::Threads,
        }
    }

    /// Returns the algorithm tag, if this is one.
    pub fn as_algorithm(&self) -> Option<&str> {
        match self {
            DimensionValue::Algorithm(tag) => Some(tag),
            _ => None,
        }
    }

    /// Returns the input size, if this is one.
    pub fn as_n(&self) -> Option<u64> {
        match self {
            DimensionValue::N(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the thread count, if this is one.
    pub fn as_threads(&self) -> Option<u32> {
        match self {
            DimensionValue::Threads(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Algorithm(tag) => write!(f, "algorithm={}", tag),
            DimensionValue::N(n) => write!(f, "n={}", n),
            DimensionValue::Threads(t) => write!(f, "threads={}", t),
        }
    }
}

/// Returns the distinct values of `dimension`, ascending and deduplicated.
///
/// Records that carry no value for the dimension (an untagged algorithm)
/// contribute nothing.
pub fn distinct_values(records: &RecordSet, dimension: Dimension) -> Vec<DimensionValue> {
    records
        .iter()
        .filter_map(|r| r.value_of(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
