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

//! Record filtering by dimension constraints.
//!
//! A [`Query`] is a set of equality constraints, at most one per dimension.
//! Dimensions without a constraint are wildcards.
//!
//! ```
//! use parscale_core::{BenchmarkRecord, Query, RecordSet};
//!
//! let records = RecordSet::new(vec![
//!     BenchmarkRecord::new(1_000, 1, 9.0).with_algorithm("serial"),
//!     BenchmarkRecord::new(1_000, 4, 3.0).with_algorithm("parallel"),
//!     BenchmarkRecord::new(5_000, 4, 11.0).with_algorithm("parallel"),
//! ]);
//!
//! let parallel_1k = records.select(&Query::new().algorithm("parallel").n(1_000));
//! assert_eq!(parallel_1k.len(), 1);
//! assert!(records.select(&Query::new().threads(64)).is_empty());
//! ```

use crate::index::{Dimension, DimensionValue};
use crate::record::{BenchmarkRecord, RecordSet};
use std::collections::BTreeMap;
use std::fmt;

/// Conjunction of equality constraints over record dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    constraints: BTreeMap<Dimension, DimensionValue>,
}

impl Query {
    /// Creates a query with no constraints (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint, replacing any earlier one on the same dimension.
    pub fn with(mut self, value: DimensionValue) -> Self {
        self.constraints.insert(value.dimension(), value);
        self
    }

    /// Constrains the algorithm tag.
    pub fn algorithm(self, tag: impl Into<String>) -> Self {
        self.with(DimensionValue::Algorithm(tag.into()))
    }

    /// Constrains the input size.
    pub fn n(self, n: u64) -> Self {
        self.with(DimensionValue::N(n))
    }

    /// Constrains the thread count.
    pub fn threads(self, threads: u32) -> Self {
        self.with(DimensionValue::Threads(threads))
    }

    /// Drops the constraint on `dimension`, if any.
    pub fn without(mut self, dimension: Dimension) -> Self {
        self.constraints.remove(&dimension);
        self
    }

    /// The constraint on `dimension`, if any.
    pub fn constraint(&self, dimension: Dimension) -> Option<&DimensionValue> {
        self.constraints.get(&dimension)
    }

    /// Constraints in dimension order.
    pub fn constraints(&self) -> impl Iterator<Item = &DimensionValue> {
        self.constraints.values()
    }

    /// Returns whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns whether `record` satisfies every constraint.
    ///
    /// An algorithm constraint never matches an untagged record.
    pub fn matches(&self, record: &BenchmarkRecord) -> bool {
        self.constraints
            .iter()
            .all(|(dimension, value)| record.value_of(*dimension).as_ref() == Some(value))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return f.write_str("any record");
        }
        for (i, value) in self.constraints.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Selects the records matching `query`, preserving order.
///
/// Returns an empty set when nothing matches; callers handle that case.
pub fn select(records: &RecordSet, query: &Query) -> RecordSet {
    records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect()
}

/// The fixed dimensions of a comparison family.
///
/// Two records are comparable only when both belong to the same group.
/// The varying dimension (usually thread count) is left unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupKey {
    fixed: Query,
}

impl GroupKey {
    /// Creates an unconstrained group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the algorithm tag.
    pub fn algorithm(self, tag: impl Into<String>) -> Self {
        Self {
            fixed: self.fixed.algorithm(tag),
        }
    }

    /// Fixes the input size.
    pub fn n(self, n: u64) -> Self {
        Self {
            fixed: self.fixed.n(n),
        }
    }

    /// The fixed values as a query.
    pub fn query(&self) -> &Query {
        &self.fixed
    }

    /// Records belonging to this group.
    pub fn members(&self, records: &RecordSet) -> RecordSet {
        select(records, &self.fixed)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed.is_empty() {
            f.write_str("all records")
        } else {
            write!(f, "{}", self.fixed)
        }
    }
}
