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

//! Benchmark records and the read-only record set.

use crate::index::{distinct_values, Dimension, DimensionValue};
use crate::phase::{Phase, PhaseTimings};
use crate::query::Query;
use serde::Serialize;
use std::fmt;

/// One measured run of the benchmarked kernel.
///
/// Records are validated when loaded and never mutated afterwards. The
/// builder methods exist for constructing fixtures and aggregated records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    /// Algorithm variant tag, absent when the dataset has a single variant.
    pub algorithm: Option<String>,
    /// Input size.
    pub n: u64,
    /// Degree of parallelism used for the run.
    pub threads: u32,
    /// Elapsed milliseconds per phase; empty when only a total was recorded.
    pub phases: PhaseTimings,
    /// Elapsed milliseconds for the whole run.
    pub total_ms: f64,
    /// Number of selected intervals, carried through unchanged.
    pub num_selected: Option<u64>,
    /// Throughput in millions of items per second, carried through unchanged.
    pub throughput_m_per_sec: Option<f64>,
}

impl BenchmarkRecord {
    /// Creates an untagged record with no phase breakdown.
    pub fn new(n: u64, threads: u32, total_ms: f64) -> Self {
        Self {
            algorithm: None,
            n,
            threads,
            phases: PhaseTimings::new(),
            total_ms,
            num_selected: None,
            throughput_m_per_sec: None,
        }
    }

    /// Sets the algorithm tag.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Sets one phase time.
    pub fn with_phase(mut self, phase: Phase, ms: f64) -> Self {
        self.phases.insert(phase, ms);
        self
    }

    /// Sets the selected-interval count.
    pub fn with_num_selected(mut self, num_selected: u64) -> Self {
        self.num_selected = Some(num_selected);
        self
    }

    /// Sets the recorded throughput.
    pub fn with_throughput(mut self, throughput_m_per_sec: f64) -> Self {
        self.throughput_m_per_sec = Some(throughput_m_per_sec);
        self
    }

    /// Time of one phase, if recorded.
    pub fn phase(&self, phase: Phase) -> Option<f64> {
        self.phases.get(&phase).copied()
    }

    /// Sum of all recorded phase times.
    pub fn phase_sum(&self) -> f64 {
        self.phases.values().sum()
    }

    /// Returns whether the record carries the given algorithm tag.
    pub fn is_algorithm(&self, tag: &str) -> bool {
        self.algorithm.as_deref() == Some(tag)
    }

    /// Recorded throughput, or one derived from `n` and `total_ms`.
    ///
    /// Derivation uses the benchmark's own formula,
    /// `n / (total_ms / 1000) / 1e6`, and yields `None` for zero-time runs.
    pub fn throughput(&self) -> Option<f64> {
        self.throughput_m_per_sec.or_else(|| {
            (self.total_ms > 0.0).then(|| self.n as f64 / (self.total_ms / 1000.0) / 1_000_000.0)
        })
    }

    /// The identifying configuration of this run.
    pub fn config(&self) -> ConfigKey {
        ConfigKey {
            algorithm: self.algorithm.clone(),
            n: self.n,
            threads: self.threads,
        }
    }

    /// Value of this record along `dimension`.
    pub fn value_of(&self, dimension: Dimension) -> Option<DimensionValue> {
        match dimension {
            Dimension::Algorithm => self.algorithm.clone().map(DimensionValue::Algorithm),
            Dimension::N => Some(DimensionValue::N(self.n)),
            Dimension::Threads => Some(DimensionValue::Threads(self.threads)),
        }
    }
}

/// Identity of a benchmark configuration (algorithm, input size, threads).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ConfigKey {
    /// Algorithm tag, if any.
    pub algorithm: Option<String>,
    /// Input size.
    pub n: u64,
    /// Thread count.
    pub threads: u32,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(algorithm) = &self.algorithm {
            write!(f, "algorithm={}, ", algorithm)?;
        }
        write!(f, "n={}, threads={}", self.n, self.threads)
    }
}

/// An immutable collection of benchmark records.
///
/// Filtering and aggregation return new sets; nothing mutates a set in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<BenchmarkRecord>,
}

impl RecordSet {
    /// Wraps loaded records.
    pub fn new(records: Vec<BenchmarkRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkRecord> {
        self.records.iter()
    }

    /// Borrows the records as a slice.
    pub fn as_slice(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    /// Returns whether any record carries an algorithm tag.
    pub fn models_algorithm(&self) -> bool {
        self.records.iter().any(|r| r.algorithm.is_some())
    }

    /// Records matching every constraint of `query`.
    pub fn select(&self, query: &Query) -> RecordSet {
        crate::query::select(self, query)
    }

    /// Distinct values along `dimension`, ascending.
    pub fn distinct(&self, dimension: Dimension) -> Vec<DimensionValue> {
        distinct_values(self, dimension)
    }

    /// Distinct input sizes, ascending.
    pub fn sizes(&self) -> Vec<u64> {
        self.distinct(Dimension::N)
            .iter()
            .filter_map(DimensionValue::as_n)
            .collect()
    }

    /// Distinct thread counts, ascending.
    pub fn thread_counts(&self) -> Vec<u32> {
        self.distinct(Dimension::Threads)
            .iter()
            .filter_map(DimensionValue::as_threads)
            .collect()
    }

    /// Distinct algorithm tags, ascending.
    pub fn algorithms(&self) -> Vec<String> {
        self.distinct(Dimension::Algorithm)
            .iter()
            .filter_map(|v| v.as_algorithm().map(str::to_string))
            .collect()
    }

    /// Copy of the set ordered by thread count (stable).
    pub fn sorted_by_threads(&self) -> RecordSet {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.threads);
        RecordSet::new(records)
    }

    /// Copy of the set ordered by input size (stable).
    pub fn sorted_by_size(&self) -> RecordSet {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.n);
        RecordSet::new(records)
    }
}

impl FromIterator<BenchmarkRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = BenchmarkRecord>>(iter: I) -> Self {
        RecordSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a BenchmarkRecord;
    type IntoIter = std::slice::Iter<'a, BenchmarkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
