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

//! Aggregation of repeated runs.
//!
//! Benchmarks are often run several times per configuration. Collapsing the
//! repeats into their mean gives every group a single baseline candidate.

use crate::phase::{Phase, PhaseTimings};
use crate::record::{BenchmarkRecord, ConfigKey, RecordSet};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Running sums for one configuration.
#[derive(Debug)]
struct Accumulator {
    first: BenchmarkRecord,
    count: usize,
    total_ms: f64,
    phases: BTreeMap<Phase, (f64, usize)>,
    throughput: (f64, usize),
}

impl Accumulator {
    fn new(record: &BenchmarkRecord) -> Self {
        let mut acc = Self {
            first: record.clone(),
            count: 0,
            total_ms: 0.0,
            phases: BTreeMap::new(),
            throughput: (0.0, 0),
        };
        acc.add(record);
        acc
    }

    fn add(&mut self, record: &BenchmarkRecord) {
        self.count += 1;
        self.total_ms += record.total_ms;
        for (phase, ms) in &record.phases {
            let entry = self.phases.entry(*phase).or_insert((0.0, 0));
            entry.0 += ms;
            entry.1 += 1;
        }
        if let Some(throughput) = record.throughput_m_per_sec {
            self.throughput.0 += throughput;
            self.throughput.1 += 1;
        }
    }

    fn finish(self) -> BenchmarkRecord {
        let mut record = self.first;
        record.total_ms = self.total_ms / self.count as f64;
        record.phases = self
            .phases
            .into_iter()
            .map(|(phase, (sum, count))| (phase, sum / count as f64))
            .collect::<PhaseTimings>();
        let (sum, count) = self.throughput;
        record.throughput_m_per_sec = (count > 0).then(|| sum / count as f64);
        record
    }
}

/// Collapses repeated runs into one record per configuration.
///
/// Configurations keep the order of their first appearance. `total_ms`, each
/// phase (over the runs that recorded it) and the recorded throughput become
/// arithmetic means; `num_selected` keeps the first observed value.
///
/// # Example
///
/// ```
/// use parscale_core::{collapse_repeats, BenchmarkRecord, RecordSet};
///
/// let records = RecordSet::new(vec![
///     BenchmarkRecord::new(100, 4, 10.0),
///     BenchmarkRecord::new(100, 4, 14.0),
///     BenchmarkRecord::new(100, 1, 40.0),
/// ]);
/// let collapsed = collapse_repeats(&records);
/// assert_eq!(collapsed.len(), 2);
/// assert_eq!(collapsed.as_slice()[0].total_ms, 12.0);
/// ```
pub fn collapse_repeats(records: &RecordSet) -> RecordSet {
    let mut order: Vec<ConfigKey> = Vec::new();
    let mut groups: HashMap<ConfigKey, Accumulator> = HashMap::new();

    for record in records {
        let key = record.config();
        match groups.get_mut(&key) {
            Some(acc) => acc.add(record),
            None => {
                groups.insert(key.clone(), Accumulator::new(record));
                order.push(key);
            }
        }
    }

    let merged = records.len() - order.len();
    if merged > 0 {
        debug!(
            rows = records.len(),
            configurations = order.len(),
            merged,
            "collapsed repeated runs"
        );
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(Accumulator::finish)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_repeats_is_identity() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(100, 1, 10.0),
            BenchmarkRecord::new(100, 2, 6.0),
        ]);
        assert_eq!(collapse_repeats(&records), records);
    }

    #[test]
    fn test_means_of_phases_and_throughput() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(100, 2, 10.0)
                .with_phase(Phase::FindFurthest, 4.0)
                .with_throughput(10.0)
                .with_num_selected(7),
            BenchmarkRecord::new(100, 2, 20.0)
                .with_phase(Phase::FindFurthest, 8.0)
                .with_throughput(5.0)
                .with_num_selected(9),
        ]);
        let collapsed = collapse_repeats(&records);
        assert_eq!(collapsed.len(), 1);
        let record = &collapsed.as_slice()[0];
        assert_eq!(record.total_ms, 15.0);
        assert_eq!(record.phase(Phase::FindFurthest), Some(6.0));
        assert_eq!(record.throughput_m_per_sec, Some(7.5));
        assert_eq!(record.num_selected, Some(7));
    }

    #[test]
    fn test_phase_mean_over_runs_that_have_it() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(100, 2, 10.0).with_phase(Phase::ScanLinkList, 3.0),
            BenchmarkRecord::new(100, 2, 10.0),
        ]);
        let collapsed = collapse_repeats(&records);
        assert_eq!(collapsed.as_slice()[0].phase(Phase::ScanLinkList), Some(3.0));
    }

    #[test]
    fn test_algorithm_is_part_of_configuration() {
        let records = RecordSet::new(vec![
            BenchmarkRecord::new(100, 1, 10.0).with_algorithm("serial"),
            BenchmarkRecord::new(100, 1, 12.0).with_algorithm("parallel"),
            BenchmarkRecord::new(100, 1, 14.0).with_algorithm("parallel"),
        ]);
        let collapsed = collapse_repeats(&records);
        assert_eq!(collapsed.len(), 2);
        assert!(collapsed.as_slice()[0].is_algorithm("serial"));
        assert_eq!(collapsed.as_slice()[1].total_ms, 13.0);
    }
}
