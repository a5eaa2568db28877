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

//! Benchmark record store and parallel scaling metrics.
//!
//! This crate loads per-run timing measurements of a parallel algorithm and
//! derives comparative metrics against a baseline run: speedup, parallel
//! efficiency, per-phase percentage breakdown, bottleneck phase and the best
//! configuration of a thread sweep.
//!
//! # Features
//!
//! - **Typed records**: CSV rows are validated once at load time
//! - **Queries**: explicit dimension constraints instead of ad-hoc filters
//! - **Baselines**: serial or single-thread reference runs, never defaulted
//! - **One normalization routine**: total time, phase time and throughput
//!   share the same baseline-then-ratio logic
//! - **Isolated failures**: a bad group or record is skipped, not fatal
//!
//! # Examples
//!
//! ```
//! use parscale_core::{derive_all, load_from_reader, BaselinePolicy, GroupKey, LoadConfig};
//!
//! let csv = "n,threads,total_ms\n\
//!            10000000,1,100\n\
//!            10000000,4,30\n";
//! let records = load_from_reader(csv.as_bytes(), &LoadConfig::default()).unwrap();
//!
//! let group = GroupKey::new().n(10_000_000);
//! let derivation = derive_all(&records, &group, BaselinePolicy::Auto).unwrap();
//! let best = derivation.best().unwrap();
//! assert_eq!(best.threads(), 4);
//! assert!((best.efficiency - 83.3).abs() < 0.1);
//! ```

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod phase;
pub mod query;
pub mod record;
pub mod store;

pub use aggregate::collapse_repeats;
pub use baseline::{resolve_baseline, BaselinePolicy, SERIAL_ALGORITHM};
pub use config::{AnalysisConfig, LoadConfig, PhaseTolerance};
pub use error::{AnalysisError, Result};
pub use index::{distinct_values, Dimension, DimensionValue};
pub use metrics::{
    best_configuration, bottleneck_phase, compute, derive_all, efficiency, normalize,
    overhead_pct, percentage_breakdown, Derivation, DerivedMetric, Measure, Normalized,
    NormalizedPoint, Skipped,
};
pub use phase::{Phase, PhaseTimings};
pub use query::{select, GroupKey, Query};
pub use record::{BenchmarkRecord, ConfigKey, RecordSet};
pub use store::{load, load_from_reader, load_with_config};
