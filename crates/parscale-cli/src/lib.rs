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

//! ParScale CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **breakdown**: per-phase time, share and speedup at one input size
//!   (input like `results/parallel_breakdown.csv`)
//! - **scaling**: serial vs parallel time, speedup, throughput and efficiency
//!   across input sizes (input like `results/thread_scaling.csv`)
//!
//! Both commands print a text summary to stdout and can write the plot
//! series as JSON with `--series-out`.

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;
