// Dweve KVSweep - Key-Value Server Benchmark Comparison
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

//! Sweep execution harness.
//!
//! # Modules
//!
//! - `driver`: Benchmark client invocation with timeouts
//! - `probe`: RESP liveness check and warm-up
//! - `sweep`: Point-by-point sweep controller
//! - `aggregator`: Result log and series assembly
//! - `series`: Aligned per-endpoint results
//! - `comparator`: Baseline comparison

pub mod aggregator;
pub mod comparator;
pub mod driver;
pub mod probe;
pub mod series;
pub mod sweep;

pub use aggregator::Aggregator;
pub use comparator::{compare_to_baseline, EndpointComparison, PointComparison, Verdict};
pub use driver::{
    build_command, CommandExecutor, CommandSpec, ProcessExecutor, RunDriver, RunResult, RunStatus,
};
pub use probe::{EndpointProbe, RespProbe};
pub use series::{MetricSeries, SweepSeries};
pub use sweep::{AbortHandle, SweepController};
