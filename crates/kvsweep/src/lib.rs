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

//! KVSweep: key-value server benchmark comparison
//!
//! Sweeps a parameter (client sessions or pipeline depth) across an ordered
//! list of wire-compatible key-value servers, drives an external benchmark
//! client for every `(point, endpoint)` pair, extracts throughput and latency
//! from its text output and reports the aligned results.
//!
//! ## Features
//!
//! - **Extraction**: Tolerant parsing of benchmark client output
//! - **Sweeps**: Sequential point-by-point runs with liveness checks and abort
//! - **Reporting**: Append-only result log, tables, SVG charts, HTML, JSON
//!
//! ## Usage
//!
//! ```no_run
//! use kvsweep::core::HarnessConfig;
//! use kvsweep::harness::{Aggregator, ProcessExecutor, RespProbe, RunDriver, SweepController};
//!
//! # fn main() -> kvsweep::Result<()> {
//! let config = HarnessConfig::default();
//! let driver = RunDriver::new(
//!     config.client.clone(),
//!     ProcessExecutor::new(),
//!     RespProbe::new(config.probe_timeout()),
//! );
//! let controller = SweepController::new(driver);
//! let mut aggregator = Aggregator::new(&config.output.log_path);
//!
//! let sweeps = config.sweep_definitions(&[])?;
//! controller.run_all(&sweeps, &config.endpoints, &mut aggregator, |series| {
//!     kvsweep::reporters::print_series(series);
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod extract;
pub mod harness;
pub mod reporters;

// Re-export key types for convenience
pub use crate::core::{Endpoint, HarnessConfig, Operation, SweepAxis, SweepDefinition, SweepPoint};
pub use error::{Result, SweepError};
pub use extract::{extract, Metric, MetricSample};
pub use harness::{
    compare_to_baseline, AbortHandle, Aggregator, SweepController, SweepSeries,
};
pub use reporters::{write_reports, NullPolicy};
