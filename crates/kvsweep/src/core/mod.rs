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

//! Core sweep model.
//!
//! # Modules
//!
//! - `config`: Harness configuration and built-in sweeps
//! - `endpoint`: Servers under test
//! - `point`: Sweep points, request count rules and resolved sweeps

pub mod config;
pub mod endpoint;
pub mod point;

pub use config::{ClientConfig, HarnessConfig, OutputConfig, ProbeConfig, SweepConfig};
pub use endpoint::{validate_endpoints, Endpoint};
pub use point::{Operation, PointRequests, RequestCount, SweepAxis, SweepDefinition, SweepPoint};
