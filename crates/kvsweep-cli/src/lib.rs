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

//! kvsweep CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Sweeps
//!
//! - **run**: Run the configured sweeps and write results and reports
//! - **probe**: Check that every endpoint answers `PING`
//! - **plan**: Print every benchmark command a run would execute
//!
//! ## Utilities
//!
//! - **extract**: Extract metrics from captured benchmark client output
//! - **init-config**: Print the built-in configuration
//! - **completion**: Generate shell completion scripts

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;
