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

//! Structured error types for the kvsweep CLI.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the error and
//! exits with a failure status.

use kvsweep::SweepError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// A library operation failed (configuration, probe, sweep, report).
    #[error("{0}")]
    Sweep(#[from] SweepError),

    /// Reading an input file or stdin failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// One or more endpoints did not answer the liveness probe.
    #[error("{failed} of {total} endpoints unreachable")]
    ProbeFailed {
        /// Number of endpoints that failed
        failed: usize,
        /// Number of endpoints probed
        total: usize,
    },

    /// The Ctrl-C handler could not be installed.
    #[error("Cannot install interrupt handler: {0}")]
    Signal(String),

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use kvsweep_cli::error::CliError;
    /// use std::fs;
    ///
    /// let result = fs::read_to_string("run.txt")
    ///     .map_err(|e| CliError::io_error("run.txt", e));
    /// ```
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Sweep(SweepError::from(err))
    }
}
