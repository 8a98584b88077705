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

//! Error types for sweep execution and reporting.
//!
//! Only failures that make a comparison meaningless are represented here.
//! A run that exits non-zero, times out, or whose output cannot be parsed
//! is not an error: it is recorded as missing data and the sweep continues.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Errors that abort a sweep invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    /// An endpoint failed its liveness probe before the sweep started.
    ///
    /// No run is executed and nothing is written to the result log.
    #[error("Endpoint '{name}' at {address} is unreachable: {reason}")]
    EndpointUnreachable {
        /// Logical endpoint name
        name: String,
        /// `host:port` that was probed
        address: String,
        /// Why the probe failed
        reason: String,
    },

    /// Invalid configuration parameter.
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The result log or a report path could not be written.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A sample was recorded out of order or a point was committed
    /// without every endpoint's sample.
    #[error("Misaligned sweep data: {0}")]
    Misaligned(String),

    /// Configuration or dataset (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The sweep was interrupted between points.
    #[error("Sweep '{sweep}' aborted after {completed} of {declared} points")]
    Aborted {
        /// Sweep name
        sweep: String,
        /// Points fully measured and persisted
        completed: usize,
        /// Points declared by the sweep
        declared: usize,
    },
}

impl SweepError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvsweep::error::SweepError;
    ///
    /// let err = SweepError::invalid_config("endpoints", "at least one endpoint is required");
    /// assert!(err.to_string().contains("endpoints"));
    /// ```
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create an unreachable endpoint error.
    pub fn unreachable(
        name: impl Into<String>,
        address: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::EndpointUnreachable {
            name: name.into(),
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether the error was caused by an unreachable endpoint.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::EndpointUnreachable { .. })
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization(source.to_string())
    }
}

impl From<serde_yaml::Error> for SweepError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Serialization(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_display() {
        let err = SweepError::unreachable("redis", "127.0.0.1:6378", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("redis"));
        assert!(msg.contains("127.0.0.1:6378"));
        assert!(msg.contains("connection refused"));
        assert!(err.is_unreachable());
    }

    #[test]
    fn test_io_error_display() {
        let err = SweepError::io_error(
            "result/results.log",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("result/results.log"));
        assert!(msg.contains("permission denied"));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_aborted_display() {
        let err = SweepError::Aborted {
            sweep: "client_get".to_string(),
            completed: 3,
            declared: 8,
        };
        assert_eq!(
            err.to_string(),
            "Sweep 'client_get' aborted after 3 of 8 points"
        );
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{not: [a list").unwrap_err();
        let err: SweepError = yaml_err.into();
        assert!(matches!(err, SweepError::Serialization(_)));
    }
}
