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

//! Server endpoints under test.

use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One addressable server instance under test.
///
/// Endpoints are declared once at startup and never change during a run.
/// Their declaration order is the column order of every report; the first
/// endpoint is the baseline that the others are compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Logical name used in logs and reports (e.g. "redis", "candidate").
    pub name: String,
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Creates a new endpoint.
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// Returns the `host:port` address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}

/// Parses `name=host:port` or `name=port` (host defaults to `127.0.0.1`).
impl FromStr for Endpoint {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, address) = s.split_once('=').ok_or_else(|| {
            SweepError::invalid_config("endpoint", format!("expected name=host:port, got '{}'", s))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(SweepError::invalid_config("endpoint", "name must not be empty"));
        }

        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => (host.trim(), port.trim()),
            None => ("127.0.0.1", address.trim()),
        };

        let port = port.parse::<u16>().map_err(|_| {
            SweepError::invalid_config("endpoint", format!("invalid port '{}' in '{}'", port, s))
        })?;

        if host.is_empty() {
            return Err(SweepError::invalid_config(
                "endpoint",
                format!("host must not be empty in '{}'", s),
            ));
        }

        Ok(Endpoint::new(name, host, port))
    }
}

/// Checks that an endpoint list is usable for a comparison.
pub fn validate_endpoints(endpoints: &[Endpoint]) -> Result<()> {
    if endpoints.is_empty() {
        return Err(SweepError::invalid_config(
            "endpoints",
            "at least one endpoint is required",
        ));
    }

    for (i, endpoint) in endpoints.iter().enumerate() {
        if endpoint.port == 0 {
            return Err(SweepError::invalid_config(
                "endpoints",
                format!("endpoint '{}' has port 0", endpoint.name),
            ));
        }
        if endpoints[..i].iter().any(|e| e.name == endpoint.name) {
            return Err(SweepError::invalid_config(
                "endpoints",
                format!("duplicate endpoint name '{}'", endpoint.name),
            ));
        }
    }

    Ok(())
}
