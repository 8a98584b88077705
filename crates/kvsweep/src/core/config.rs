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

//! Harness configuration.
//!
//! Endpoints, the benchmark client invocation, sweep definitions and output
//! locations. Configuration is loaded once at startup from YAML or JSON (or
//! taken from [`HarnessConfig::default`]) and never changes during a run.

use crate::core::endpoint::{validate_endpoints, Endpoint};
use crate::core::point::{Operation, RequestCount, SweepAxis, SweepDefinition, SweepPoint};
use crate::error::{Result, SweepError};
use crate::reporters::types::NullPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client session counts swept by the built-in concurrency sweeps.
pub const DEFAULT_CLIENT_SESSIONS: &[u32] = &[1, 2, 4, 8, 16, 32, 64, 128];

/// Pipeline depths swept by the built-in pipeline sweeps.
pub const DEFAULT_PIPELINE_DEPTHS: &[u32] = &[1, 4, 16, 64, 256, 1024];

/// Requests per run for the built-in concurrency sweeps.
pub const DEFAULT_REQUESTS: u64 = 10_000;

/// Requests per run for the built-in pipeline sweeps, keyed by depth:
/// 100 000 per unit of depth up to 64, then 10 M and 20 M.
pub const DEFAULT_PIPELINE_REQUESTS: &[(u32, u64)] = &[
    (1, 100_000),
    (4, 400_000),
    (16, 1_600_000),
    (64, 6_400_000),
    (256, 10_000_000),
    (1024, 20_000_000),
];

/// Client connections held fixed while the pipeline depth varies
/// (the benchmark client's own default).
pub const DEFAULT_CLIENTS: u32 = 50;

/// Wall-clock limit for a single benchmark run.
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;

/// Liveness probe connect/read timeout.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1_000;

/// How the external benchmark client is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Benchmark client executable.
    pub program: String,
    /// Extra arguments appended after the generated ones.
    pub extra_args: Vec<String>,
    /// Per-run timeout in seconds.
    pub timeout_secs: u64,
    /// Seed the benchmarked key on the endpoint before each run.
    pub warmup: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program: "redis-benchmark".to_string(),
            extra_args: Vec::new(),
            timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
            warmup: true,
        }
    }
}

/// Liveness probe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Connect and read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

/// Declarative sweep, resolved into a [`SweepDefinition`] before running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Short identifier used for selection and file names.
    pub name: String,
    /// Title for log headers and reports.
    pub title: String,
    /// Benchmarked command.
    pub operation: Operation,
    /// Varied parameter.
    pub axis: SweepAxis,
    /// Axis values in measurement order.
    pub values: Vec<u32>,
    /// Client connections when the axis is not `clients`.
    #[serde(default = "default_clients")]
    pub clients: u32,
    /// Pipeline depth when the axis is not `pipeline`.
    #[serde(default = "default_pipeline")]
    pub pipeline: u32,
    /// Request count rule.
    pub requests: RequestCount,
}

fn default_clients() -> u32 {
    DEFAULT_CLIENTS
}

fn default_pipeline() -> u32 {
    1
}

impl SweepConfig {
    /// Concurrency sweep over [`DEFAULT_CLIENT_SESSIONS`].
    pub fn clients(name: &str, operation: Operation) -> Self {
        Self {
            name: name.to_string(),
            title: format!(
                "{} command, varying client sessions, measuring throughput and latency",
                operation
            ),
            operation,
            axis: SweepAxis::Clients,
            values: DEFAULT_CLIENT_SESSIONS.to_vec(),
            clients: DEFAULT_CLIENTS,
            pipeline: 1,
            requests: RequestCount::fixed(DEFAULT_REQUESTS),
        }
    }

    /// Pipeline sweep over [`DEFAULT_PIPELINE_DEPTHS`].
    pub fn pipeline(name: &str, operation: Operation) -> Self {
        Self {
            name: name.to_string(),
            title: format!(
                "{} command, varying pipeline depth, measuring throughput and latency",
                operation
            ),
            operation,
            axis: SweepAxis::Pipeline,
            values: DEFAULT_PIPELINE_DEPTHS.to_vec(),
            clients: DEFAULT_CLIENTS,
            pipeline: 1,
            requests: RequestCount::per_point(DEFAULT_PIPELINE_REQUESTS),
        }
    }

    /// Resolves every axis value into a concrete point.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidConfig`] for an empty or duplicated value
    /// list, zero-valued parameters, or an unresolvable request count.
    pub fn definition(&self) -> Result<SweepDefinition> {
        let param = |field: &str| format!("sweeps.{}.{}", self.name, field);

        if self.name.trim().is_empty() {
            return Err(SweepError::invalid_config("sweeps.name", "must not be empty"));
        }
        if self.values.is_empty() {
            return Err(SweepError::invalid_config(param("values"), "must not be empty"));
        }
        if self.clients == 0 || self.pipeline == 0 {
            return Err(SweepError::invalid_config(
                param("clients"),
                "clients and pipeline must be positive",
            ));
        }

        let mut points = Vec::with_capacity(self.values.len());
        for (i, &value) in self.values.iter().enumerate() {
            if value == 0 {
                return Err(SweepError::invalid_config(param("values"), "values must be positive"));
            }
            if self.values[..i].contains(&value) {
                return Err(SweepError::invalid_config(
                    param("values"),
                    format!("value {} is listed twice", value),
                ));
            }

            let requests = self.requests.resolve(value).map_err(|e| match e {
                SweepError::InvalidConfig { reason, .. } => {
                    SweepError::invalid_config(param("requests"), reason)
                }
                other => other,
            })?;

            let point = match self.axis {
                SweepAxis::Clients => SweepPoint::new(value, self.pipeline, requests),
                SweepAxis::Pipeline => SweepPoint::new(self.clients, value, requests),
            };
            points.push(point);
        }

        Ok(SweepDefinition {
            name: self.name.clone(),
            title: self.title.clone(),
            operation: self.operation,
            axis: self.axis,
            points,
        })
    }
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only result log.
    pub log_path: PathBuf,
    /// Directory for charts, HTML pages and JSON datasets.
    pub report_dir: PathBuf,
    /// How charts draw missing values.
    pub null_policy: NullPolicy,
    /// Write chart artifacts in addition to console tables.
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("result/results.log"),
            report_dir: PathBuf::from("result"),
            null_policy: NullPolicy::Zero,
            charts: true,
        }
    }
}

/// Complete harness configuration.
///
/// # Example
///
/// ```
/// use kvsweep::core::config::HarnessConfig;
/// use kvsweep::Endpoint;
///
/// let config = HarnessConfig::default()
///     .with_endpoints(vec![
///         Endpoint::new("baseline", "127.0.0.1", 6378),
///         Endpoint::new("candidate", "127.0.0.1", 6379),
///     ])
///     .with_log_path("out/results.log");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Servers under test; the first one is the baseline.
    pub endpoints: Vec<Endpoint>,
    /// Benchmark client invocation.
    pub client: ClientConfig,
    /// Liveness probe.
    pub probe: ProbeConfig,
    /// Sweeps in execution order.
    pub sweeps: Vec<SweepConfig>,
    /// Result and report locations.
    pub output: OutputConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                Endpoint::new("redis", "127.0.0.1", 6378),
                Endpoint::new("rutin", "127.0.0.1", 6379),
            ],
            client: ClientConfig::default(),
            probe: ProbeConfig::default(),
            sweeps: vec![
                SweepConfig::pipeline("batch_get", Operation::Get),
                SweepConfig::pipeline("batch_set", Operation::Set),
                SweepConfig::clients("client_get", Operation::Get),
                SweepConfig::clients("client_set", Operation::Set),
            ],
            output: OutputConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SweepError::io_error(path, e))?;

        let config: HarnessConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: HarnessConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks endpoints, timeouts and that every sweep resolves.
    pub fn validate(&self) -> Result<()> {
        validate_endpoints(&self.endpoints)?;

        if self.client.program.trim().is_empty() {
            return Err(SweepError::invalid_config("client.program", "must not be empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(SweepError::invalid_config("client.timeout_secs", "must be positive"));
        }
        if self.probe.timeout_ms == 0 {
            return Err(SweepError::invalid_config("probe.timeout_ms", "must be positive"));
        }
        if self.sweeps.is_empty() {
            return Err(SweepError::invalid_config("sweeps", "at least one sweep is required"));
        }

        for (i, sweep) in self.sweeps.iter().enumerate() {
            if self.sweeps[..i].iter().any(|s| s.name == sweep.name) {
                return Err(SweepError::invalid_config(
                    "sweeps",
                    format!("duplicate sweep name '{}'", sweep.name),
                ));
            }
            sweep.definition()?;
        }

        Ok(())
    }

    /// Resolves the selected sweeps (all of them when `selected` is empty),
    /// preserving configuration order.
    pub fn sweep_definitions(&self, selected: &[String]) -> Result<Vec<SweepDefinition>> {
        if let Some(unknown) = selected
            .iter()
            .find(|name| !self.sweeps.iter().any(|s| &s.name == *name))
        {
            return Err(SweepError::invalid_config(
                "sweep",
                format!("unknown sweep '{}'", unknown),
            ));
        }

        self.sweeps
            .iter()
            .filter(|s| selected.is_empty() || selected.contains(&s.name))
            .map(SweepConfig::definition)
            .collect()
    }

    /// Replaces the endpoint list.
    pub fn with_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the result log path.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.log_path = path.into();
        self
    }

    /// Sets the report directory.
    pub fn with_report_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.report_dir = path.into();
        self
    }

    /// Per-run timeout.
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Liveness probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }
}
