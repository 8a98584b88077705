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

//! Sweep points and sweep definitions.
//!
//! A sweep is an ordered list of parameter tuples. The order is significant:
//! it is the category axis of every table and chart produced from the sweep.

use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Benchmarked command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `GET key`
    Get,
    /// `SET key value`
    Set,
}

impl Operation {
    /// Returns the value passed to the benchmark client's `-t` flag.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
        }
    }

    /// Returns the command name as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "GET",
            Operation::Set => "SET",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepAxis {
    /// Number of parallel client connections (`-c`).
    Clients,
    /// Requests sent per round trip (`-P`).
    Pipeline,
}

impl SweepAxis {
    /// Human-readable axis label.
    pub fn label(&self) -> &'static str {
        match self {
            SweepAxis::Clients => "Client Sessions",
            SweepAxis::Pipeline => "Pipeline Depth",
        }
    }
}

/// One measured parameter tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Parallel client connections.
    pub clients: u32,
    /// Pipeline depth.
    pub pipeline: u32,
    /// Total requests issued by the run.
    pub requests: u64,
}

impl SweepPoint {
    /// Creates a new sweep point.
    pub fn new(clients: u32, pipeline: u32, requests: u64) -> Self {
        Self {
            clients,
            pipeline,
            requests,
        }
    }

    /// Returns the value of this point on the given axis.
    pub fn axis_value(&self, axis: SweepAxis) -> u32 {
        match axis {
            SweepAxis::Clients => self.clients,
            SweepAxis::Pipeline => self.pipeline,
        }
    }
}

/// Explicit mapping from an axis value to the request count of a run.
///
/// Pipelined runs finish much faster than unpipelined ones for the same
/// request count, so pipeline sweeps usually issue more requests at higher
/// depths. The rule is part of the configuration rather than a built-in
/// formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RequestCount {
    /// Same request count at every point.
    Fixed {
        /// Requests per run
        count: u64,
    },
    /// Explicit table; every axis value of the sweep must be listed.
    PerPoint {
        /// `(axis value, requests)` entries
        counts: Vec<PointRequests>,
    },
    /// `per_unit * axis value`, clamped to `[min, max]`.
    Scaled {
        /// Requests per unit of the axis value
        per_unit: u64,
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },
}

/// Entry of a [`RequestCount::PerPoint`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRequests {
    /// Axis value the entry applies to.
    pub value: u32,
    /// Requests issued at that value.
    pub requests: u64,
}

impl RequestCount {
    /// Fixed request count.
    pub fn fixed(count: u64) -> Self {
        RequestCount::Fixed { count }
    }

    /// Explicit table built from `(axis value, requests)` pairs.
    pub fn per_point(pairs: &[(u32, u64)]) -> Self {
        RequestCount::PerPoint {
            counts: pairs
                .iter()
                .map(|&(value, requests)| PointRequests { value, requests })
                .collect(),
        }
    }

    /// Returns the request count for an axis value.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidConfig`] if a per-point table has no entry
    /// for `value`, or if the resolved count is zero.
    pub fn resolve(&self, value: u32) -> Result<u64> {
        let count = match self {
            RequestCount::Fixed { count } => *count,
            RequestCount::PerPoint { counts } => counts
                .iter()
                .find(|entry| entry.value == value)
                .map(|entry| entry.requests)
                .ok_or_else(|| {
                    SweepError::invalid_config(
                        "requests",
                        format!("no request count listed for axis value {}", value),
                    )
                })?,
            RequestCount::Scaled { per_unit, min, max } => {
                if min > max {
                    return Err(SweepError::invalid_config(
                        "requests",
                        format!("scaled rule has min {} above max {}", min, max),
                    ));
                }
                per_unit.saturating_mul(u64::from(value)).clamp(*min, *max)
            }
        };

        if count == 0 {
            return Err(SweepError::invalid_config(
                "requests",
                format!("request count for axis value {} is zero", value),
            ));
        }

        Ok(count)
    }
}

/// A fully resolved sweep: every point has concrete parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    /// Short identifier used for file names (e.g. `client_get`).
    pub name: String,
    /// Title used in log headers and reports.
    pub title: String,
    /// Benchmarked command.
    pub operation: Operation,
    /// Varied parameter.
    pub axis: SweepAxis,
    /// Points in measurement order.
    pub points: Vec<SweepPoint>,
}

impl SweepDefinition {
    /// Number of declared points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the sweep declares no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Category label of every point, in order.
    pub fn categories(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.axis_value(self.axis).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_requests() {
        let rule = RequestCount::fixed(10_000);
        assert_eq!(rule.resolve(1).unwrap(), 10_000);
        assert_eq!(rule.resolve(128).unwrap(), 10_000);
    }

    #[test]
    fn test_per_point_requests() {
        let rule = RequestCount::per_point(&[(1, 10_000), (16, 160_000)]);
        assert_eq!(rule.resolve(16).unwrap(), 160_000);

        let err = rule.resolve(4).unwrap_err();
        assert!(err.to_string().contains("axis value 4"));
    }

    #[test]
    fn test_scaled_requests_clamped() {
        let rule = RequestCount::Scaled {
            per_unit: 10_000,
            min: 20_000,
            max: 1_000_000,
        };
        assert_eq!(rule.resolve(1).unwrap(), 20_000);
        assert_eq!(rule.resolve(16).unwrap(), 160_000);
        assert_eq!(rule.resolve(4096).unwrap(), 1_000_000);
    }

    #[test]
    fn test_scaled_rejects_inverted_bounds() {
        let rule = RequestCount::Scaled {
            per_unit: 1,
            min: 10,
            max: 5,
        };
        assert!(rule.resolve(1).is_err());
    }

    #[test]
    fn test_zero_requests_rejected() {
        assert!(RequestCount::fixed(0).resolve(1).is_err());
    }

    #[test]
    fn test_request_rule_yaml() {
        let yaml = "rule: per_point\ncounts:\n  - value: 1\n    requests: 100\n  - value: 4\n    requests: 400\n";
        let rule: RequestCount = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule, RequestCount::per_point(&[(1, 100), (4, 400)]));
    }

    #[test]
    fn test_axis_value_and_categories() {
        let sweep = SweepDefinition {
            name: "batch_get".to_string(),
            title: "GET, varying pipeline depth".to_string(),
            operation: Operation::Get,
            axis: SweepAxis::Pipeline,
            points: vec![SweepPoint::new(50, 1, 100), SweepPoint::new(50, 16, 1600)],
        };
        assert_eq!(sweep.categories(), vec!["1", "16"]);
        assert_eq!(sweep.points[1].axis_value(SweepAxis::Clients), 50);
        assert_eq!(sweep.len(), 2);
    }
}
