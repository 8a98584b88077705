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

//! Metric extraction from benchmark client output.
//!
//! The benchmark client has no structured output mode, so metrics are
//! scraped from its text. Extraction is tolerant: every metric is looked up
//! independently, the first syntactic match wins, and a metric that cannot
//! be found is `None`. Units and ranges are not validated.
//!
//! Two output shapes are understood:
//!
//! ```text
//! GET: 48000.55 requests per second, p50=0.479 msec
//! ```
//!
//! and the full summary block:
//!
//! ```text
//! Summary:
//!   throughput summary: 48000.55 requests per second
//!   latency summary (msec):
//!           avg       min       p50       p95       p99       max
//!         0.503     0.120     0.479     0.807     1.031     2.663
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static THROUGHPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s+requests per second").expect("valid throughput pattern")
});

static P50_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"p50=(\d+(?:\.\d+)?)\s*msec").expect("valid p50 pattern"));

static SUMMARY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)latency summary\s*\(msec\)").expect("valid summary pattern"));

/// A metric reported by the benchmark client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Completed requests per second.
    #[serde(rename = "throughput_ops_per_sec")]
    Throughput,
    /// Median latency in milliseconds.
    #[serde(rename = "latency_p50_ms")]
    LatencyP50,
    /// Mean latency in milliseconds.
    #[serde(rename = "latency_avg_ms")]
    LatencyAvg,
    /// 95th percentile latency in milliseconds.
    #[serde(rename = "latency_p95_ms")]
    LatencyP95,
    /// 99th percentile latency in milliseconds.
    #[serde(rename = "latency_p99_ms")]
    LatencyP99,
    /// Maximum latency in milliseconds.
    #[serde(rename = "latency_max_ms")]
    LatencyMax,
}

impl Metric {
    /// Every metric, in report order.
    pub const ALL: [Metric; 6] = [
        Metric::Throughput,
        Metric::LatencyP50,
        Metric::LatencyAvg,
        Metric::LatencyP95,
        Metric::LatencyP99,
        Metric::LatencyMax,
    ];

    /// Stable metric key used in datasets and file names.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Throughput => "throughput_ops_per_sec",
            Metric::LatencyP50 => "latency_p50_ms",
            Metric::LatencyAvg => "latency_avg_ms",
            Metric::LatencyP95 => "latency_p95_ms",
            Metric::LatencyP99 => "latency_p99_ms",
            Metric::LatencyMax => "latency_max_ms",
        }
    }

    /// Short human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput",
            Metric::LatencyP50 => "Latency p50",
            Metric::LatencyAvg => "Latency avg",
            Metric::LatencyP95 => "Latency p95",
            Metric::LatencyP99 => "Latency p99",
            Metric::LatencyMax => "Latency max",
        }
    }

    /// Unit of values after [`Metric::to_display`].
    pub fn display_unit(&self) -> &'static str {
        match self {
            Metric::Throughput => "Kops/sec",
            _ => "msec",
        }
    }

    /// Converts a raw value into the display unit.
    pub fn to_display(&self, raw: f64) -> f64 {
        match self {
            Metric::Throughput => raw / 1_000.0,
            _ => raw,
        }
    }

    /// Whether larger values are better.
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Metric::Throughput)
    }

    /// Looks a metric up by its key.
    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.key() == key)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Metrics extracted from one run.
///
/// Every metric is always present as a key; `None` means the value was not
/// found in the output, which is distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    values: BTreeMap<Metric, Option<f64>>,
}

impl MetricSample {
    /// A sample with every metric missing.
    pub fn empty() -> Self {
        Self {
            values: Metric::ALL.iter().map(|&m| (m, None)).collect(),
        }
    }

    /// Returns the value of a metric.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied().flatten()
    }

    /// Sets the value of a metric.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.values.insert(metric, value);
    }

    /// Builder-style [`MetricSample::set`].
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// Number of metrics that were found.
    pub fn found_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    /// Returns whether no metric was found.
    pub fn is_empty(&self) -> bool {
        self.found_count() == 0
    }

    /// Iterates over `(metric, value)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }
}

impl Default for MetricSample {
    fn default() -> Self {
        Self::empty()
    }
}

/// Extracts every known metric from benchmark client output.
///
/// Never fails: malformed, truncated or empty output simply yields missing
/// values. Applying it twice to the same text yields the same sample.
///
/// # Examples
///
/// ```
/// use kvsweep::extract::{extract, Metric};
///
/// let sample = extract("GET: 48000.55 requests per second, p50=1.234 msec");
/// assert_eq!(sample.get(Metric::Throughput), Some(48000.55));
/// assert_eq!(sample.get(Metric::LatencyP50), Some(1.234));
/// assert_eq!(sample.get(Metric::LatencyP99), None);
/// ```
pub fn extract(text: &str) -> MetricSample {
    // Progress lines are redrawn with bare carriage returns.
    let normalized = text.replace('\r', "\n");
    let summary = LatencySummary::parse(&normalized);

    let mut sample = MetricSample::empty();
    for metric in Metric::ALL {
        sample.set(metric, find_metric(metric, &normalized, summary.as_ref()));
    }
    sample
}

fn find_metric(metric: Metric, text: &str, summary: Option<&LatencySummary>) -> Option<f64> {
    let column = |name: &str| summary.and_then(|s| s.column(name));

    match metric {
        Metric::Throughput => capture_number(&THROUGHPUT, text),
        Metric::LatencyP50 => capture_number(&P50_INLINE, text).or_else(|| column("p50")),
        Metric::LatencyAvg => column("avg"),
        Metric::LatencyP95 => column("p95"),
        Metric::LatencyP99 => column("p99"),
        Metric::LatencyMax => column("max"),
    }
}

fn capture_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// The column table that follows `latency summary (msec):`.
#[derive(Debug)]
struct LatencySummary {
    columns: Vec<(String, f64)>,
}

impl LatencySummary {
    fn parse(text: &str) -> Option<Self> {
        let heading = SUMMARY_HEADING.find(text)?;
        let mut lines = text[heading.end()..]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != ":");

        let header: Vec<&str> = lines.next()?.split_whitespace().collect();
        let values: Vec<f64> = lines
            .next()?
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;

        if header.is_empty() || header.len() != values.len() {
            return None;
        }

        Some(Self {
            columns: header
                .into_iter()
                .map(|h| h.to_ascii_lowercase())
                .zip(values)
                .collect(),
        })
    }

    fn column(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| *value)
    }
}
