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

//! Append-only result log.
//!
//! Every sweep run appends a timestamped section header followed by one line
//! per completed point. Lines are written with a single `write_all` and
//! synced before the next point starts, so an interrupted sweep leaves a
//! readable prefix. Existing content is never truncated or rewritten.

use crate::core::endpoint::Endpoint;
use crate::core::point::{SweepAxis, SweepPoint};
use crate::error::{Result, SweepError};
use crate::extract::{Metric, MetricSample};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Placeholder for a metric that was not found.
pub const MISSING: &str = "n/a";

/// Handle to the result log, opened in append mode.
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: File,
}

impl ResultLog {
    /// Opens (creating if needed) the log and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SweepError::io_error(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SweepError::io_error(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `text` followed by a newline and syncs it to disk.
    pub fn append_line(&mut self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .map_err(|e| SweepError::io_error(&self.path, e))
    }
}

/// Section header written when a sweep starts.
///
/// ```
/// use kvsweep::reporters::log::section_header;
/// use kvsweep::Endpoint;
///
/// let header = section_header(
///     "2025-01-01 12:00:00",
///     "GET sweep",
///     &[Endpoint::new("redis", "127.0.0.1", 6378)],
/// );
/// assert_eq!(header, "\n=== 2025-01-01 12:00:00 | GET sweep | redis=127.0.0.1:6378 ===");
/// ```
pub fn section_header(timestamp: &str, title: &str, endpoints: &[Endpoint]) -> String {
    let targets = endpoints
        .iter()
        .map(|e| format!("{}={}", e.name, e.address()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("\n=== {} | {} | {} ===", timestamp, title, targets)
}

/// One log line summarising every endpoint's throughput and p50 latency at
/// a point.
pub fn point_line(
    axis: SweepAxis,
    point: &SweepPoint,
    endpoints: &[String],
    samples: &[MetricSample],
) -> String {
    let mut line = format!("{}: {}", axis.label(), point.axis_value(axis));

    for (name, sample) in endpoints.iter().zip(samples) {
        line.push_str(&format!(
            " | {}: throughput={} p50={}",
            name,
            format_value(sample, Metric::Throughput),
            format_value(sample, Metric::LatencyP50),
        ));
    }

    line
}

fn format_value(sample: &MetricSample, metric: Metric) -> String {
    match sample.get(metric) {
        Some(raw) => {
            let value = metric.to_display(raw);
            match metric {
                Metric::Throughput => format!("{:.2} {}", value, metric.display_unit()),
                _ => format!("{:.3} {}", value, metric.display_unit()),
            }
        }
        None => MISSING.to_string(),
    }
}
