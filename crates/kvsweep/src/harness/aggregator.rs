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

//! Per-point aggregation into a sweep series and the result log.
//!
//! The aggregator owns the lifecycle of one sweep at a time:
//! `begin` → (`record` × endpoints, `commit_point`) × points → `finish`.
//! A point only becomes visible, in the series and in the log, once every
//! endpoint has been recorded for it.

use crate::core::endpoint::Endpoint;
use crate::core::point::SweepDefinition;
use crate::error::{Result, SweepError};
use crate::extract::MetricSample;
use crate::harness::series::SweepSeries;
use crate::reporters::log::{point_line, section_header, ResultLog};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Collects samples and appends completed points to the result log.
#[derive(Debug)]
pub struct Aggregator {
    log_path: PathBuf,
    log: Option<ResultLog>,
    current: Option<SweepSeries>,
    pending: Vec<MetricSample>,
}

impl Aggregator {
    /// Creates an aggregator writing to `log_path`.
    ///
    /// The file is not touched until the first sweep begins.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            log: None,
            current: None,
            pending: Vec::new(),
        }
    }

    /// Result log location.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Returns whether a sweep is in progress.
    pub fn in_progress(&self) -> bool {
        self.current.is_some()
    }

    /// Returns whether the result log file is currently held open.
    pub fn is_log_open(&self) -> bool {
        self.log.is_some()
    }

    /// Starts a sweep and writes its section header.
    pub fn begin(&mut self, sweep: &SweepDefinition, endpoints: &[Endpoint]) -> Result<()> {
        if let Some(current) = &self.current {
            return Err(SweepError::Misaligned(format!(
                "sweep '{}' started while '{}' is still in progress",
                sweep.name,
                current.sweep().name
            )));
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let header = section_header(&timestamp, &sweep.title, endpoints);
        self.log_mut()?.append_line(&header)?;

        debug!(sweep = %sweep.name, log = %self.log_path.display(), "sweep started");
        self.current = Some(SweepSeries::new(sweep.clone(), endpoints));
        self.pending.clear();
        Ok(())
    }

    /// Records one endpoint's sample for the point in progress.
    ///
    /// Samples must arrive in endpoint order, for the point that comes next
    /// in the sweep.
    pub fn record(
        &mut self,
        point_index: usize,
        endpoint: &Endpoint,
        sample: MetricSample,
    ) -> Result<()> {
        let series = self.current_series()?;

        if point_index != series.len() {
            return Err(SweepError::Misaligned(format!(
                "sample for point {} while point {} of '{}' is in progress",
                point_index,
                series.len(),
                series.sweep().name
            )));
        }

        let slot = self.pending.len();
        match series.endpoints().get(slot) {
            Some(expected) if *expected == endpoint.name => {}
            Some(expected) => {
                return Err(SweepError::Misaligned(format!(
                    "expected sample from '{}' at point {}, got '{}'",
                    expected, point_index, endpoint.name
                )))
            }
            None => {
                return Err(SweepError::Misaligned(format!(
                    "point {} already has a sample from every endpoint",
                    point_index
                )))
            }
        }

        self.pending.push(sample);
        Ok(())
    }

    /// Commits the point in progress to the series and the log.
    pub fn commit_point(&mut self) -> Result<()> {
        let series = self.current_series()?;
        let index = series.len();
        let sweep = series.sweep();
        let point = sweep.points.get(index).copied().ok_or_else(|| {
            SweepError::Misaligned(format!("sweep '{}' has no point {}", sweep.name, index))
        })?;

        if self.pending.len() != series.endpoints().len() {
            return Err(SweepError::Misaligned(format!(
                "point {} of '{}' has {} of {} samples",
                index,
                sweep.name,
                self.pending.len(),
                series.endpoints().len()
            )));
        }

        let line = point_line(sweep.axis, &point, series.endpoints(), &self.pending);
        self.log_mut()?.append_line(&line)?;

        let samples = std::mem::take(&mut self.pending);
        if let Some(series) = self.current.as_mut() {
            series.push_point(samples)?;
        }
        Ok(())
    }

    /// Ends the sweep, closes the log and returns the series.
    pub fn finish(&mut self) -> Result<SweepSeries> {
        if !self.pending.is_empty() {
            return Err(SweepError::Misaligned(format!(
                "finish with {} uncommitted samples",
                self.pending.len()
            )));
        }

        let series = self.take_current()?;
        self.log = None;
        info!(
            sweep = %series.sweep().name,
            points = series.len(),
            "sweep finished"
        );
        Ok(series)
    }

    /// Ends the sweep early, discarding any partial point, and returns the
    /// points completed so far.
    pub fn abort(&mut self) -> Result<SweepSeries> {
        let discarded = self.pending.len();
        self.pending.clear();

        let series = self.take_current()?;
        let marker = format!(
            "--- aborted after {} of {} points ---",
            series.len(),
            series.sweep().len()
        );
        self.log_mut()?.append_line(&marker)?;
        self.log = None;

        info!(
            sweep = %series.sweep().name,
            completed = series.len(),
            discarded,
            "sweep aborted"
        );
        Ok(series)
    }

    fn current_series(&self) -> Result<&SweepSeries> {
        self.current
            .as_ref()
            .ok_or_else(|| SweepError::Misaligned("no sweep in progress".to_string()))
    }

    fn take_current(&mut self) -> Result<SweepSeries> {
        self.current
            .take()
            .ok_or_else(|| SweepError::Misaligned("no sweep in progress".to_string()))
    }

    fn log_mut(&mut self) -> Result<&mut ResultLog> {
        let log = match self.log.take() {
            Some(log) => log,
            None => ResultLog::open(&self.log_path)?,
        };
        Ok(self.log.insert(log))
    }
}
