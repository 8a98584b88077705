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

//! Aligned per-endpoint results of a sweep.
//!
//! Samples are stored one row per completed point with one column per
//! endpoint. A row can only be appended whole, so the columns of every
//! endpoint always have the same length and index `i` always refers to the
//! same sweep point.

use crate::core::endpoint::Endpoint;
use crate::core::point::{SweepAxis, SweepDefinition, SweepPoint};
use crate::error::{Result, SweepError};
use crate::extract::{Metric, MetricSample};
use serde::{Deserialize, Serialize};

/// Results of one sweep, in declared point order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSeries {
    sweep: SweepDefinition,
    endpoints: Vec<String>,
    rows: Vec<Vec<MetricSample>>,
}

impl SweepSeries {
    /// Creates an empty series for `sweep` measured against `endpoints`.
    pub fn new(sweep: SweepDefinition, endpoints: &[Endpoint]) -> Self {
        Self {
            sweep,
            endpoints: endpoints.iter().map(|e| e.name.clone()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends the samples of the next point, one per endpoint in declared
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Misaligned`] if the number of samples differs
    /// from the number of endpoints or every declared point is already
    /// recorded.
    pub fn push_point(&mut self, samples: Vec<MetricSample>) -> Result<()> {
        if samples.len() != self.endpoints.len() {
            return Err(SweepError::Misaligned(format!(
                "point {} of '{}' has {} samples for {} endpoints",
                self.rows.len(),
                self.sweep.name,
                samples.len(),
                self.endpoints.len()
            )));
        }
        if self.rows.len() >= self.sweep.len() {
            return Err(SweepError::Misaligned(format!(
                "sweep '{}' already has all {} points",
                self.sweep.name,
                self.sweep.len()
            )));
        }

        self.rows.push(samples);
        Ok(())
    }

    /// The sweep this series belongs to.
    pub fn sweep(&self) -> &SweepDefinition {
        &self.sweep
    }

    /// Endpoint names in column order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Index of an endpoint column.
    pub fn endpoint_index(&self, name: &str) -> Option<usize> {
        self.endpoints.iter().position(|e| e == name)
    }

    /// Number of points recorded so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether no point has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns whether every declared point has been recorded.
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.sweep.len()
    }

    /// Recorded points, in order.
    pub fn points(&self) -> &[SweepPoint] {
        &self.sweep.points[..self.rows.len()]
    }

    /// Category labels of recorded points.
    pub fn categories(&self) -> Vec<String> {
        let axis = self.sweep.axis;
        self.points()
            .iter()
            .map(|p| p.axis_value(axis).to_string())
            .collect()
    }

    /// Sample for a `(point, endpoint)` pair.
    pub fn sample(&self, point: usize, endpoint: usize) -> Option<&MetricSample> {
        self.rows.get(point).and_then(|row| row.get(endpoint))
    }

    /// All samples of one point, in endpoint order.
    pub fn row(&self, point: usize) -> Option<&[MetricSample]> {
        self.rows.get(point).map(Vec::as_slice)
    }

    /// Projects one metric into aligned per-endpoint columns.
    pub fn metric(&self, metric: Metric) -> MetricSeries {
        let columns = self
            .endpoints
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values = self.rows.iter().map(|row| row[i].get(metric)).collect();
                (name.clone(), values)
            })
            .collect();

        MetricSeries {
            metric,
            axis: self.sweep.axis,
            categories: self.categories(),
            columns,
        }
    }
}

/// One metric of a sweep: a value (or gap) per point, per endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    /// The projected metric.
    pub metric: Metric,
    /// Sweep axis of the categories.
    pub axis: SweepAxis,
    /// Category label per point.
    pub categories: Vec<String>,
    /// `(endpoint name, values)`; every value vector has `categories.len()`
    /// entries.
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl MetricSeries {
    /// Values of one endpoint.
    pub fn values(&self, endpoint: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, values)| values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::point::Operation;

    fn sweep(points: usize) -> SweepDefinition {
        SweepDefinition {
            name: "client_get".to_string(),
            title: "GET".to_string(),
            operation: Operation::Get,
            axis: SweepAxis::Clients,
            points: (1..=points as u32)
                .map(|c| SweepPoint::new(c, 1, 100))
                .collect(),
        }
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("a", "localhost", 1),
            Endpoint::new("b", "localhost", 2),
        ]
    }

    fn throughput(v: f64) -> MetricSample {
        MetricSample::empty().with(Metric::Throughput, v)
    }

    #[test]
    fn test_push_and_project() {
        let mut series = SweepSeries::new(sweep(2), &endpoints());
        series.push_point(vec![throughput(10.5), throughput(9.8)]).unwrap();
        series
            .push_point(vec![throughput(20.1), MetricSample::empty()])
            .unwrap();

        assert!(series.is_complete());
        let projected = series.metric(Metric::Throughput);
        assert_eq!(projected.categories, vec!["1", "2"]);
        assert_eq!(projected.values("a").unwrap(), &[Some(10.5), Some(20.1)]);
        assert_eq!(projected.values("b").unwrap(), &[Some(9.8), None]);
    }

    #[test]
    fn test_rejects_partial_row() {
        let mut series = SweepSeries::new(sweep(2), &endpoints());
        let err = series.push_point(vec![throughput(1.0)]).unwrap_err();
        assert!(matches!(err, SweepError::Misaligned(_)));
        assert!(series.is_empty());
    }

    #[test]
    fn test_rejects_extra_rows() {
        let mut series = SweepSeries::new(sweep(1), &endpoints());
        series
            .push_point(vec![MetricSample::empty(), MetricSample::empty()])
            .unwrap();
        assert!(series
            .push_point(vec![MetricSample::empty(), MetricSample::empty()])
            .is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_incomplete_series_only_shows_recorded_points() {
        let mut series = SweepSeries::new(sweep(3), &endpoints());
        series
            .push_point(vec![throughput(1.0), throughput(2.0)])
            .unwrap();

        assert!(!series.is_complete());
        assert_eq!(series.points().len(), 1);
        assert_eq!(series.categories(), vec!["1"]);
        assert_eq!(series.sample(0, 1).unwrap().get(Metric::Throughput), Some(2.0));
        assert!(series.sample(1, 0).is_none());
    }

    #[test]
    fn test_json_dataset() {
        let mut series = SweepSeries::new(sweep(1), &endpoints());
        series
            .push_point(vec![throughput(1.0), MetricSample::empty()])
            .unwrap();

        let json = serde_json::to_string(&series).unwrap();
        let back: SweepSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
    }
}
