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

//! Baseline comparison.
//!
//! The first endpoint of a series is the baseline; every other endpoint is
//! compared to it point by point for a single metric.

use crate::extract::Metric;
use crate::harness::series::SweepSeries;
use serde::{Deserialize, Serialize};

/// Outcome of a single point for the candidate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Candidate did better than the baseline.
    Better,
    /// Candidate did worse than the baseline.
    Worse,
    /// Both values are equal.
    Equal,
    /// At least one value is missing.
    Missing,
}

/// Comparison of one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointComparison {
    /// Category label (axis value).
    pub category: String,
    /// Baseline value, raw units.
    pub baseline: Option<f64>,
    /// Candidate value, raw units.
    pub candidate: Option<f64>,
    /// Percentage change of candidate vs baseline (positive = larger).
    pub change_pct: Option<f64>,
    /// Outcome, taking the metric's direction into account.
    pub verdict: Verdict,
}

/// Comparison of one candidate endpoint against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointComparison {
    /// Baseline endpoint name.
    pub baseline: String,
    /// Candidate endpoint name.
    pub candidate: String,
    /// Compared metric.
    pub metric: Metric,
    /// Per-point results, in sweep order.
    pub points: Vec<PointComparison>,
    /// Mean of `change_pct` over points where both values exist.
    pub mean_change_pct: Option<f64>,
}

impl EndpointComparison {
    /// Points where the candidate did better.
    pub fn wins(&self) -> usize {
        self.count(Verdict::Better)
    }

    /// Points where the candidate did worse.
    pub fn losses(&self) -> usize {
        self.count(Verdict::Worse)
    }

    fn count(&self, verdict: Verdict) -> usize {
        self.points.iter().filter(|p| p.verdict == verdict).count()
    }
}

/// Compares every non-baseline endpoint of `series` to the first one.
///
/// Returns an empty vector for series with fewer than two endpoints.
pub fn compare_to_baseline(series: &SweepSeries, metric: Metric) -> Vec<EndpointComparison> {
    let projected = series.metric(metric);
    let Some((baseline_name, baseline_values)) = projected.columns.first() else {
        return Vec::new();
    };

    projected
        .columns
        .iter()
        .skip(1)
        .map(|(candidate_name, candidate_values)| {
            let points: Vec<PointComparison> = projected
                .categories
                .iter()
                .zip(baseline_values.iter().zip(candidate_values))
                .map(|(category, (&baseline, &candidate))| {
                    compare_point(category, baseline, candidate, metric)
                })
                .collect();

            let changes: Vec<f64> = points.iter().filter_map(|p| p.change_pct).collect();
            let mean_change_pct = if changes.is_empty() {
                None
            } else {
                Some(changes.iter().sum::<f64>() / changes.len() as f64)
            };

            EndpointComparison {
                baseline: baseline_name.clone(),
                candidate: candidate_name.clone(),
                metric,
                points,
                mean_change_pct,
            }
        })
        .collect()
}

fn compare_point(
    category: &str,
    baseline: Option<f64>,
    candidate: Option<f64>,
    metric: Metric,
) -> PointComparison {
    let (change_pct, verdict) = match (baseline, candidate) {
        (Some(b), Some(c)) => {
            let change = if b != 0.0 {
                Some((c - b) / b * 100.0)
            } else {
                None
            };
            let verdict = if c == b {
                Verdict::Equal
            } else if (c > b) == metric.higher_is_better() {
                Verdict::Better
            } else {
                Verdict::Worse
            };
            (change, verdict)
        }
        _ => (None, Verdict::Missing),
    };

    PointComparison {
        category: category.to_string(),
        baseline,
        candidate,
        change_pct,
        verdict,
    }
}
