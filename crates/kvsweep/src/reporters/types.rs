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

//! Report types.
//!
//! A [`ComparisonReport`] is the display-ready projection of one metric of a
//! sweep: categories in point order, one value column per endpoint, values
//! already converted to the metric's display unit.

use crate::extract::Metric;
use crate::harness::series::SweepSeries;
use serde::{Deserialize, Serialize};

/// How charts draw missing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Draw missing values as zero-height bars.
    #[default]
    Zero,
    /// Leave a gap where the value is missing.
    Omit,
}

impl NullPolicy {
    /// Returns the policy as a string.
    pub fn as_str(&self) -> &str {
        match self {
            NullPolicy::Zero => "zero",
            NullPolicy::Omit => "omit",
        }
    }
}

/// Values of one endpoint in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSeries {
    /// Endpoint name.
    pub endpoint: String,
    /// One value per category, in display units.
    pub values: Vec<Option<f64>>,
}

/// One metric of one sweep, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Sweep name, used for file names.
    pub sweep: String,
    /// Report title.
    pub title: String,
    /// Label of the x axis.
    pub axis_label: String,
    /// Reported metric.
    pub metric: Metric,
    /// Display unit of the values.
    pub unit: String,
    /// Category labels, in point order.
    pub categories: Vec<String>,
    /// One series per endpoint, in endpoint order.
    pub series: Vec<ReportSeries>,
}

impl ComparisonReport {
    /// Label of the y axis, e.g. `Throughput (Kops/sec)`.
    pub fn value_label(&self) -> String {
        format!("{} ({})", self.metric.label(), self.unit)
    }

    /// Largest present value, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns whether the report has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Projects one metric of a series into a report.
///
/// Point order and endpoint order are preserved; the series itself is not
/// modified.
pub fn render(series: &SweepSeries, metric: Metric) -> ComparisonReport {
    let projected = series.metric(metric);
    let sweep = series.sweep();

    ComparisonReport {
        sweep: sweep.name.clone(),
        title: format!("{}: {}", sweep.title, metric.label()),
        axis_label: sweep.axis.label().to_string(),
        metric,
        unit: metric.display_unit().to_string(),
        categories: projected.categories,
        series: projected
            .columns
            .into_iter()
            .map(|(endpoint, values)| ReportSeries {
                endpoint,
                values: values
                    .into_iter()
                    .map(|v| v.map(|raw| metric.to_display(raw)))
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoint::Endpoint;
    use crate::core::point::{Operation, SweepAxis, SweepDefinition, SweepPoint};
    use crate::extract::MetricSample;

    fn series() -> SweepSeries {
        let sweep = SweepDefinition {
            name: "batch_get".to_string(),
            title: "GET by pipeline".to_string(),
            operation: Operation::Get,
            axis: SweepAxis::Pipeline,
            points: vec![SweepPoint::new(50, 1, 100), SweepPoint::new(50, 4, 400)],
        };
        let mut s = SweepSeries::new(
            sweep,
            &[Endpoint::new("a", "h", 1), Endpoint::new("b", "h", 2)],
        );
        s.push_point(vec![
            MetricSample::empty().with(Metric::Throughput, 10_500.0),
            MetricSample::empty().with(Metric::Throughput, 9_800.0),
        ])
        .unwrap();
        s.push_point(vec![
            MetricSample::empty().with(Metric::Throughput, 20_100.0),
            MetricSample::empty(),
        ])
        .unwrap();
        s
    }

    #[test]
    fn test_render_scales_throughput() {
        let s = series();
        let report = render(&s, Metric::Throughput);

        assert_eq!(report.sweep, "batch_get");
        assert_eq!(report.axis_label, "Pipeline Depth");
        assert_eq!(report.unit, "Kops/sec");
        assert_eq!(report.categories, vec!["1", "4"]);
        assert_eq!(report.series[0].values, vec![Some(10.5), Some(20.1)]);
        assert_eq!(report.series[1].values, vec![Some(9.8), None]);
        assert_eq!(report.max_value(), Some(20.1));
        assert_eq!(report.value_label(), "Throughput (Kops/sec)");
    }

    #[test]
    fn test_render_is_repeatable() {
        let s = series();
        let before = s.clone();
        assert_eq!(render(&s, Metric::LatencyP50), render(&s, Metric::LatencyP50));
        assert_eq!(s, before);
    }

    #[test]
    fn test_max_value_all_missing() {
        let report = render(&series(), Metric::LatencyP99);
        assert_eq!(report.max_value(), None);
    }

    #[test]
    fn test_null_policy_serde() {
        let policy: NullPolicy = serde_yaml::from_str("omit").unwrap();
        assert_eq!(policy, NullPolicy::Omit);
        assert_eq!(NullPolicy::default().as_str(), "zero");
    }
}
