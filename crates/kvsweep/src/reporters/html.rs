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

//! HTML export: one self-contained page per sweep.

use crate::error::{Result, SweepError};
use crate::extract::Metric;
use crate::harness::comparator::{compare_to_baseline, Verdict};
use crate::harness::series::SweepSeries;
use crate::reporters::chart::{escape, render_svg};
use crate::reporters::table::format_cell;
use crate::reporters::types::{render, ComparisonReport, NullPolicy};
use std::fs;
use std::path::Path;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; color: #222; }
.charts { display: flex; flex-wrap: wrap; gap: 1em; }
.charts svg { max-width: 100%; height: auto; border: 1px solid #ddd; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th { background: #f4f4f4; }
.better { color: #1a7f37; }
.worse { color: #c62828; }
";

/// Metrics charted side by side on the page.
pub const CHARTED: [Metric; 2] = [Metric::Throughput, Metric::LatencyP50];

/// Renders the HTML page of a sweep.
pub fn render_html(series: &SweepSeries, nulls: NullPolicy) -> String {
    let sweep = series.sweep();
    let reports: Vec<ComparisonReport> = CHARTED.iter().map(|m| render(series, *m)).collect();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(&sweep.title)));
    html.push_str(&format!("<style>\n{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str(&format!("<h1>{}</h1>\n", escape(&sweep.title)));
    html.push_str(&format!(
        "<p>Generated: {} &middot; points: {} of {}</p>\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        series.len(),
        sweep.len()
    ));

    html.push_str("<div class=\"charts\">\n");
    for report in &reports {
        html.push_str(&render_svg(report, nulls));
    }
    html.push_str("</div>\n");

    for report in &reports {
        push_table(&mut html, report);
    }

    for comparison in compare_to_baseline(series, Metric::Throughput) {
        html.push_str(&format!(
            "<h2>{} vs {} ({})</h2>\n<ul>\n",
            escape(&comparison.candidate),
            escape(&comparison.baseline),
            comparison.metric.label()
        ));
        for point in &comparison.points {
            let class = match point.verdict {
                Verdict::Better => "better",
                Verdict::Worse => "worse",
                Verdict::Equal | Verdict::Missing => "",
            };
            let change = point
                .change_pct
                .map(|pct| format!("{:+.1}%", pct))
                .unwrap_or_else(|| "n/a".to_string());
            html.push_str(&format!(
                "<li>{} {}: <span class=\"{}\">{}</span></li>\n",
                sweep.axis.label(),
                escape(&point.category),
                class,
                change
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_table(html: &mut String, report: &ComparisonReport) {
    html.push_str(&format!("<h2>{}</h2>\n<table>\n<tr>", escape(&report.title)));
    html.push_str(&format!("<th>{}</th>", escape(&report.axis_label)));
    for s in &report.series {
        html.push_str(&format!(
            "<th>{} ({})</th>",
            escape(&s.endpoint),
            escape(&report.unit)
        ));
    }
    html.push_str("</tr>\n");

    for (i, category) in report.categories.iter().enumerate() {
        html.push_str(&format!("<tr><td>{}</td>", escape(category)));
        for s in &report.series {
            html.push_str(&format!(
                "<td>{}</td>",
                format_cell(report.metric, s.values.get(i).copied().flatten())
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

/// Writes the HTML page of a sweep to `path`.
pub fn export_html(series: &SweepSeries, nulls: NullPolicy, path: &Path) -> Result<()> {
    fs::write(path, render_html(series, nulls)).map_err(|e| SweepError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoint::Endpoint;
    use crate::core::point::{Operation, SweepAxis, SweepDefinition, SweepPoint};
    use crate::extract::MetricSample;
    use tempfile::NamedTempFile;

    fn series() -> SweepSeries {
        let sweep = SweepDefinition {
            name: "client_get".to_string(),
            title: "GET & friends".to_string(),
            operation: Operation::Get,
            axis: SweepAxis::Clients,
            points: vec![SweepPoint::new(1, 1, 100)],
        };
        let mut s = SweepSeries::new(
            sweep,
            &[Endpoint::new("redis", "h", 1), Endpoint::new("rutin", "h", 2)],
        );
        s.push_point(vec![
            MetricSample::empty().with(Metric::Throughput, 100_000.0),
            MetricSample::empty().with(Metric::Throughput, 120_000.0),
        ])
        .unwrap();
        s
    }

    #[test]
    fn test_export_html() {
        let temp = NamedTempFile::new().unwrap();
        export_html(&series(), NullPolicy::Zero, temp.path()).unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        assert!(content.contains("<h1>GET &amp; friends</h1>"));
        assert_eq!(content.matches("<svg ").count(), 2);
        assert!(content.contains("<td>100.00</td><td>120.00</td>"));
        assert!(content.contains("rutin vs redis"));
        assert!(content.contains("+20.0%"));
    }
}
