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

//! Tabular rendering: one row per point, one column per endpoint.

use crate::extract::Metric;
use crate::reporters::log::MISSING;
use crate::reporters::types::ComparisonReport;

/// Formats one display value for a table cell.
pub fn format_cell(metric: Metric, value: Option<f64>) -> String {
    match value {
        Some(v) if metric == Metric::Throughput => format!("{:.2}", v),
        Some(v) => format!("{:.3}", v),
        None => MISSING.to_string(),
    }
}

fn header(report: &ComparisonReport) -> Vec<String> {
    std::iter::once(report.axis_label.clone())
        .chain(
            report
                .series
                .iter()
                .map(|s| format!("{} ({})", s.endpoint, report.unit)),
        )
        .collect()
}

fn rows(report: &ComparisonReport) -> Vec<Vec<String>> {
    report
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            std::iter::once(category.clone())
                .chain(report.series.iter().map(|s| {
                    format_cell(report.metric, s.values.get(i).copied().flatten())
                }))
                .collect()
        })
        .collect()
}

/// Renders a plain-text table with aligned columns.
///
/// ```text
/// Client Sessions | redis (Kops/sec) | rutin (Kops/sec)
/// ----------------+------------------+-----------------
///               1 |            10.50 |             9.80
/// ```
pub fn render_table(report: &ComparisonReport) -> String {
    let header = header(report);
    let rows = rows(report);

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{}\n", report.title));

    let head: Vec<String> = header
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect();
    out.push_str(head.join(" | ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>w$}", c, w = *w))
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }

    out
}

/// Renders a Markdown table.
pub fn render_markdown(report: &ComparisonReport) -> String {
    let header = header(report);
    let mut md = String::new();

    md.push_str(&format!("### {}\n\n", report.title));
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!(
        "|{}|\n",
        header.iter().map(|_| "---:").collect::<Vec<_>>().join("|")
    ));

    for row in rows(report) {
        md.push_str(&format!("| {} |\n", row.join(" | ")));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::types::ReportSeries;

    fn report() -> ComparisonReport {
        ComparisonReport {
            sweep: "client_get".to_string(),
            title: "GET: Throughput".to_string(),
            axis_label: "Client Sessions".to_string(),
            metric: Metric::Throughput,
            unit: "Kops/sec".to_string(),
            categories: vec!["1".to_string(), "2".to_string()],
            series: vec![
                ReportSeries {
                    endpoint: "A".to_string(),
                    values: vec![Some(10.5), Some(20.1)],
                },
                ReportSeries {
                    endpoint: "B".to_string(),
                    values: vec![Some(9.8), Some(19.0)],
                },
            ],
        }
    }

    #[test]
    fn test_two_aligned_rows() {
        let table = render_table(&report());
        let lines: Vec<&str> = table.lines().collect();

        // title, header, rule, two rows
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Client Sessions | A (Kops/sec) | B (Kops/sec)"));

        let first: Vec<&str> = lines[3].split('|').map(str::trim).collect();
        assert_eq!(first, vec!["1", "10.50", "9.80"]);
        let second: Vec<&str> = lines[4].split('|').map(str::trim).collect();
        assert_eq!(second, vec!["2", "20.10", "19.00"]);
    }

    #[test]
    fn test_missing_value_renders_na() {
        let mut r = report();
        r.series[1].values[0] = None;
        let table = render_table(&r);
        assert!(table.lines().nth(3).unwrap().ends_with("n/a"));
    }

    #[test]
    fn test_markdown() {
        let md = render_markdown(&report());
        assert!(md.starts_with("### GET: Throughput\n"));
        assert!(md.contains("| Client Sessions | A (Kops/sec) | B (Kops/sec) |"));
        assert!(md.contains("|---:|---:|---:|"));
        assert!(md.contains("| 2 | 20.10 | 19.00 |"));
    }

    #[test]
    fn test_latency_precision() {
        assert_eq!(format_cell(Metric::LatencyP50, Some(0.4791)), "0.479");
        assert_eq!(format_cell(Metric::Throughput, None), "n/a");
    }
}
