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

//! Grouped bar charts as standalone SVG.
//!
//! One category per sweep point, one bar per endpoint inside each category.
//! The y axis starts at zero and ends at a rounded maximum so bars of
//! different reports stay visually comparable.

use crate::reporters::table::format_cell;
use crate::reporters::types::{ComparisonReport, NullPolicy};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: usize = 5;
const GROUP_FILL: f64 = 0.8;

/// Bar colors, cycled per endpoint.
pub const PALETTE: [&str; 6] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3",
];

/// Escapes text for use inside SVG/HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rounds `max` up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ceiling(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(max.log10().floor() as i32);
    let scaled = max / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|s| scaled <= *s)
        .unwrap_or(10.0);
    step * magnitude
}

/// Renders a grouped bar chart.
pub fn render_svg(report: &ComparisonReport, nulls: NullPolicy) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = nice_ceiling(report.max_value().unwrap_or(0.0));
    let baseline_y = MARGIN_TOP + plot_h;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"28\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
        WIDTH / 2.0,
        escape(&report.title)
    ));

    // Grid and y tick labels.
    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = baseline_y - plot_h * i as f64 / Y_TICKS as f64;
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#e5e5e5\"/>\n",
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_w,
            y
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(value)
        ));
    }

    // Bars.
    let groups = report.categories.len().max(1) as f64;
    let band = plot_w / groups;
    let bars = report.series.len().max(1) as f64;
    let bar_w = band * GROUP_FILL / bars;

    for (ci, category) in report.categories.iter().enumerate() {
        let group_x = MARGIN_LEFT + band * ci as f64 + band * (1.0 - GROUP_FILL) / 2.0;

        for (si, series) in report.series.iter().enumerate() {
            let value = series.values.get(ci).copied().flatten();
            let height = match (value, nulls) {
                (Some(v), _) => plot_h * (v / y_max).clamp(0.0, 1.0),
                (None, NullPolicy::Zero) => 0.0,
                (None, NullPolicy::Omit) => continue,
            };
            let x = group_x + bar_w * si as f64;

            svg.push_str(&format!(
                "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{} @ {}: {}</title></rect>\n",
                x,
                baseline_y - height,
                bar_w,
                height,
                PALETTE[si % PALETTE.len()],
                escape(&series.endpoint),
                escape(category),
                format_cell(report.metric, value)
            ));
        }

        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            MARGIN_LEFT + band * (ci as f64 + 0.5),
            baseline_y + 18.0,
            escape(category)
        ));
    }

    // Axes and labels.
    svg.push_str(&format!(
        "<line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#444\"/>\n",
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + plot_w,
        b = baseline_y
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        baseline_y + 40.0,
        escape(&report.axis_label)
    ));
    svg.push_str(&format!(
        "<text transform=\"translate(18 {:.1}) rotate(-90)\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_TOP + plot_h / 2.0,
        escape(&report.value_label())
    ));

    // Legend.
    let legend_y = HEIGHT - 22.0;
    for (si, series) in report.series.iter().enumerate() {
        let x = MARGIN_LEFT + 120.0 * si as f64;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            x,
            legend_y - 10.0,
            PALETTE[si % PALETTE.len()]
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
            x + 18.0,
            legend_y,
            escape(&series.endpoint)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn format_tick(value: f64) -> String {
    if value == 0.0 || value.abs() >= 10.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
