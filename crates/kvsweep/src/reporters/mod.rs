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

//! Result reporters.
//!
//! Renders sweep series as console tables, SVG charts, HTML pages and JSON
//! datasets, and owns the append-only result log format.
//!
//! # Modules
//!
//! - `types`: Report data structures and the metric projection
//! - `log`: Append-only result log
//! - `table`: Plain-text and Markdown tables
//! - `chart`: Grouped bar charts (SVG)
//! - `console`: Console output
//! - `html`: HTML export
//! - `json`: JSON export

pub mod chart;
pub mod console;
pub mod html;
pub mod json;
pub mod log;
pub mod table;
pub mod types;

pub use chart::render_svg;
pub use console::{format_comparison, format_series, print_comparisons, print_series};
pub use html::export_html;
pub use json::{export_json, load_json};
pub use log::ResultLog;
pub use table::{render_markdown, render_table};
pub use types::{render, ComparisonReport, NullPolicy, ReportSeries};

use crate::core::config::OutputConfig;
use crate::error::{Result, SweepError};
use crate::harness::series::SweepSeries;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| SweepError::io_error(dir, e))
}

/// Writes every report artifact of a sweep below `output.report_dir`.
///
/// Layout: `json/<sweep>.json` always; with charts enabled also
/// `svg/<sweep>_<metric>.svg` and `html/<sweep>.html`. Returns the written
/// paths.
pub fn write_reports(series: &SweepSeries, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    let name = &series.sweep().name;
    let mut written = Vec::new();

    let json_dir = output.report_dir.join("json");
    ensure_dir(&json_dir)?;
    let json_path = json_dir.join(format!("{}.json", name));
    export_json(series, &json_path)?;
    written.push(json_path);

    if output.charts {
        let svg_dir = output.report_dir.join("svg");
        ensure_dir(&svg_dir)?;
        for metric in html::CHARTED {
            let path = svg_dir.join(format!("{}_{}.svg", name, metric.key()));
            let svg = render_svg(&render(series, metric), output.null_policy);
            fs::write(&path, svg).map_err(|e| SweepError::io_error(&path, e))?;
            written.push(path);
        }

        let html_dir = output.report_dir.join("html");
        ensure_dir(&html_dir)?;
        let html_path = html_dir.join(format!("{}.html", name));
        export_html(series, output.null_policy, &html_path)?;
        written.push(html_path);
    }

    debug!(sweep = %name, files = written.len(), "reports written");
    Ok(written)
}
