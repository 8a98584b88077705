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

//! Run sweeps end to end.

use crate::error::CliError;
use colored::Colorize;
use kvsweep::harness::{
    Aggregator, EndpointComparison, ProcessExecutor, RespProbe, RunDriver, SweepController,
    SweepSeries,
};
use kvsweep::reporters::{format_comparison, print_series, write_reports};
use kvsweep::{compare_to_baseline, AbortHandle, HarnessConfig, Metric, SweepError};
use tracing::info;

/// Runs the selected sweeps against the configured endpoints.
///
/// Each sweep is printed and reported as soon as it ends, so a later
/// unreachable endpoint does not lose earlier results. Ctrl-C requests a
/// stop after the point in progress (the benchmark client runs in its own
/// process group and is not interrupted); completed points are still printed
/// and reported, and the command then fails with [`SweepError::Aborted`].
pub fn run(config: &HarnessConfig, selected: &[String]) -> Result<(), CliError> {
    let sweeps = config.sweep_definitions(selected)?;

    let abort = AbortHandle::new();
    let handler = abort.clone();
    ctrlc::set_handler(move || {
        handler.abort();
        eprintln!("\nInterrupted; stopping after the current point");
    })
    .map_err(|e| CliError::Signal(e.to_string()))?;

    let driver = RunDriver::new(
        config.client.clone(),
        ProcessExecutor::new(),
        RespProbe::new(config.probe_timeout()),
    );
    let controller = SweepController::new(driver).with_abort_handle(abort);
    let mut aggregator = Aggregator::new(&config.output.log_path);

    info!(
        sweeps = sweeps.len(),
        endpoints = config.endpoints.len(),
        log = %config.output.log_path.display(),
        "starting run"
    );
    let results = controller.run_all(&sweeps, &config.endpoints, &mut aggregator, |series| {
        report(series, config)
    })?;

    println!(
        "{} results appended to {}",
        "✓".green().bold(),
        config.output.log_path.display()
    );

    match results.last() {
        Some(last) if !last.is_complete() => Err(SweepError::Aborted {
            sweep: last.sweep().name.clone(),
            completed: last.len(),
            declared: last.sweep().len(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Prints and writes the reports of one finished sweep.
fn report(series: &SweepSeries, config: &HarnessConfig) -> kvsweep::Result<()> {
    print_series(series);
    println!();
    for metric in [Metric::Throughput, Metric::LatencyP50] {
        for comparison in compare_to_baseline(series, metric) {
            print_comparison(&comparison);
        }
    }

    for path in write_reports(series, &config.output)? {
        println!("{} {}", "wrote".dimmed(), path.display());
    }
    Ok(())
}

fn print_comparison(comparison: &EndpointComparison) {
    let text = format_comparison(comparison);
    let mut lines = text.lines();

    if let Some(summary) = lines.next() {
        let colored = match comparison.mean_change_pct {
            Some(mean) if (mean > 0.0) == comparison.metric.higher_is_better() => summary.green(),
            Some(_) => summary.red(),
            None => summary.normal(),
        };
        println!("{}", colored.bold());
    }
    for line in lines {
        println!("{}", line);
    }
}
