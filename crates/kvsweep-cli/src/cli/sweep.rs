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

//! Commands that run against the configured endpoints.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use kvsweep::core::HarnessConfig;
use kvsweep::{Endpoint, NullPolicy};
use std::path::PathBuf;

/// Where the configuration comes from and what to override.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (YAML, or JSON with a .json extension)
    ///
    /// Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Endpoint as NAME=HOST:PORT or NAME=PORT (repeatable, first is the baseline)
    #[arg(short, long = "endpoint", value_name = "NAME=HOST:PORT")]
    pub endpoints: Vec<Endpoint>,

    /// Sweep to run (repeatable); all configured sweeps when omitted
    #[arg(short, long = "sweep", value_name = "NAME")]
    pub sweeps: Vec<String>,
}

impl ConfigArgs {
    /// Loads the configuration and applies command-line overrides.
    pub fn load(&self) -> Result<HarnessConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        if !self.endpoints.is_empty() {
            config = config.with_endpoints(self.endpoints.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments of `run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Result log (appended to)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Directory for charts, HTML pages and JSON datasets
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Only print tables; skip chart and HTML files
    #[arg(long)]
    pub no_charts: bool,

    /// Leave gaps for missing values instead of zero-height bars
    #[arg(long)]
    pub omit_missing: bool,
}

impl RunArgs {
    /// Loads the configuration with every `run` override applied.
    pub fn load(&self) -> Result<HarnessConfig, CliError> {
        let mut config = self.config.load()?;

        if let Some(log) = &self.log {
            config = config.with_log_path(log);
        }
        if let Some(dir) = &self.report_dir {
            config = config.with_report_dir(dir);
        }
        if self.no_charts {
            config.output.charts = false;
        }
        if self.omit_missing {
            config.output.null_policy = NullPolicy::Omit;
        }

        Ok(config)
    }
}

/// Sweep commands.
#[derive(Subcommand)]
pub enum SweepCommands {
    /// Run sweeps and compare the endpoints
    ///
    /// Probes every endpoint, runs the benchmark client for every point and
    /// endpoint, appends results to the log, prints tables and a comparison
    /// against the first endpoint, and writes chart, HTML and JSON reports.
    /// Ctrl-C stops after the point in progress.
    Run(RunArgs),

    /// Check that every endpoint answers PING
    Probe {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the benchmark commands a run would execute, without running them
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl SweepCommands {
    /// Execute the sweep command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            SweepCommands::Run(args) => {
                let config = args.load()?;
                commands::run(&config, &args.config.sweeps)
            }
            SweepCommands::Probe { config } => commands::probe(&config.load()?),
            SweepCommands::Plan { config } => {
                let sweeps = config.sweeps.clone();
                commands::plan(&config.load()?, &sweeps)
            }
        }
    }
}
