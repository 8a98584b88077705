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

//! kvsweep command line interface

use clap::Parser;
use kvsweep_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// kvsweep - compare wire-compatible key-value servers
///
/// Sweeps client sessions or pipeline depth, runs the benchmark client
/// against every endpoint at every point, and reports aligned throughput and
/// latency for a baseline and one or more candidates.
///
/// # Examples
///
/// ```bash
/// # Print the commands the default sweeps would run
/// kvsweep plan
///
/// # Compare two servers on the client-session GET sweep
/// kvsweep run -e redis=6378 -e rutin=6379 -s client_get
///
/// # Parse a captured benchmark output
/// kvsweep extract output.txt
/// ```
#[derive(Parser)]
#[command(name = "kvsweep")]
#[command(author, version, about = "Key-value server benchmark comparison", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "kvsweep=debug" } else { "kvsweep=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn").add_directive(directive.parse().expect("valid log directive")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
