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

//! CLI command definitions and argument parsing.
//!
//! - [`sweep`]: Commands that talk to endpoints (run, probe, plan)
//! - [`utility`]: Offline helpers (extract, init-config, completion)

mod sweep;
mod utility;

use crate::error::CliError;
use clap::Subcommand;

pub use sweep::{ConfigArgs, RunArgs, SweepCommands};
pub use utility::{ConfigFormat, UtilityCommands};

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Sweep (run, probe, plan)
/// └── Utility (extract, init-config, completion)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    // Sweep commands - flattened to appear at top level
    #[command(flatten)]
    Sweep(SweepCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command with the provided arguments.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Sweep(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
