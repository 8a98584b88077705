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

//! Liveness check of every endpoint.

use crate::error::CliError;
use colored::Colorize;
use kvsweep::harness::{EndpointProbe, RespProbe};
use kvsweep::HarnessConfig;

/// Pings every endpoint and prints one status line per endpoint.
///
/// Every endpoint is probed even after a failure so the output lists all
/// unreachable ones.
pub fn probe(config: &HarnessConfig) -> Result<(), CliError> {
    let probe = RespProbe::new(config.probe_timeout());
    let mut failed = 0;

    for endpoint in &config.endpoints {
        match probe.ping(endpoint) {
            Ok(()) => println!("{} {} {}", "✓".green().bold(), endpoint.name, endpoint.address()),
            Err(e) => {
                failed += 1;
                println!("{} {}", "✗".red().bold(), e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::ProbeFailed {
            failed,
            total: config.endpoints.len(),
        });
    }
    Ok(())
}
