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

//! Dry run: the commands a sweep would execute.

use crate::error::CliError;
use colored::Colorize;
use kvsweep::harness::build_command;
use kvsweep::harness::probe::{WARMUP_KEY, WARMUP_VALUE};
use kvsweep::HarnessConfig;

/// Returns the plan of the selected sweeps as printable lines.
///
/// Sweep headers start with `#`; every other line is one benchmark command,
/// in execution order.
pub fn plan_lines(config: &HarnessConfig, selected: &[String]) -> Result<Vec<String>, CliError> {
    let sweeps = config.sweep_definitions(selected)?;
    let mut lines = Vec::new();

    if config.client.warmup {
        lines.push(format!(
            "# before each run: SET {} {} on the endpoint",
            WARMUP_KEY, WARMUP_VALUE
        ));
    }

    for sweep in &sweeps {
        lines.push(format!(
            "# {} ({} points x {} endpoints): {}",
            sweep.name,
            sweep.len(),
            config.endpoints.len(),
            sweep.title
        ));
        for point in &sweep.points {
            for endpoint in &config.endpoints {
                lines.push(build_command(&config.client, endpoint, sweep.operation, point).command_line());
            }
        }
    }

    Ok(lines)
}

/// Prints the plan of the selected sweeps.
pub fn plan(config: &HarnessConfig, selected: &[String]) -> Result<(), CliError> {
    for line in plan_lines(config, selected)? {
        if line.starts_with('#') {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_default_client_sweep() {
        let config = HarnessConfig::default();
        let lines = plan_lines(&config, &["client_get".to_string()]).unwrap();

        // warm-up note, sweep header, 8 points x 2 endpoints
        assert_eq!(lines.len(), 18);
        assert!(lines[1].starts_with("# client_get (8 points x 2 endpoints)"));
        assert_eq!(
            lines[2],
            "redis-benchmark -h 127.0.0.1 -p 6378 -t get -c 1 -n 10000 -P 1 -q"
        );
        assert_eq!(
            lines[17],
            "redis-benchmark -h 127.0.0.1 -p 6379 -t get -c 128 -n 10000 -P 1 -q"
        );
    }

    #[test]
    fn test_plan_unknown_sweep() {
        let config = HarnessConfig::default();
        assert!(plan_lines(&config, &["nope".to_string()]).is_err());
    }
}
