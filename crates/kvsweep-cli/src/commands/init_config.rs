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

//! Print the built-in configuration.

use crate::cli::ConfigFormat;
use crate::error::CliError;
use kvsweep::HarnessConfig;

/// Renders the default configuration in the requested format.
pub fn default_config_text(format: ConfigFormat) -> Result<String, CliError> {
    let config = HarnessConfig::default();
    Ok(match format {
        ConfigFormat::Yaml => config.to_yaml()?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
    })
}

/// Prints the default configuration to stdout.
pub fn init_config(format: ConfigFormat) -> Result<(), CliError> {
    println!("{}", default_config_text(format)?.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_parses_back() {
        let text = default_config_text(ConfigFormat::Yaml).unwrap();
        assert_eq!(
            HarnessConfig::from_yaml_str(&text).unwrap(),
            HarnessConfig::default()
        );
    }

    #[test]
    fn test_json_parses_back() {
        let text = default_config_text(ConfigFormat::Json).unwrap();
        let config: HarnessConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }
}
