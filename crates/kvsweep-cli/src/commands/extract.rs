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

//! Extract metrics from captured benchmark client output.

use crate::error::CliError;
use kvsweep::MetricSample;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Converts a sample into a flat JSON object keyed by metric.
pub fn sample_to_json(sample: &MetricSample) -> Value {
    let map: Map<String, Value> = sample
        .iter()
        .map(|(metric, value)| (metric.key().to_string(), value.map_or(Value::Null, Value::from)))
        .collect();
    Value::Object(map)
}

/// Reads `file` (or stdin) and prints the extracted metrics as JSON.
pub fn extract(file: Option<&Path>) -> Result<(), CliError> {
    let text = match file {
        Some(path) => fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::io_error("<stdin>", e))?;
            buf
        }
    };

    let sample = kvsweep::extract(&text);
    println!("{}", serde_json::to_string_pretty(&sample_to_json(&sample))?);
    Ok(())
}
