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

//! JSON export of the raw sweep dataset.

use crate::error::{Result, SweepError};
use crate::harness::series::SweepSeries;
use std::fs;
use std::path::Path;

/// Serialises the series, samples included, as pretty JSON.
pub fn to_json(series: &SweepSeries) -> Result<String> {
    Ok(serde_json::to_string_pretty(series)?)
}

/// Exports the series as JSON to `path`.
pub fn export_json(series: &SweepSeries, path: &Path) -> Result<()> {
    let json = to_json(series)?;
    fs::write(path, json).map_err(|e| SweepError::io_error(path, e))
}

/// Reads a series previously written by [`export_json`].
pub fn load_json(path: &Path) -> Result<SweepSeries> {
    let text = fs::read_to_string(path).map_err(|e| SweepError::io_error(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoint::Endpoint;
    use crate::core::point::{Operation, SweepAxis, SweepDefinition, SweepPoint};
    use crate::extract::{Metric, MetricSample};
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_json() {
        let sweep = SweepDefinition {
            name: "batch_set".to_string(),
            title: "SET".to_string(),
            operation: Operation::Set,
            axis: SweepAxis::Pipeline,
            points: vec![SweepPoint::new(50, 16, 100_000)],
        };
        let mut series = SweepSeries::new(sweep, &[Endpoint::new("redis", "h", 1)]);
        series
            .push_point(vec![MetricSample::empty().with(Metric::Throughput, 1.5)])
            .unwrap();

        let temp = NamedTempFile::new().unwrap();
        export_json(&series, temp.path()).unwrap();

        let content = fs::read_to_string(temp.path()).unwrap();
        assert!(content.contains("\"batch_set\""));
        assert!(content.contains("throughput_ops_per_sec"));
        assert!(content.contains("null"));
        assert_eq!(load_json(temp.path()).unwrap(), series);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_json(Path::new("/nonexistent/kvsweep.json")).unwrap_err();
        assert!(matches!(err, SweepError::Io { .. }));
    }
}
