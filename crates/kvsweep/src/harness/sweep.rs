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

//! Sweep controller.
//!
//! Walks the points of a sweep in declared order and, for each point, runs
//! every endpoint in declared order, extracts its metrics and hands the
//! sample to the [`Aggregator`]. Endpoints are probed before anything runs;
//! a single unreachable endpoint aborts the sweep before the log is touched.

use crate::core::endpoint::{validate_endpoints, Endpoint};
use crate::core::point::SweepDefinition;
use crate::error::{Result, SweepError};
use crate::extract::{extract, Metric};
use crate::harness::aggregator::Aggregator;
use crate::harness::driver::{CommandExecutor, RunDriver};
use crate::harness::probe::EndpointProbe;
use crate::harness::series::SweepSeries;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared flag requesting a sweep to stop at the next point boundary.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Creates a handle that is not yet aborted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the sweep to stop before its next point.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns whether an abort was requested.
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Runs sweeps point by point against an ordered list of endpoints.
pub struct SweepController<E, P> {
    driver: RunDriver<E, P>,
    abort: AbortHandle,
}

impl<E: CommandExecutor, P: EndpointProbe> SweepController<E, P> {
    /// Creates a controller around a run driver.
    pub fn new(driver: RunDriver<E, P>) -> Self {
        Self {
            driver,
            abort: AbortHandle::new(),
        }
    }

    /// Uses an externally owned abort handle, e.g. one set from a signal
    /// handler.
    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    /// Handle that stops this controller between points.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// The underlying run driver.
    pub fn driver(&self) -> &RunDriver<E, P> {
        &self.driver
    }

    /// Validates the endpoint list and pings every endpoint.
    ///
    /// # Errors
    ///
    /// Returns the first [`SweepError::EndpointUnreachable`] encountered.
    pub fn check_endpoints(&self, endpoints: &[Endpoint]) -> Result<()> {
        validate_endpoints(endpoints)?;

        for endpoint in endpoints {
            self.driver.probe().ping(endpoint)?;
            debug!(endpoint = %endpoint.name, address = %endpoint.address(), "endpoint alive");
        }
        Ok(())
    }

    /// Runs one sweep to completion or until aborted.
    ///
    /// The returned series always has one row per committed point. When the
    /// abort handle fires, the series is returned early and
    /// [`SweepSeries::is_complete`] is `false`.
    pub fn run_sweep(
        &self,
        sweep: &SweepDefinition,
        endpoints: &[Endpoint],
        aggregator: &mut Aggregator,
    ) -> Result<SweepSeries> {
        if sweep.is_empty() {
            return Err(SweepError::invalid_config(
                format!("sweeps.{}.values", sweep.name),
                "a sweep needs at least one point",
            ));
        }
        self.check_endpoints(endpoints)?;

        info!(
            sweep = %sweep.name,
            operation = %sweep.operation,
            points = sweep.len(),
            endpoints = endpoints.len(),
            "starting sweep"
        );
        aggregator.begin(sweep, endpoints)?;

        for (index, point) in sweep.points.iter().enumerate() {
            if self.abort.is_aborted() {
                warn!(sweep = %sweep.name, completed = index, "abort requested");
                return aggregator.abort();
            }

            for endpoint in endpoints {
                let result = self.driver.run(endpoint, sweep.operation, point);
                let sample = extract(&result.output);

                if sample.get(Metric::Throughput).is_none() && !result.is_failure() {
                    warn!(
                        endpoint = %endpoint.name,
                        point = index,
                        "no throughput found in benchmark output"
                    );
                }
                aggregator.record(index, endpoint, sample)?;
            }

            aggregator.commit_point()?;
            info!(
                sweep = %sweep.name,
                axis = sweep.axis.label(),
                value = point.axis_value(sweep.axis),
                "point {}/{} done",
                index + 1,
                sweep.len()
            );
        }

        aggregator.finish()
    }

    /// Runs several sweeps in order, probing endpoints before each one.
    ///
    /// `on_series` receives every finished (or aborted) sweep before the next
    /// one starts, so a later failure never loses results already logged.
    /// Stops after the first aborted sweep; its partial series is the last
    /// element of the result.
    pub fn run_all<F>(
        &self,
        sweeps: &[SweepDefinition],
        endpoints: &[Endpoint],
        aggregator: &mut Aggregator,
        mut on_series: F,
    ) -> Result<Vec<SweepSeries>>
    where
        F: FnMut(&SweepSeries) -> Result<()>,
    {
        let mut results = Vec::with_capacity(sweeps.len());

        for sweep in sweeps {
            if self.abort.is_aborted() {
                break;
            }
            let series = self.run_sweep(sweep, endpoints, aggregator)?;
            on_series(&series)?;

            let complete = series.is_complete();
            results.push(series);
            if !complete {
                break;
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ClientConfig;
    use crate::core::point::{Operation, SweepAxis, SweepPoint};
    use crate::harness::driver::{CommandSpec, RunResult, RunStatus};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Answers with the port number as throughput.
    struct PortExecutor {
        calls: RefCell<Vec<String>>,
        abort_after: Option<(usize, AbortHandle)>,
    }

    impl PortExecutor {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                abort_after: None,
            }
        }
    }

    impl CommandExecutor for PortExecutor {
        fn execute(&self, spec: &CommandSpec, _timeout: Duration) -> RunResult {
            self.calls.borrow_mut().push(spec.command_line());
            if let Some((n, handle)) = &self.abort_after {
                if self.calls.borrow().len() == *n {
                    handle.abort();
                }
            }

            let port_pos = spec.args.iter().position(|a| a == "-p").unwrap() + 1;
            RunResult {
                output: format!("GET: {}.00 requests per second, p50=0.100 msec", spec.args[port_pos]),
                stderr: String::new(),
                status: RunStatus::Success,
                elapsed: Duration::from_millis(1),
            }
        }
    }

    struct StubProbe {
        down: Option<&'static str>,
        pings: Cell<usize>,
    }

    impl EndpointProbe for StubProbe {
        fn ping(&self, endpoint: &Endpoint) -> Result<()> {
            self.pings.set(self.pings.get() + 1);
            if Some(endpoint.name.as_str()) == self.down {
                return Err(SweepError::unreachable(&endpoint.name, endpoint.address(), "refused"));
            }
            Ok(())
        }

        fn seed(&self, _endpoint: &Endpoint) -> Result<()> {
            Ok(())
        }
    }

    fn probe(down: Option<&'static str>) -> StubProbe {
        StubProbe {
            down,
            pings: Cell::new(0),
        }
    }

    fn sweep() -> SweepDefinition {
        SweepDefinition {
            name: "client_get".to_string(),
            title: "GET".to_string(),
            operation: Operation::Get,
            axis: SweepAxis::Clients,
            points: [1, 2, 4]
                .iter()
                .map(|&c| SweepPoint::new(c, 1, 100))
                .collect(),
        }
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("redis", "127.0.0.1", 6378),
            Endpoint::new("rutin", "127.0.0.1", 6379),
        ]
    }

    #[test]
    fn test_runs_points_then_endpoints_in_order() {
        let dir = TempDir::new().unwrap();
        let executor = PortExecutor::new();
        let controller = SweepController::new(RunDriver::new(
            ClientConfig::default(),
            &executor,
            probe(None),
        ));
        let mut agg = Aggregator::new(dir.path().join("r.log"));

        let series = controller.run_sweep(&sweep(), &endpoints(), &mut agg).unwrap();

        assert!(series.is_complete());
        let calls = executor.calls.borrow();
        assert_eq!(calls.len(), 6);
        assert!(calls[0].contains("-p 6378 -t get -c 1 "));
        assert!(calls[1].contains("-p 6379 -t get -c 1 "));
        assert!(calls[4].contains("-p 6378 -t get -c 4 "));

        let tput = series.metric(Metric::Throughput);
        assert_eq!(tput.values("redis").unwrap(), &[Some(6378.0); 3]);
        assert_eq!(tput.values("rutin").unwrap(), &[Some(6379.0); 3]);
    }

    #[test]
    fn test_unreachable_endpoint_runs_nothing() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("r.log");
        let executor = PortExecutor::new();
        let controller = SweepController::new(RunDriver::new(
            ClientConfig::default(),
            &executor,
            probe(Some("rutin")),
        ));
        let mut agg = Aggregator::new(&log);

        let err = controller.run_sweep(&sweep(), &endpoints(), &mut agg).unwrap_err();

        assert!(err.is_unreachable());
        assert!(executor.calls.borrow().is_empty());
        assert!(!log.exists());
    }

    #[test]
    fn test_abort_between_points() {
        let dir = TempDir::new().unwrap();
        let handle = AbortHandle::new();
        let executor = PortExecutor {
            calls: RefCell::new(Vec::new()),
            // Fires during the first endpoint of point 1.
            abort_after: Some((3, handle.clone())),
        };
        let controller = SweepController::new(RunDriver::new(
            ClientConfig::default(),
            &executor,
            probe(None),
        ))
        .with_abort_handle(handle);
        let mut agg = Aggregator::new(dir.path().join("r.log"));

        let series = controller.run_sweep(&sweep(), &endpoints(), &mut agg).unwrap();

        // Point 1 still finishes for both endpoints.
        assert_eq!(series.len(), 2);
        assert!(!series.is_complete());
        assert_eq!(executor.calls.borrow().len(), 4);
    }

    #[test]
    fn test_run_all_probes_before_each_sweep() {
        let dir = TempDir::new().unwrap();
        let executor = PortExecutor::new();
        let stub = probe(None);
        let controller =
            SweepController::new(RunDriver::new(ClientConfig::default(), &executor, &stub));
        let mut agg = Aggregator::new(dir.path().join("r.log"));

        let mut second = sweep();
        second.name = "client_set".to_string();
        second.operation = Operation::Set;

        let mut seen = Vec::new();
        let all = controller
            .run_all(&[sweep(), second], &endpoints(), &mut agg, |series| {
                seen.push(series.sweep().name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(seen, vec!["client_get", "client_set"]);
        assert_eq!(stub.pings.get(), 4);
        assert!(executor.calls.borrow()[6].contains("-t set"));
    }

    /// Probe whose endpoints stop answering after a number of pings.
    struct DyingProbe {
        healthy_pings: usize,
        pings: Cell<usize>,
    }

    impl EndpointProbe for DyingProbe {
        fn ping(&self, endpoint: &Endpoint) -> Result<()> {
            self.pings.set(self.pings.get() + 1);
            if self.pings.get() > self.healthy_pings {
                return Err(SweepError::unreachable(&endpoint.name, endpoint.address(), "refused"));
            }
            Ok(())
        }

        fn seed(&self, _endpoint: &Endpoint) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_all_hands_over_finished_sweep_before_later_failure() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("r.log");
        let executor = PortExecutor::new();
        let dying = DyingProbe {
            healthy_pings: 2,
            pings: Cell::new(0),
        };
        let controller =
            SweepController::new(RunDriver::new(ClientConfig::default(), &executor, &dying));
        let mut agg = Aggregator::new(&log);

        let mut second = sweep();
        second.name = "client_set".to_string();

        let mut finished = Vec::new();
        let err = controller
            .run_all(&[sweep(), second], &endpoints(), &mut agg, |series| {
                finished.push(series.clone());
                Ok(())
            })
            .unwrap_err();

        assert!(err.is_unreachable());
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].sweep().name, "client_get");
        assert!(finished[0].is_complete());
        assert_eq!(executor.calls.borrow().len(), 6);

        let text = std::fs::read_to_string(&log).unwrap();
        assert_eq!(text.matches("Client Sessions:").count(), 3);
    }

    #[test]
    fn test_run_all_stops_on_callback_error() {
        let dir = TempDir::new().unwrap();
        let executor = PortExecutor::new();
        let controller =
            SweepController::new(RunDriver::new(ClientConfig::default(), &executor, probe(None)));
        let mut agg = Aggregator::new(dir.path().join("r.log"));

        let err = controller
            .run_all(&[sweep(), sweep()], &endpoints(), &mut agg, |series| {
                let denied = std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    series.sweep().name.clone(),
                );
                Err(SweepError::io_error("reports", denied))
            })
            .unwrap_err();

        assert!(matches!(err, SweepError::Io { .. }));
        assert_eq!(executor.calls.borrow().len(), 6);
    }

    #[test]
    fn test_empty_sweep_rejected() {
        let executor = PortExecutor::new();
        let controller =
            SweepController::new(RunDriver::new(ClientConfig::default(), &executor, probe(None)));
        let mut empty = sweep();
        empty.points.clear();

        let err = controller
            .run_sweep(&empty, &endpoints(), &mut Aggregator::new("never.log"))
            .unwrap_err();
        assert!(matches!(err, SweepError::InvalidConfig { .. }));
    }
}
