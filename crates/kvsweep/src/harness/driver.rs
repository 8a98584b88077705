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

//! Run driver: one benchmark client invocation against one endpoint.
//!
//! The command line is derived deterministically from the client
//! configuration, the endpoint and the sweep point. Execution goes through a
//! [`CommandExecutor`] so sweeps can be exercised without spawning real
//! processes. A failed run never aborts anything: its status is recorded and
//! the empty or partial output flows on to extraction.

use crate::core::config::ClientConfig;
use crate::core::endpoint::Endpoint;
use crate::core::point::{Operation, SweepPoint};
use crate::harness::probe::EndpointProbe;
use std::fmt;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default interval between exit checks of a running child.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Extra time allowed for pipe readers after the child has exited.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// A fully built external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Returns the command as a single shell-like line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Builds the benchmark client invocation for one run.
///
/// # Examples
///
/// ```
/// use kvsweep::core::{ClientConfig, Endpoint, Operation, SweepPoint};
/// use kvsweep::harness::driver::build_command;
///
/// let spec = build_command(
///     &ClientConfig::default(),
///     &Endpoint::new("redis", "127.0.0.1", 6378),
///     Operation::Get,
///     &SweepPoint::new(8, 1, 10_000),
/// );
/// assert_eq!(
///     spec.command_line(),
///     "redis-benchmark -h 127.0.0.1 -p 6378 -t get -c 8 -n 10000 -P 1 -q"
/// );
/// ```
pub fn build_command(
    client: &ClientConfig,
    endpoint: &Endpoint,
    operation: Operation,
    point: &SweepPoint,
) -> CommandSpec {
    let mut args = vec![
        "-h".to_string(),
        endpoint.host.clone(),
        "-p".to_string(),
        endpoint.port.to_string(),
        "-t".to_string(),
        operation.as_arg().to_string(),
        "-c".to_string(),
        point.clients.to_string(),
        "-n".to_string(),
        point.requests.to_string(),
        "-P".to_string(),
        point.pipeline.to_string(),
        "-q".to_string(),
    ];
    args.extend(client.extra_args.iter().cloned());

    CommandSpec {
        program: client.program.clone(),
        args,
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Exit status zero.
    Success,
    /// Non-zero exit, or killed by a signal (`code` is `None`).
    Failed {
        /// Exit code if the process exited normally
        code: Option<i32>,
    },
    /// The process could not be started or waited on.
    SpawnFailed {
        /// Underlying error message
        reason: String,
    },
    /// The wall-clock limit elapsed and the child was killed.
    TimedOut {
        /// The enforced limit
        after: Duration,
    },
}

impl RunStatus {
    /// Returns whether the run succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed { code: Some(code) } => write!(f, "exited with status {}", code),
            RunStatus::Failed { code: None } => write!(f, "terminated by signal"),
            RunStatus::SpawnFailed { reason } => write!(f, "failed to start: {}", reason),
            RunStatus::TimedOut { after } => write!(f, "timed out after {:?}", after),
        }
    }
}

/// Outcome of one invocation.
///
/// Consumed by the extractor and then dropped; only the derived metrics are
/// kept.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Captured standard output (possibly empty or partial).
    pub output: String,
    /// Captured standard error, kept for diagnostics only.
    pub stderr: String,
    /// How the run ended.
    pub status: RunStatus,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

impl RunResult {
    /// A failed run with no output.
    pub fn failed(status: RunStatus, elapsed: Duration) -> Self {
        Self {
            output: String::new(),
            stderr: String::new(),
            status,
            elapsed,
        }
    }

    /// Returns whether the run failed for any reason.
    pub fn is_failure(&self) -> bool {
        !self.status.is_success()
    }
}

/// Executes a built command with a wall-clock limit.
pub trait CommandExecutor {
    /// Runs `spec` to completion or until `timeout` elapses.
    ///
    /// Implementations never fail: every problem is reported through
    /// [`RunResult::status`].
    fn execute(&self, spec: &CommandSpec, timeout: Duration) -> RunResult;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, spec: &CommandSpec, timeout: Duration) -> RunResult {
        (**self).execute(spec, timeout)
    }
}

/// Spawns real child processes.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    poll_interval: Duration,
}

impl ProcessExecutor {
    /// Creates an executor with the default poll interval.
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how often a running child is checked for exit.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, spec: &CommandSpec, timeout: Duration) -> RunResult {
        let start = Instant::now();

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        isolate(&mut command);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunResult::failed(
                    RunStatus::SpawnFailed {
                        reason: e.to_string(),
                    },
                    start.elapsed(),
                )
            }
        };

        // Drain both pipes concurrently so a chatty child never blocks on a
        // full pipe while we poll for its exit.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = start + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(exit)) if exit.success() => break RunStatus::Success,
                Ok(Some(exit)) => break RunStatus::Failed { code: exit.code() },
                Ok(None) if Instant::now() >= deadline => {
                    kill_tree(&mut child);
                    break RunStatus::TimedOut { after: timeout };
                }
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    kill_tree(&mut child);
                    break RunStatus::SpawnFailed {
                        reason: e.to_string(),
                    };
                }
            }
        };

        // A descendant that escaped the group may still hold the pipes open;
        // output is only waited for until the run deadline.
        let collect_until = deadline.max(Instant::now()) + DRAIN_GRACE;
        RunResult {
            output: stdout.map(|rx| collect(rx, collect_until)).unwrap_or_default(),
            stderr: stderr.map(|rx| collect(rx, collect_until)).unwrap_or_default(),
            status,
            elapsed: start.elapsed(),
        }
    }
}

/// Puts the child in its own process group, so a terminal interrupt aimed at
/// the harness does not reach the benchmark client mid-run, and a timeout
/// can take down the client together with anything it spawned.
#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child leads its own group (see `isolate`), so its pid is the pgid.
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg only sends a signal; a stale pgid yields ESRCH.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect(rx: Receiver<String>, until: Instant) -> String {
    rx.recv_timeout(until.saturating_duration_since(Instant::now()))
        .unwrap_or_default()
}

/// Executes single benchmark runs.
pub struct RunDriver<E, P> {
    client: ClientConfig,
    timeout: Duration,
    executor: E,
    probe: P,
}

impl<E: CommandExecutor, P: EndpointProbe> RunDriver<E, P> {
    /// Creates a driver; the run timeout comes from `client.timeout_secs`.
    pub fn new(client: ClientConfig, executor: E, probe: P) -> Self {
        let timeout = Duration::from_secs(client.timeout_secs);
        Self {
            client,
            timeout,
            executor,
            probe,
        }
    }

    /// Overrides the per-run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The probe used for warm-up and liveness checks.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// The per-run timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the command this driver would execute.
    pub fn command(
        &self,
        endpoint: &Endpoint,
        operation: Operation,
        point: &SweepPoint,
    ) -> CommandSpec {
        build_command(&self.client, endpoint, operation, point)
    }

    /// Runs one benchmark invocation.
    ///
    /// When warm-up is enabled the benchmarked key is seeded first; a failed
    /// seed is logged and the run proceeds.
    pub fn run(&self, endpoint: &Endpoint, operation: Operation, point: &SweepPoint) -> RunResult {
        if self.client.warmup {
            if let Err(e) = self.probe.seed(endpoint) {
                warn!(endpoint = %endpoint.name, error = %e, "warm-up failed, continuing");
            }
        }

        let spec = self.command(endpoint, operation, point);
        debug!(endpoint = %endpoint.name, command = %spec, "starting benchmark run");

        let result = self.executor.execute(&spec, self.timeout);

        if result.is_failure() {
            warn!(
                endpoint = %endpoint.name,
                command = %spec,
                status = %result.status,
                stderr = %result.stderr.trim(),
                "benchmark run failed"
            );
        } else {
            debug!(
                endpoint = %endpoint.name,
                elapsed_ms = result.elapsed.as_millis() as u64,
                output_bytes = result.output.len(),
                "benchmark run finished"
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SweepError};
    use std::cell::RefCell;

    struct RecordingExecutor {
        seen: RefCell<Vec<CommandSpec>>,
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, spec: &CommandSpec, _timeout: Duration) -> RunResult {
            self.seen.borrow_mut().push(spec.clone());
            RunResult {
                output: "GET: 1.0 requests per second".to_string(),
                stderr: String::new(),
                status: RunStatus::Success,
                elapsed: Duration::from_millis(1),
            }
        }
    }

    struct FailingSeed {
        seeds: RefCell<usize>,
    }

    impl EndpointProbe for FailingSeed {
        fn ping(&self, _endpoint: &Endpoint) -> Result<()> {
            Ok(())
        }

        fn seed(&self, endpoint: &Endpoint) -> Result<()> {
            *self.seeds.borrow_mut() += 1;
            Err(SweepError::unreachable(&endpoint.name, endpoint.address(), "refused"))
        }
    }

    fn point() -> SweepPoint {
        SweepPoint::new(4, 16, 160_000)
    }

    #[test]
    fn test_build_command_is_deterministic() {
        let client = ClientConfig {
            extra_args: vec!["--threads".to_string(), "2".to_string()],
            ..ClientConfig::default()
        };
        let endpoint = Endpoint::new("rutin", "10.0.0.2", 6379);

        let a = build_command(&client, &endpoint, Operation::Set, &point());
        let b = build_command(&client, &endpoint, Operation::Set, &point());
        assert_eq!(a, b);
        assert_eq!(
            a.command_line(),
            "redis-benchmark -h 10.0.0.2 -p 6379 -t set -c 4 -n 160000 -P 16 -q --threads 2"
        );
    }

    #[test]
    fn test_warmup_failure_does_not_abort_run() {
        let executor = RecordingExecutor {
            seen: RefCell::new(Vec::new()),
        };
        let probe = FailingSeed {
            seeds: RefCell::new(0),
        };
        let driver = RunDriver::new(ClientConfig::default(), &executor, probe);

        let result = driver.run(&Endpoint::new("a", "localhost", 1), Operation::Get, &point());
        assert!(!result.is_failure());
        assert_eq!(*driver.probe().seeds.borrow(), 1);
        assert_eq!(executor.seen.borrow().len(), 1);
    }

    #[test]
    fn test_warmup_disabled() {
        let executor = RecordingExecutor {
            seen: RefCell::new(Vec::new()),
        };
        let client = ClientConfig {
            warmup: false,
            ..ClientConfig::default()
        };
        let driver = RunDriver::new(client, &executor, FailingSeed { seeds: RefCell::new(0) });

        driver.run(&Endpoint::new("a", "localhost", 1), Operation::Get, &point());
        assert_eq!(*driver.probe().seeds.borrow(), 0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::Failed { code: Some(1) }.to_string(), "exited with status 1");
        assert!(RunStatus::TimedOut {
            after: Duration::from_secs(2)
        }
        .to_string()
        .contains("timed out"));
    }

    #[test]
    fn test_missing_binary_is_recorded() {
        let spec = CommandSpec {
            program: "kvsweep-no-such-benchmark-binary".to_string(),
            args: vec![],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_secs(5));
        assert!(matches!(result.status, RunStatus::SpawnFailed { .. }));
        assert!(result.output.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let spec = CommandSpec {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo 'GET: 123.45 requests per second, p50=0.5 msec'".to_string(),
            ],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_secs(10));
        assert_eq!(result.status, RunStatus::Success);
        assert!(result.output.contains("123.45 requests per second"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_keeps_partial_output() {
        let spec = CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo partial; echo oops >&2; exit 3".to_string()],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_secs(10));
        assert_eq!(result.status, RunStatus::Failed { code: Some(3) });
        assert_eq!(result.output.trim(), "partial");
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let spec = CommandSpec {
            program: "sleep".to_string(),
            args: vec!["30".to_string()],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_millis(200));
        assert!(matches!(result.status, RunStatus::TimedOut { .. }));
        assert!(result.elapsed < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_grandchild_holding_pipes() {
        // The shell forks `sleep`, which inherits stdout and stderr.
        let spec = CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "sleep 6; true".to_string()],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_millis(300));
        assert_eq!(
            result.status,
            RunStatus::TimedOut {
                after: Duration::from_millis(300)
            }
        );
        assert!(result.elapsed < Duration::from_secs(3), "{:?}", result.elapsed);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_child_leads_own_process_group() {
        // Prints the shell's pid and its process group (field 5 of stat).
        let spec = CommandSpec {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo $$; cut -d' ' -f5 /proc/$$/stat".to_string(),
            ],
        };
        let result = ProcessExecutor::new().execute(&spec, Duration::from_secs(10));
        assert_eq!(result.status, RunStatus::Success);

        let lines: Vec<&str> = result.output.lines().map(str::trim).collect();
        assert_eq!(lines.len(), 2, "{:?}", result.output);
        assert_eq!(lines[0], lines[1]);
        assert_ne!(lines[0], std::process::id().to_string());
    }
}
