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

//! Endpoint liveness probe and warm-up over RESP.
//!
//! Only two fixed commands are ever sent, so requests are written as literal
//! RESP arrays and the single-line reply is compared byte for byte.

use crate::core::endpoint::Endpoint;
use crate::error::{Result, SweepError};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Key seeded by warm-up; the benchmark client reads the same key for `GET`.
pub const WARMUP_KEY: &str = "key:__rand_int__";

/// Value written by warm-up.
pub const WARMUP_VALUE: &str = "foo";

const MAX_REPLY_BYTES: usize = 512;

/// Checks endpoints before and around benchmark runs.
pub trait EndpointProbe {
    /// Verifies that the endpoint answers `PING` with `+PONG`.
    fn ping(&self, endpoint: &Endpoint) -> Result<()>;

    /// Seeds the key read by `GET` benchmarks.
    fn seed(&self, endpoint: &Endpoint) -> Result<()>;
}

impl<T: EndpointProbe + ?Sized> EndpointProbe for &T {
    fn ping(&self, endpoint: &Endpoint) -> Result<()> {
        (**self).ping(endpoint)
    }

    fn seed(&self, endpoint: &Endpoint) -> Result<()> {
        (**self).seed(endpoint)
    }
}

/// Encodes a command as a RESP array of bulk strings.
///
/// ```
/// use kvsweep::harness::probe::encode_command;
///
/// assert_eq!(encode_command(&["PING"]), b"*1\r\n$4\r\nPING\r\n".to_vec());
/// ```
pub fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut buf = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        buf.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.extend_from_slice(arg.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// Probe speaking RESP over a short-lived TCP connection.
#[derive(Debug, Clone)]
pub struct RespProbe {
    timeout: Duration,
}

impl RespProbe {
    /// Creates a probe with the given connect/read/write timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn exchange(&self, endpoint: &Endpoint, args: &[&str], expected: &[u8]) -> Result<()> {
        let probe_error = |reason: String| {
            SweepError::unreachable(&endpoint.name, endpoint.address(), reason)
        };

        let addrs = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| probe_error(format!("cannot resolve host: {}", e)))?;

        let mut last_error = "no addresses resolved".to_string();
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_error = e.to_string(),
            }
        }
        let mut stream = stream.ok_or_else(|| probe_error(last_error))?;

        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .map_err(|e| probe_error(e.to_string()))?;

        stream
            .write_all(&encode_command(args))
            .map_err(|e| probe_error(format!("write failed: {}", e)))?;

        let reply = read_line(&mut stream).map_err(|e| probe_error(format!("read failed: {}", e)))?;
        if reply != expected {
            return Err(probe_error(format!(
                "unexpected reply to {}: {:?}",
                args[0],
                String::from_utf8_lossy(&reply)
            )));
        }

        Ok(())
    }
}

impl EndpointProbe for RespProbe {
    fn ping(&self, endpoint: &Endpoint) -> Result<()> {
        self.exchange(endpoint, &["PING"], b"+PONG\r\n")
    }

    fn seed(&self, endpoint: &Endpoint) -> Result<()> {
        self.exchange(endpoint, &["SET", WARMUP_KEY, WARMUP_VALUE], b"+OK\r\n")
    }
}

/// Reads up to and including the first `\r\n`.
fn read_line(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut reply = Vec::new();
    let mut chunk = [0u8; 64];

    while !reply.ends_with(b"\r\n") && reply.len() < MAX_REPLY_BYTES {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        reply.extend_from_slice(&chunk[..n]);
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    /// Serves one connection, asserting the request and writing `reply`.
    fn serve_once(expected_request: Vec<u8>, reply: &'static [u8]) -> (u16, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = vec![0u8; expected_request.len()];
            conn.read_exact(&mut buf).unwrap();
            assert_eq!(buf, expected_request);
            conn.write_all(reply).unwrap();
        });
        (port, handle)
    }

    #[test]
    fn test_encode_set() {
        assert_eq!(
            encode_command(&["SET", "k", "foo"]),
            b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$3\r\nfoo\r\n".to_vec()
        );
    }

    #[test]
    fn test_ping_pong() {
        let (port, handle) = serve_once(encode_command(&["PING"]), b"+PONG\r\n");
        let probe = RespProbe::new(Duration::from_secs(2));
        probe.ping(&Endpoint::new("local", "127.0.0.1", port)).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_unexpected_reply() {
        let (port, handle) = serve_once(encode_command(&["PING"]), b"-ERR unknown command\r\n");
        let probe = RespProbe::new(Duration::from_secs(2));
        let err = probe
            .ping(&Endpoint::new("local", "127.0.0.1", port))
            .unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains("unexpected reply"));
        handle.join().unwrap();
    }

    #[test]
    fn test_seed() {
        let (port, handle) =
            serve_once(encode_command(&["SET", WARMUP_KEY, WARMUP_VALUE]), b"+OK\r\n");
        let probe = RespProbe::new(Duration::from_secs(2));
        probe.seed(&Endpoint::new("local", "127.0.0.1", port)).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let probe = RespProbe::new(Duration::from_millis(500));
        let err = probe
            .ping(&Endpoint::new("gone", "127.0.0.1", port))
            .unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains("gone"));
    }
}
