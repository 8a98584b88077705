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

//! Extraction benchmarks.
//!
//! Measures metric extraction over quiet-mode lines, full summaries and
//! large captured outputs with progress redraws.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kvsweep::extract;

const QUIET: &str = "GET: 48000.55 requests per second, p50=0.479 msec                    \n";

const FULL: &str = "====== GET ======\n\
  10000 requests completed in 0.21 seconds\n\
  50 parallel clients\n\
  3 bytes payload\n\
  keep alive: 1\n\
\n\
Summary:\n\
  throughput summary: 48000.55 requests per second\n\
  latency summary (msec):\n\
          avg       min       p50       p95       p99       max\n\
        0.503     0.120     0.479     0.807     1.031     2.663\n";

/// Output with `lines` progress redraws before the final quiet line.
fn with_progress(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!(
            "GET: rps={}.0 (overall: {}.0) avg_msec=0.611 (overall: 0.611)\r",
            40_000 + i,
            40_000 + i
        ));
    }
    text.push_str(QUIET);
    text
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    group.throughput(Throughput::Bytes(QUIET.len() as u64));
    group.bench_function("quiet_line", |b| b.iter(|| extract(black_box(QUIET))));

    group.throughput(Throughput::Bytes(FULL.len() as u64));
    group.bench_function("full_summary", |b| b.iter(|| extract(black_box(FULL))));

    for lines in [10usize, 100, 1_000] {
        let text = with_progress(lines);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("progress", lines), &text, |b, text| {
            b.iter(|| extract(black_box(text)))
        });
    }

    group.finish();
}

fn bench_miss(c: &mut Criterion) {
    let noise = "Could not connect to Redis at 127.0.0.1:6378: Connection refused\n".repeat(100);
    c.bench_function("extract_miss", |b| b.iter(|| extract(black_box(&noise))));
}

criterion_group!(benches, bench_extract, bench_miss);
criterion_main!(benches);
