// Copyright 2026 The Mimegate Project
// SPDX-License-Identifier: Apache-2.0

//! Gate latency benchmarks.
//!
//! Measures:
//! - Time to decision on a real signature (first-chunk classification)
//! - Steady-state pass-through cost per chunk after the decision
//! - Accumulation cost per chunk while unclassified
//!
//! Run: cargo bench --bench gate_latency

use std::sync::Arc;

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mimegate::gate::{PrefixMode, TypeGateFilter};
use mimegate::policy::Policy;
use mimegate::sniff::{ContentSniffer, ContentType};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn jpeg_chunk(len: usize) -> Bytes {
    let mut data = vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00,
    ];
    while data.len() < len {
        data.push((data.len() % 251) as u8);
    }
    Bytes::from(data)
}

fn noise_chunk(len: usize) -> Bytes {
    Bytes::from(vec![0x61u8; len])
}

/// Sniffer that never answers, to hold the gate in the accumulation path.
struct NeverSniffer;

impl ContentSniffer for NeverSniffer {
    fn sniff(&self, _prefix: &[u8]) -> Option<ContentType> {
        None
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_time_to_decision(c: &mut Criterion) {
    let chunk = jpeg_chunk(16 * 1024);

    c.bench_function("decision_on_first_chunk", |b| {
        b.iter(|| {
            let mut filter =
                TypeGateFilter::with_defaults(Policy::exact("image/jpeg").unwrap());
            black_box(filter.process(black_box(chunk.clone())))
        })
    });
}

fn bench_steady_state_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state_forward");
    for size in [1024usize, 16 * 1024, 64 * 1024] {
        let payload = noise_chunk(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            let mut filter =
                TypeGateFilter::with_defaults(Policy::exact("image/jpeg").unwrap());
            filter.process(jpeg_chunk(1024)).unwrap();
            b.iter(|| black_box(filter.process(black_box(payload.clone()))))
        });
    }
    group.finish();
}

fn bench_accumulation(c: &mut Criterion) {
    let payload = noise_chunk(256);

    c.bench_function("accumulate_unclassified_chunk", |b| {
        b.iter_batched(
            || {
                TypeGateFilter::new(
                    Policy::exact("image/jpeg").unwrap(),
                    Arc::new(NeverSniffer),
                    PrefixMode::Drop,
                )
            },
            |mut filter| black_box(filter.process(black_box(payload.clone()))),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_time_to_decision,
    bench_steady_state_forward,
    bench_accumulation
);
criterion_main!(benches);
