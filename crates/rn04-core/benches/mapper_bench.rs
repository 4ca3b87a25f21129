//! Criterion benchmarks for the directional mapper and the control protocol.
//!
//! The mapper runs once per throttled mouse move while a pan is active
//! (up to ~60 times a second inside a low-level hook callback chain), so its
//! cost must stay trivially small.
//!
//! Run with:
//! ```bash
//! cargo bench --package rn04-core --bench mapper_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rn04_core::domain::mapper::DirectionalMapper;
use rn04_core::domain::pan::CameraPan;
use rn04_core::protocol::messages::{
    decode_control, decode_status, encode_control, encode_status, ControlMessage, StatusMessage,
};
use uuid::Uuid;

// ── Offset fixtures ───────────────────────────────────────────────────────────

/// A plausible drag: circle-ish sweep through all four quadrants.
fn drag_offsets() -> Vec<(i32, i32)> {
    (0..360)
        .step_by(6)
        .map(|deg| {
            let rad = (deg as f64).to_radians();
            ((rad.cos() * 120.0) as i32, (rad.sin() * 120.0) as i32)
        })
        .collect()
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

/// Benchmarks a single `map_offset` call for characteristic offsets.
fn bench_map_offset(c: &mut Criterion) {
    let offsets: &[(&str, (i32, i32))] = &[
        ("steady", (40, 0)),
        ("sign_flip", (-40, 0)),
        ("diagonal", (35, 35)),
        ("origin", (0, 0)),
    ];

    let mut group = c.benchmark_group("map_offset");
    for (name, offset) in offsets {
        group.bench_with_input(BenchmarkId::new("offset", name), offset, |b, &(dx, dy)| {
            let mut mapper = DirectionalMapper::new();
            b.iter(|| mapper.map_offset(black_box(dx), black_box(dy)))
        });
    }
    group.finish();
}

/// Benchmarks a whole pan session: press, 60 moves, release.
fn bench_pan_session(c: &mut Criterion) {
    let offsets = drag_offsets();

    c.bench_function("pan_session_60_moves", |b| {
        b.iter(|| {
            let mut pan = CameraPan::new();
            pan.begin(black_box(500), black_box(500));
            for &(dx, dy) in &offsets {
                pan.motion(black_box(500 + dx), black_box(500 + dy));
            }
            pan.end()
        })
    });
}

/// Benchmarks encoding and decoding of the protocol lines.
fn bench_protocol_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("protocol_lines");

    let stop = ControlMessage::Stop;
    group.bench_function("encode_stop", |b| {
        b.iter(|| encode_control(black_box(&stop)).expect("encode must succeed"))
    });

    let stop_line = encode_control(&stop).expect("encode must succeed for benchmark setup");
    group.bench_function("decode_stop", |b| {
        b.iter(|| decode_control(black_box(&stop_line)).expect("decode must succeed"))
    });

    let started = StatusMessage::Started {
        session_id: Uuid::new_v4(),
    };
    let started_line = encode_status(&started).expect("encode must succeed for benchmark setup");
    group.bench_function("decode_started", |b| {
        b.iter(|| decode_status(black_box(&started_line)).expect("decode must succeed"))
    });

    group.finish();
}

criterion_group!(benches, bench_map_offset, bench_pan_session, bench_protocol_lines);
criterion_main!(benches);
