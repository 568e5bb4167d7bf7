//! Benchmarks for resolving a track against a playback window.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_playout::schedule::schedule_play;
use saavy_playout::{FadeKind, FadeShape, PlaybackWindow, Track};

/// A long clip carrying `count` alternating fades
fn track_with_fades(count: usize) -> Track {
    let mut track = Track::builder(600.0).start(10.0).build().unwrap();
    for i in 0..count {
        let kind = if i % 2 == 0 {
            FadeKind::FadeIn
        } else {
            FadeKind::FadeOut
        };
        let start = i as f64 * 2.0;
        track
            .save_fade(kind, FadeShape::SCurve, start, start + 1.5)
            .unwrap();
    }
    track
}

pub fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule/plan");

    for &fades in &[0usize, 4, 32, 256] {
        let track = track_with_fades(fades);
        let open = PlaybackWindow::starting_at(0.0).unwrap();
        let inside = PlaybackWindow::between(150.0, 300.0).unwrap();

        group.bench_with_input(BenchmarkId::new("unbounded", fades), &fades, |b, _| {
            b.iter(|| schedule_play(black_box(&track.snapshot()), 0.0, black_box(&open), 1.0))
        });

        group.bench_with_input(BenchmarkId::new("mid_track", fades), &fades, |b, _| {
            b.iter(|| schedule_play(black_box(&track.snapshot()), 0.0, black_box(&inside), 1.0))
        });
    }

    group.finish();
}
