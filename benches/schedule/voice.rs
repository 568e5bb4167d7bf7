//! Benchmarks for rendering a buffer playout voice.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use saavy_playout::playout::buffer::BufferPlayout;
use saavy_playout::{FadeShape, Playout, PlayoutConfig};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule/voice");
    let config = PlayoutConfig::new().sample_rate(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        // Ten minutes of source so the voice never runs out mid-bench
        let source: Arc<[f32]> = vec![0.5; 48_000 * 600].into();

        // Plain playback
        let (mut playout, mut voice) = BufferPlayout::new(Arc::clone(&source), config);
        playout.set_up_source();
        playout.play(0.0, 0.0, 600.0);
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| voice.render_block(black_box(&mut buffer)))
        });

        // Two overlapping long fades evaluated on every sample
        let (mut playout, mut voice) = BufferPlayout::new(source, config);
        playout.set_up_source();
        playout.apply_fade_in(0.0, 300.0, FadeShape::SCurve);
        playout.apply_fade_out(0.0, 600.0, FadeShape::Exponential);
        playout.play(0.0, 0.0, 600.0);
        group.bench_with_input(BenchmarkId::new("two_fades", size), &size, |b, _| {
            b.iter(|| voice.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
