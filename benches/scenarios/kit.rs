//! Benchmarks for the full engine: queue, voice pool, effects chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::{DrumEngine, DrumType, DrumVoiceConfig, EngineConfig};

use crate::BLOCK_SIZES;

pub fn bench_kit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/kit");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Effects chain alone: silence in, full processing
        let (_engine, mut renderer) = DrumEngine::new(EngineConfig::default().with_seed(1));
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| renderer.render_block(black_box(&mut buffer)))
        });

        // Every drum hitting at once, retriggered as soon as they finish
        let (mut engine, mut renderer) = DrumEngine::new(EngineConfig::default().with_seed(2));
        group.bench_with_input(BenchmarkId::new("all_drums", size), &size, |b, _| {
            b.iter(|| {
                if renderer.active_voices() == 0 {
                    let now = engine.current_time();
                    for drum in DrumType::ALL {
                        let _ = engine.trigger(drum, now, DrumVoiceConfig::default());
                    }
                }
                renderer.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
