//! Benchmarks for single drum voices.
//!
//! Each voice is rebuilt outside the timed loop and rendered from its
//! onset, where every layer is sounding at once.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rat808::graph::node::{GraphNode, RenderCtx};
use rat808::voices::{self, BuildCtx, DrumType, DrumVoiceConfig, Voice};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let mut rng = Pcg32::seed_from_u64(808);
    let ctx = RenderCtx::new(SAMPLE_RATE, 0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, voice) in [
            ("kick", Voice::resolve(DrumType::Kick, false)),
            ("kick_modded", Voice::resolve(DrumType::Kick, true)),
            ("snare", Voice::resolve(DrumType::Snare, false)),
            // six oscillators and two filters, the heaviest voice
            ("hat", Voice::resolve(DrumType::Hat, false)),
            ("clap", Voice::resolve(DrumType::Clap, false)),
        ] {
            let graph = voices::build(
                voice,
                0.0,
                &DrumVoiceConfig::default(),
                &mut BuildCtx::new(SAMPLE_RATE, &mut rng),
            );

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter_batched_ref(
                    || graph.instantiate(SAMPLE_RATE),
                    |node| node.render_block(black_box(&mut buffer), black_box(&ctx)),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}
