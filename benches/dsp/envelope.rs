//! Benchmarks for breakpoint envelope evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f64 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    // Kick sub envelope: step, linear attack, exponential tail
    let sub = Envelope::new(0.0)
        .set_value_at(0.0, 0.0)
        .linear_ramp_to(0.8, 0.005)
        .exponential_ramp_to(0.001, 0.5);

    // Snare wires: two exponential stages
    let wires = Envelope::new(0.0)
        .set_value_at(0.6, 0.0)
        .exponential_ramp_to(0.06, 0.08)
        .exponential_ramp_to(0.001, 0.25);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, env) in [("kick_sub", &sub), ("snare_wires", &wires)] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (i, sample) in buffer.iter_mut().enumerate() {
                        *sample = env.value_at(black_box(0.01 + i as f64 / SAMPLE_RATE));
                    }
                })
            });
        }
    }

    group.finish();
}
