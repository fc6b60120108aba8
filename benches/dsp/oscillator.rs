//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            // sin() per sample
            ("sine", Waveform::Sine),
            // branch per sample
            ("square", Waveform::Square),
            ("sawtooth", Waveform::Sawtooth),
            ("triangle", Waveform::Triangle),
        ] {
            let mut osc = Oscillator::new(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample(black_box(440.0), SAMPLE_RATE);
                    }
                })
            });
        }
    }

    group.finish();
}
