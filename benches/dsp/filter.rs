//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, mut filter) in [
            ("lowpass", SVFilter::lowpass(1000.0, SAMPLE_RATE)),
            ("highpass", SVFilter::highpass(1000.0, SAMPLE_RATE)),
            ("bandpass", SVFilter::bandpass(1000.0, SAMPLE_RATE).with_q(1.5)),
        ] {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // Cutoff moving every 32 samples, as in the effects chain
        let mut filter = SVFilter::lowpass(1000.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            let mut cutoff = 200.0f32;
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for chunk in buffer.chunks_mut(32) {
                    cutoff = if cutoff > 18_000.0 { 200.0 } else { cutoff * 1.01 };
                    filter.set_cutoff(cutoff);
                    filter.render(black_box(chunk));
                }
            })
        });
    }

    group.finish();
}
