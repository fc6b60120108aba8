//! Benchmarks for the bus compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::dsp::compressor::Compressor;

use crate::BLOCK_SIZES;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    for &size in BLOCK_SIZES {
        // Decaying burst, spends time above and below the knee
        let input: Vec<f32> = (0..size)
            .map(|i| (1.0 - i as f32 / size as f32) * if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let mut buffer = input.clone();
        let mut comp = Compressor::glue(48_000.0);

        group.bench_with_input(BenchmarkId::new("glue", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                comp.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
