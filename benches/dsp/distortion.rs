//! Benchmarks for the waveshaper curve: building it and running audio
//! through it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rat808::dsp::distortion::WaveshaperCurve;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    // Curve rebuild happens on the control thread for every drive change
    group.bench_function("build_curve", |b| {
        b.iter(|| WaveshaperCurve::diode(black_box(0.6)))
    });

    let curve = WaveshaperCurve::diode(0.6);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| ((i as f32 / size as f32) * 2.0 - 1.0) * 3.0)
            .collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("shape", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                curve.shape_buffer(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
