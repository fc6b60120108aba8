//! Benchmarks for noise buffer generation (control thread, per trigger).

use std::hint::black_box;

use criterion::Criterion;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rat808::dsp::noise;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    let mut rng = Pcg32::seed_from_u64(1);

    // Clap burst and snare wires lengths
    group.bench_function("burst_20ms", |b| {
        b.iter(|| noise::generate(black_box(0.02), 48_000.0, &mut rng))
    });
    group.bench_function("wires_250ms", |b| {
        b.iter(|| noise::generate(black_box(0.25), 48_000.0, &mut rng))
    });

    group.finish();
}
