//! Hi-hat voice, closed and open.
//!
//! Metallic cymbal tone from a bank of square waves at inharmonic ratios.
//! The partials never line up into a pitch, and the filters throw away
//! everything but the shimmering top end.
//!
//! # How It Works
//!
//! 1. Six squares at fixed ratios of the tuned base frequency
//! 2. Each one detuned by up to ±10 cents at random for thickness
//! 3. Levels fall off linearly with the partial index
//! 4. Sum → band-pass (8-12 kHz, Q 1.5) → high-pass 6 kHz
//! 5. One exponential decay: 50 ms closed, 350 ms open

use crate::{
    dsp::{envelope::Envelope, oscillator::Waveform},
    graph::{
        layer::{FilterSpec, Layer, Source},
        voice::VoiceGraph,
    },
    voices::{decay, BuildCtx, DrumVoiceConfig, HatVariant},
};

/// Frequency ratios of the oscillator bank.
pub const HAT_RATIOS: [f32; 6] = [1.0, 1.34, 1.67, 1.91, 2.18, 2.41];

const DETUNE_CENTS: f32 = 10.0;
const BANDPASS_Q: f32 = 1.5;

pub fn base_frequency(tune: f32) -> f32 {
    300.0 + tune * 400.0
}

pub fn decay_time(variant: HatVariant) -> f64 {
    match variant {
        HatVariant::Closed => 0.05,
        HatVariant::Open => 0.35,
    }
}

pub fn hihat(
    variant: HatVariant,
    time: f64,
    config: &DrumVoiceConfig,
    ctx: &mut BuildCtx<'_>,
) -> VoiceGraph {
    let base = base_frequency(config.tune);
    let length = decay_time(variant);

    let mut bank = Layer::new("bank", time, time + length);
    for (i, ratio) in HAT_RATIOS.iter().enumerate() {
        let partial = Source::oscillator(Waveform::Square, Envelope::constant(base * ratio))
            .with_detune(ctx.detune(DETUNE_CENTS))
            .with_level(0.15 - i as f32 * 0.02);
        bank = bank.source(partial);
    }

    let bank = bank
        .through(FilterSpec::bandpass(8000.0 + config.tune * 4000.0).with_q(BANDPASS_Q))
        .through(FilterSpec::highpass(6000.0))
        .gain(decay(config.level(), time, length));

    let label = match variant {
        HatVariant::Closed => "hat",
        HatVariant::Open => "open-hat",
    };
    VoiceGraph::new(label).layer(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::filter::FilterType;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn build(variant: HatVariant, config: DrumVoiceConfig, seed: u64) -> VoiceGraph {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ctx = BuildCtx::new(48_000.0, &mut rng);
        hihat(variant, 0.0, &config, &mut ctx)
    }

    #[test]
    fn bank_always_has_six_partials_at_fixed_ratios() {
        for (seed, tune, velocity) in [(1, 0.0, 127.0), (2, 0.5, 1.0), (3, 1.0, 64.0)] {
            let config = DrumVoiceConfig {
                tune,
                velocity,
                ..DrumVoiceConfig::default()
            };
            let graph = build(HatVariant::Closed, config, seed);
            let sources = graph.layers()[0].sources();
            assert_eq!(sources.len(), 6);

            let base = base_frequency(tune);
            for (source, ratio) in sources.iter().zip(HAT_RATIOS) {
                let freq = source.frequency().map(|f| f.value_at(0.0));
                assert_eq!(freq, Some(base * ratio));
                assert!(source.detune_cents().abs() <= DETUNE_CENTS);
                assert_eq!(source.waveform(), Some(Waveform::Square));
            }
        }
    }

    #[test]
    fn partial_levels_fall_linearly() {
        let graph = build(HatVariant::Closed, DrumVoiceConfig::default(), 4);
        let levels: Vec<f32> = graph.layers()[0].sources().iter().map(Source::level).collect();
        for (i, level) in levels.iter().enumerate() {
            assert!((level - (0.15 - i as f32 * 0.02)).abs() < 1e-6);
        }
    }

    #[test]
    fn detune_is_random_per_partial() {
        let graph = build(HatVariant::Closed, DrumVoiceConfig::default(), 5);
        let detunes: Vec<f32> = graph.layers()[0]
            .sources()
            .iter()
            .map(Source::detune_cents)
            .collect();
        assert!(detunes.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn filters_are_bandpass_then_highpass() {
        let graph = build(HatVariant::Closed, DrumVoiceConfig::default(), 6);
        let filters = graph.layers()[0].filters();
        assert_eq!(filters[0].filter_type, FilterType::BandPass);
        assert_eq!(filters[0].cutoff_hz, 10_000.0);
        assert_eq!(filters[0].q, 1.5);
        assert_eq!(filters[1].filter_type, FilterType::HighPass);
        assert_eq!(filters[1].cutoff_hz, 6_000.0);
    }

    #[test]
    fn open_hat_rings_longer() {
        let closed = build(HatVariant::Closed, DrumVoiceConfig::default(), 7);
        let open = build(HatVariant::Open, DrumVoiceConfig::default(), 7);
        assert_eq!(closed.stop(), 0.05);
        assert_eq!(open.stop(), 0.35);
        assert_eq!(open.label(), "open-hat");
    }
}
