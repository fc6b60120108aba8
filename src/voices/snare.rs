//! Snare drum voice.
//!
//! Two tonal layers for the drum shell and two noise layers for the wires
//! and stick.
//!
//! # How It Works
//!
//! 1. Body-low: sine at 0.8× the tuned body frequency, 150 ms decay
//! 2. Body-high: triangle swept from 2× down to 1.2× the body frequency in
//!    50 ms, which reads as the shell's pitch drop
//! 3. Wires: a quarter second of noise, band-limited between 2 kHz and a
//!    tune-dependent upper edge. Decays in two stages: quickly to 10%, then
//!    slowly out, the long rattle after the crack
//! 4. Click: 10 ms of high-passed noise for the stick attack

use crate::{
    dsp::{envelope::Envelope, oscillator::Waveform},
    graph::{
        layer::{FilterSpec, Layer, Source},
        voice::VoiceGraph,
    },
    voices::{decay, sweep, BuildCtx, DrumVoiceConfig, SILENT},
};

const WIRES_LENGTH: f64 = 0.25;
const WIRES_KNEE: f64 = 0.080;
const CLICK_LENGTH: f64 = 0.010;

pub fn body_frequency(tune: f32) -> f32 {
    150.0 + tune * 100.0
}

pub fn snare(time: f64, config: &DrumVoiceConfig, ctx: &mut BuildCtx<'_>) -> VoiceGraph {
    let level = config.level();
    let body = body_frequency(config.tune);

    let body_low = Layer::new("body-low", time, time + 0.15)
        .source(Source::oscillator(Waveform::Sine, Envelope::constant(body * 0.8)))
        .gain(decay(level * 0.5, time, 0.15));

    let body_high = Layer::new("body-high", time, time + 0.1)
        .source(Source::oscillator(
            Waveform::Triangle,
            sweep(body * 2.0, body * 1.2, time, 0.05),
        ))
        .gain(decay(level * 0.4, time, 0.1));

    let wires_peak = level * 0.6;
    let wires = Layer::new("wires", time, time + WIRES_LENGTH)
        .source(Source::noise(ctx.noise(WIRES_LENGTH as f32)))
        .through(FilterSpec::highpass(2000.0))
        .through(FilterSpec::lowpass(8000.0 + config.tune * 4000.0))
        .gain(
            Envelope::new(0.0)
                .set_value_at(wires_peak, time)
                .exponential_ramp_to(wires_peak * 0.1, time + WIRES_KNEE)
                .exponential_ramp_to(SILENT, time + WIRES_LENGTH),
        );

    let click = Layer::new("click", time, time + CLICK_LENGTH)
        .source(Source::noise(ctx.noise(CLICK_LENGTH as f32)))
        .through(FilterSpec::highpass(1000.0))
        .gain(decay(level * 0.3, time, CLICK_LENGTH));

    VoiceGraph::new("snare")
        .layer(body_low)
        .layer(body_high)
        .layer(wires)
        .layer(click)
}
