//! Clap voice.
//!
//! A hand clap is several hands hitting within a few milliseconds, then the
//! room answering. We fake both with band-passed noise.
//!
//! # How It Works
//!
//! 1. Four 20 ms noise bursts, 12 ms apart, band-passed around 1.2-2 kHz.
//!    The last one is twice as loud as the others
//! 2. 40 ms after the trigger a quarter-second tail, band-passed a little
//!    higher and high-passed at 800 Hz, for the reverberant decay
//!
//! Every burst has its own noise buffer so the hits do not phase against
//! each other.

use crate::{
    graph::{
        layer::{FilterSpec, Layer, Source},
        voice::VoiceGraph,
    },
    voices::{decay, BuildCtx, DrumVoiceConfig},
};

pub const BURST_COUNT: usize = 4;
/// Seconds between burst onsets.
pub const BURST_SPACING: f64 = 0.012;
/// Seconds from the trigger to the tail onset.
pub const TAIL_DELAY: f64 = 0.04;

const BURST_LENGTH: f64 = 0.020;
const BURST_LEVELS: [f32; BURST_COUNT] = [0.4, 0.4, 0.4, 0.8];
const TAIL_LENGTH: f64 = 0.25;

pub fn clap(time: f64, config: &DrumVoiceConfig, ctx: &mut BuildCtx<'_>) -> VoiceGraph {
    let level = config.level();
    let mut graph = VoiceGraph::new("clap");

    for (i, burst_level) in BURST_LEVELS.iter().enumerate() {
        let onset = time + i as f64 * BURST_SPACING;
        graph = graph.layer(
            Layer::new("burst", onset, onset + BURST_LENGTH)
                .source(Source::noise(ctx.noise(BURST_LENGTH as f32)))
                .through(FilterSpec::bandpass(1200.0 + config.tune * 800.0))
                .gain(decay(level * burst_level, onset, BURST_LENGTH)),
        );
    }

    let onset = time + TAIL_DELAY;
    graph.layer(
        Layer::new("tail", onset, onset + TAIL_LENGTH)
            .source(Source::noise(ctx.noise(TAIL_LENGTH as f32)))
            .through(FilterSpec::bandpass(1500.0 + config.tune * 1000.0))
            .through(FilterSpec::highpass(800.0))
            .gain(decay(level * 0.3, onset, TAIL_LENGTH)),
    )
}
