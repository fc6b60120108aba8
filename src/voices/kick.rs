//! Kick drum voice.
//!
//! An analog-style bass drum built from three layers that are mixed, not
//! chained, so each can be shaped on its own.
//!
//! # How It Works
//!
//! 1. Sub: sine at the tuned base frequency (35-55 Hz), 5 ms linear fade-in
//!    so it does not click, then a long exponential tail
//! 2. Body: sine with a fast exponential pitch drop onto the base
//!    frequency. This is the "punch"
//! 3. Click: a low square (or saw) swept down and high-passed, giving the
//!    beater attack that survives small speakers
//! 4. Modded kicks add a 20 ms band-limited noise transient on top
//!
//! # Variants
//!
//! | layer       | classic                  | modded                    |
//! | ----------- | ------------------------ | ------------------------- |
//! | sub tail    | 500 ms                   | 400 ms                    |
//! | body sweep  | 180+60·tune Hz, 80 ms    | 300+100·tune Hz, 40 ms    |
//! | body decay  | 350 ms                   | 250 ms                    |
//! | click       | square 80→40 Hz, HP 60   | saw 120→40 Hz, HP 100     |
//! | transient   | none                     | noise, HP 500 + LP 2000   |

use crate::{
    dsp::{envelope::Envelope, oscillator::Waveform},
    graph::{
        layer::{FilterSpec, Layer, Source},
        voice::VoiceGraph,
    },
    voices::{decay, sweep, BuildCtx, DrumVoiceConfig, KickVariant, SILENT},
};

const SUB_ATTACK: f64 = 0.005;
const CLICK_SWEEP: f64 = 0.020;
const CLICK_DECAY: f64 = 0.030;
const TRANSIENT_LENGTH: f64 = 0.020;
const TRANSIENT_DECAY: f64 = 0.015;

struct KickShape {
    sub_decay: f64,
    body_start: f32,
    body_sweep: f64,
    body_decay: f64,
    click_wave: Waveform,
    click_from: f32,
    click_highpass: f32,
}

impl KickShape {
    fn for_variant(variant: KickVariant, tune: f32) -> Self {
        match variant {
            KickVariant::Classic => Self {
                sub_decay: 0.5,
                body_start: 180.0 + tune * 60.0,
                body_sweep: 0.080,
                body_decay: 0.35,
                click_wave: Waveform::Square,
                click_from: 80.0,
                click_highpass: 60.0,
            },
            KickVariant::Modded => Self {
                sub_decay: 0.4,
                body_start: 300.0 + tune * 100.0,
                body_sweep: 0.040,
                body_decay: 0.25,
                click_wave: Waveform::Sawtooth,
                click_from: 120.0,
                click_highpass: 100.0,
            },
        }
    }
}

/// Fundamental of the kick: 35 Hz at tune 0, 55 Hz at tune 1.
pub fn base_frequency(tune: f32) -> f32 {
    35.0 + tune * 20.0
}

pub fn kick(
    variant: KickVariant,
    time: f64,
    config: &DrumVoiceConfig,
    ctx: &mut BuildCtx<'_>,
) -> VoiceGraph {
    let vol = config.level();
    let base = base_frequency(config.tune);
    let shape = KickShape::for_variant(variant, config.tune);

    let sub = Layer::new("sub", time, time + shape.sub_decay)
        .source(Source::oscillator(Waveform::Sine, Envelope::constant(base)))
        .gain(
            Envelope::new(0.0)
                .set_value_at(0.0, time)
                .linear_ramp_to(vol * 0.8, time + SUB_ATTACK)
                .exponential_ramp_to(SILENT, time + shape.sub_decay),
        );

    let body = Layer::new("body", time, time + shape.body_decay)
        .source(Source::oscillator(
            Waveform::Sine,
            sweep(shape.body_start, base, time, shape.body_sweep),
        ))
        .gain(decay(vol, time, shape.body_decay));

    let click = Layer::new("click", time, time + CLICK_DECAY)
        .source(Source::oscillator(
            shape.click_wave,
            sweep(shape.click_from, 40.0, time, CLICK_SWEEP),
        ))
        .through(FilterSpec::highpass(shape.click_highpass))
        .gain(decay(vol * 0.3, time, CLICK_DECAY));

    let graph = VoiceGraph::new("kick").layer(sub).layer(body).layer(click);

    match variant {
        KickVariant::Classic => graph,
        KickVariant::Modded => {
            let burst = ctx.noise(TRANSIENT_LENGTH as f32);
            graph.layer(
                Layer::new("transient", time, time + TRANSIENT_LENGTH)
                    .source(Source::noise(burst))
                    .through(FilterSpec::highpass(500.0))
                    .through(FilterSpec::lowpass(2000.0))
                    .gain(
                        Envelope::new(0.0)
                            .set_value_at(vol * 0.2, time)
                            .exponential_ramp_to(SILENT, time + TRANSIENT_DECAY)
                            .set_value_at(0.0, time + TRANSIENT_LENGTH),
                    ),
            )
        }
    }
}
