//! The four drum voices.
//!
//! Each voice is a small routine that takes a trigger time and a
//! [`DrumVoiceConfig`] and returns a [`VoiceGraph`]: a handful of independent
//! layers with their own sources, filters and envelopes, all pinned to
//! absolute engine time. Nothing is connected or rendered here.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rat808::voices::{self, BuildCtx, DrumType, DrumVoiceConfig, Voice};
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(808);
//! let mut ctx = BuildCtx::new(48_000.0, &mut rng);
//!
//! let kick = Voice::resolve(DrumType::Kick, false);
//! let graph = voices::build(kick, 0.0, &DrumVoiceConfig::default(), &mut ctx);
//! assert_eq!(graph.layers().len(), 3);
//! ```

use rand::{Rng, RngCore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{envelope::Envelope, noise, noise::NoiseBuffer},
    graph::{effects::unit, voice::VoiceGraph},
};

pub mod clap;
pub mod hihat;
pub mod kick;
pub mod snare;

pub use clap::{clap, BURST_COUNT, BURST_SPACING, TAIL_DELAY};
pub use hihat::{hihat, HAT_RATIOS};
pub use kick::kick;
pub use snare::snare;

/// Level every decay envelope heads toward. Exponential ramps cannot reach
/// zero, and -60 dB is inaudible under the rest of the kit.
pub const SILENT: f32 = 0.001;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumType {
    Kick,
    Snare,
    /// Closed hi-hat.
    Hat,
    OpenHat,
    Clap,
}

impl DrumType {
    pub const ALL: [DrumType; 5] = [
        DrumType::Kick,
        DrumType::Snare,
        DrumType::Hat,
        DrumType::OpenHat,
        DrumType::Clap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrumType::Kick => "kick",
            DrumType::Snare => "snare",
            DrumType::Hat => "hat",
            DrumType::OpenHat => "open-hat",
            DrumType::Clap => "clap",
        }
    }
}

/// Per-trigger parameters. Supplied fresh with every trigger, never stored.
///
/// `decay` and `tone` are accepted but reserved: no voice reads them yet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumVoiceConfig {
    pub volume: f32,
    pub tune: f32,
    pub decay: f32,
    pub tone: f32,
    /// MIDI-style velocity, 0..=127
    pub velocity: f32,
}

impl Default for DrumVoiceConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            tune: 0.5,
            decay: 0.5,
            tone: 0.5,
            velocity: 127.0,
        }
    }
}

impl DrumVoiceConfig {
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    /// Every field forced into its domain. NaN maps to the minimum.
    pub fn clamped(&self) -> Self {
        Self {
            volume: unit(self.volume),
            tune: unit(self.tune),
            decay: unit(self.decay),
            tone: unit(self.tone),
            velocity: if self.velocity.is_nan() {
                0.0
            } else {
                self.velocity.clamp(0.0, 127.0)
            },
        }
    }

    /// Overall layer scale: `volume · velocity / 127`.
    pub fn level(&self) -> f32 {
        let config = self.clamped();
        config.volume * config.velocity / 127.0
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KickVariant {
    #[default]
    Classic,
    /// Higher, faster body sweep, sawtooth click and an extra noise transient.
    Modded,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatVariant {
    #[default]
    Closed,
    Open,
}

/// A drum algorithm with every variant decided.
///
/// Resolved once per trigger, so a voice never looks at engine flags while
/// it is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Kick(KickVariant),
    Snare,
    Hat(HatVariant),
    Clap,
}

impl Voice {
    pub fn resolve(drum: DrumType, kick_mod: bool) -> Self {
        match drum {
            DrumType::Kick if kick_mod => Voice::Kick(KickVariant::Modded),
            DrumType::Kick => Voice::Kick(KickVariant::Classic),
            DrumType::Snare => Voice::Snare,
            DrumType::Hat => Voice::Hat(HatVariant::Closed),
            DrumType::OpenHat => Voice::Hat(HatVariant::Open),
            DrumType::Clap => Voice::Clap,
        }
    }
}

/// What a voice needs besides its config: the sample rate for sizing noise
/// buffers, and a random source for noise and detune.
pub struct BuildCtx<'a> {
    pub sample_rate: f32,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> BuildCtx<'a> {
    pub fn new(sample_rate: f32, rng: &'a mut dyn RngCore) -> Self {
        Self { sample_rate, rng }
    }

    /// A fresh noise buffer, never shared between layers.
    pub fn noise(&mut self, duration: f32) -> NoiseBuffer {
        noise::generate(duration, self.sample_rate, &mut *self.rng)
    }

    /// Uniform detune in cents within `±spread`.
    pub fn detune(&mut self, spread: f32) -> f32 {
        self.rng.random_range(-spread..=spread)
    }
}

/// Build the voice graph for one trigger at absolute engine time `time`.
pub fn build(
    voice: Voice,
    time: f64,
    config: &DrumVoiceConfig,
    ctx: &mut BuildCtx<'_>,
) -> VoiceGraph {
    let config = config.clamped();
    match voice {
        Voice::Kick(variant) => kick(variant, time, &config, ctx),
        Voice::Snare => snare(time, &config, ctx),
        Voice::Hat(variant) => hihat(variant, time, &config, ctx),
        Voice::Clap => clap(time, &config, ctx),
    }
}

/// Hit at `peak` on `start`, then fall exponentially to [`SILENT`] over `length` seconds.
pub(crate) fn decay(peak: f32, start: f64, length: f64) -> Envelope {
    Envelope::new(0.0)
        .set_value_at(peak, start)
        .exponential_ramp_to(SILENT, start + length)
}

/// Exponential pitch sweep from `from` to `to` Hz, holding `to` afterwards.
pub(crate) fn sweep(from: f32, to: f32, start: f64, length: f64) -> Envelope {
    Envelope::new(from)
        .set_value_at(from, start)
        .exponential_ramp_to(to, start + length)
}
