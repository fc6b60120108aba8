use crate::{
    dsp::{
        compressor::Compressor, distortion::WaveshaperCurve, filter::SVFilter,
        smoothing::SmoothedParam,
    },
    graph::node::{GraphNode, RenderCtx},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Effects Chain
=============

Every voice lands on one shared bus, modelled on a distortion pedal feeding a
glue compressor:

    input → pre-gain → waveshaper → low-pass → post-gain → compressor → master → out

There is exactly one chain per engine and it lives as long as the engine.
Voices come and go; the chain only ever sees their sum.

Pedal Controls
--------------

    distortion  pre-gain   = 1 + distortion · 10, and the waveshaper curve
    filter      cutoff     = 200 · (20000 / 200)^filter      (200 Hz .. 20 kHz)
    volume      post-gain  = volume

The filter knob is logarithmic: every 0.1 of travel is the same musical
interval, about two thirds of an octave.

No Steps
--------

Gains and cutoff never jump. A control change only moves a target; the live
value follows with a one-pole smoother (50 ms by default). The cutoff is
re-evaluated every SUB_BLOCK samples, which is far below anything audible
for a filter sweep and keeps tan() out of the per-sample loop.

The waveshaper curve is the exception: it is a table, built off the audio
thread and swapped in whole when the distortion amount changes.
*/

/// Samples between cutoff coefficient updates.
const SUB_BLOCK: usize = 32;

pub const MIN_CUTOFF_HZ: f32 = 200.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;

/// Pedal-section parameters, each in [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatConfig {
    pub distortion: f32,
    pub filter: f32,
    pub volume: f32,
}

impl Default for RatConfig {
    fn default() -> Self {
        Self {
            distortion: 0.2,
            filter: 0.7,
            volume: 0.8,
        }
    }
}

/// Partial update of a [`RatConfig`]. Missing fields keep their value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatUpdate {
    pub distortion: Option<f32>,
    pub filter: Option<f32>,
    pub volume: Option<f32>,
}

impl RatUpdate {
    pub fn distortion(value: f32) -> Self {
        Self {
            distortion: Some(value),
            ..Self::default()
        }
    }

    pub fn filter(value: f32) -> Self {
        Self {
            filter: Some(value),
            ..Self::default()
        }
    }

    pub fn volume(value: f32) -> Self {
        Self {
            volume: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distortion.is_none() && self.filter.is_none() && self.volume.is_none()
    }
}

impl RatConfig {
    /// Merge `update` into this config, clamping each field into [0, 1].
    pub fn merged(&self, update: RatUpdate) -> Self {
        Self {
            distortion: update.distortion.map_or(self.distortion, unit),
            filter: update.filter.map_or(self.filter, unit),
            volume: update.volume.map_or(self.volume, unit),
        }
    }

    pub fn clamped(&self) -> Self {
        Self {
            distortion: unit(self.distortion),
            filter: unit(self.filter),
            volume: unit(self.volume),
        }
    }
}

/// Clamp into [0, 1]; NaN goes to 0.
#[inline]
pub(crate) fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Low-pass cutoff for the filter knob, 200 Hz at 0 and 20 kHz at 1.
pub fn filter_cutoff(filter: f32) -> f32 {
    MIN_CUTOFF_HZ * (MAX_CUTOFF_HZ / MIN_CUTOFF_HZ).powf(unit(filter))
}

/// Values the smoothed stages head toward for a given config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTargets {
    pub pre_gain: f32,
    pub cutoff_hz: f32,
    pub post_gain: f32,
}

impl ChainTargets {
    pub fn for_config(config: &RatConfig) -> Self {
        let config = config.clamped();
        Self {
            pre_gain: 1.0 + config.distortion * 10.0,
            cutoff_hz: filter_cutoff(config.filter),
            post_gain: config.volume,
        }
    }
}

/// A fully prepared pedal change. The curve is built by whoever creates the
/// update, so applying it never allocates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainUpdate {
    pub config: RatConfig,
    pub curve: Option<Box<WaveshaperCurve>>,
}

impl ChainUpdate {
    /// Prepare the change from `current` to `next`, rebuilding the curve
    /// only if the distortion amount moved.
    pub fn prepare(current: &RatConfig, next: RatConfig) -> Self {
        let curve = (next.distortion != current.distortion)
            .then(|| Box::new(WaveshaperCurve::diode(next.distortion)));
        Self { config: next, curve }
    }
}

pub struct EffectsChain {
    config: RatConfig,
    pre_gain: SmoothedParam,
    cutoff: SmoothedParam,
    post_gain: SmoothedParam,
    master: SmoothedParam,
    curve: Box<WaveshaperCurve>,
    filter: SVFilter,
    compressor: Compressor,
    connected: bool,
}

impl EffectsChain {
    pub fn new(
        sample_rate: f32,
        config: RatConfig,
        master_volume: f32,
        smoothing_time: f32,
    ) -> Self {
        let config = config.clamped();
        let targets = ChainTargets::for_config(&config);

        Self {
            config,
            pre_gain: SmoothedParam::new(targets.pre_gain, smoothing_time, sample_rate),
            cutoff: SmoothedParam::new(targets.cutoff_hz, smoothing_time, sample_rate),
            post_gain: SmoothedParam::new(targets.post_gain, smoothing_time, sample_rate),
            master: SmoothedParam::new(unit(master_volume), smoothing_time, sample_rate),
            curve: Box::new(WaveshaperCurve::diode(config.distortion)),
            filter: SVFilter::lowpass(targets.cutoff_hz, sample_rate),
            compressor: Compressor::glue(sample_rate),
            connected: true,
        }
    }

    /// Merge a partial config and retarget every pedal stage.
    ///
    /// Rebuilds the curve when distortion changes, so this allocates. The
    /// engine prepares a [`ChainUpdate`] on the control thread instead and
    /// calls [`EffectsChain::apply`] from the render thread.
    pub fn update_distortion(&mut self, update: RatUpdate) {
        if update.is_empty() {
            return;
        }
        let next = self.config.merged(update);
        let prepared = ChainUpdate::prepare(&self.config, next);
        self.apply(prepared);
    }

    /// Apply a prepared change. Never allocates or frees: a replaced curve
    /// is handed back to the caller.
    pub fn apply(&mut self, update: ChainUpdate) -> Option<Box<WaveshaperCurve>> {
        let config = update.config.clamped();
        let targets = ChainTargets::for_config(&config);

        self.pre_gain.set_target(targets.pre_gain);
        self.cutoff.set_target(targets.cutoff_hz);
        self.post_gain.set_target(targets.post_gain);
        self.config = config;
        update
            .curve
            .map(|curve| std::mem::replace(&mut self.curve, curve))
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master.set_target(unit(volume));
    }

    pub fn config(&self) -> RatConfig {
        self.config
    }

    pub fn targets(&self) -> ChainTargets {
        ChainTargets {
            pre_gain: self.pre_gain.target(),
            cutoff_hz: self.cutoff.target(),
            post_gain: self.post_gain.target(),
        }
    }

    pub fn master_target(&self) -> f32 {
        self.master.target()
    }

    pub fn curve(&self) -> &WaveshaperCurve {
        &self.curve
    }

    /// Gain reduction the compressor is currently applying, in dB.
    pub fn reduction_db(&self) -> f32 {
        self.compressor.reduction_db()
    }

    /// Detach from the output. Everything rendered afterwards is silence.
    pub fn dispose(&mut self) {
        self.connected = false;
        self.filter.reset();
        self.compressor.reset();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl GraphNode for EffectsChain {
    /// Process the mixed voice bus in place.
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if !self.connected {
            out.fill(0.0);
            return;
        }

        for chunk in out.chunks_mut(SUB_BLOCK) {
            self.filter.set_cutoff(self.cutoff.advance(chunk.len()));

            for sample in chunk.iter_mut() {
                let driven = *sample * self.pre_gain.next_value();
                let shaped = self.curve.shape(driven);
                let toned = self.filter.process(shaped) * self.post_gain.next_value();
                *sample = self.compressor.process(toned) * self.master.next_value();
            }
        }
    }

    fn is_active(&self) -> bool {
        self.connected
    }
}
