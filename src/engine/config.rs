#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::effects::RatConfig;

/// Construction-time settings for a [`DrumEngine`](super::DrumEngine).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: f32,
    /// Voices that can sound at once before the oldest-ending one is stolen
    pub max_voices: usize,
    /// Control messages that can be in flight between two render blocks
    pub queue_capacity: usize,
    /// Time constant of every smoothed effects parameter, in seconds
    pub smoothing_time: f32,
    /// Seed for noise and detune. `None` seeds from the OS
    pub seed: Option<u64>,
    /// Initial pedal settings
    pub rat: RatConfig,
    pub master_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_voices: 128,
            queue_capacity: 1024,
            smoothing_time: 0.05,
            seed: None,
            rat: RatConfig::default(),
            master_volume: 0.8,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    /// Settings with every field forced into a usable range.
    pub(crate) fn sanitized(&self) -> Self {
        let sample_rate = if self.sample_rate.is_finite() && self.sample_rate >= 1_000.0 {
            self.sample_rate
        } else {
            Self::default().sample_rate
        };
        let smoothing_time = if self.smoothing_time.is_finite() {
            self.smoothing_time.max(0.0)
        } else {
            0.0
        };

        Self {
            sample_rate,
            max_voices: self.max_voices.max(1),
            queue_capacity: self.queue_capacity.max(16),
            smoothing_time,
            seed: self.seed,
            rat: self.rat.clamped(),
            master_volume: crate::graph::effects::unit(self.master_volume),
        }
    }
}
