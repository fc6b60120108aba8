//! White noise buffers.
//!
//! Noise layers (snare wires, clap bursts, the kick's modded transient) play
//! a pre-generated buffer rather than calling the RNG per sample. The buffer
//! is built on the control side at trigger time, so the render thread only
//! reads memory.

use rand::Rng;

/// An immutable run of uniformly distributed samples in [-1, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseBuffer {
    samples: Vec<f32>,
}

impl NoiseBuffer {
    /// Number of samples a buffer of `duration` seconds holds at `sample_rate`.
    ///
    /// Non-positive or non-finite inputs yield zero.
    pub fn len_for(duration: f32, sample_rate: f32) -> usize {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(duration) || !valid(sample_rate) {
            return 0;
        }
        (duration as f64 * sample_rate as f64).ceil() as usize
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at `index`, or silence once the buffer has been played out.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.samples.get(index).copied().unwrap_or(0.0)
    }
}

/// Generate `ceil(duration * sample_rate)` independent uniform samples.
///
/// A duration that is zero, negative or not finite produces an empty buffer
/// instead of an error, so a bad parameter can never reach the render path
/// as a failure.
pub fn generate<R: Rng + ?Sized>(duration: f32, sample_rate: f32, rng: &mut R) -> NoiseBuffer {
    let len = NoiseBuffer::len_for(duration, sample_rate);
    let samples = (0..len).map(|_| rng.random_range(-1.0f32..=1.0)).collect();
    NoiseBuffer { samples }
}
