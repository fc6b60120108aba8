//! Low-level DSP primitives used by the drum voices and the effects chain.
//!
//! Everything that runs per sample is allocation-free and realtime-safe. The
//! two builders that do allocate (`noise::generate` and
//! `WaveshaperCurve::diode`) are only ever called on the control thread.

/// Feed-forward soft-knee compressor.
pub mod compressor;
/// Asymmetric diode-clipper waveshaping curve.
pub mod distortion;
/// Breakpoint automation (set/linear/exponential ramps over time).
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Uniform white-noise buffers.
pub mod noise;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;
/// One-pole parameter smoothing.
pub mod smoothing;

pub use envelope::Envelope;
pub use noise::NoiseBuffer;
pub use oscillator::Waveform;
