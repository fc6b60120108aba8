pub mod dsp; // Allocation-free signal primitives
pub mod engine; // Control handle, renderer, voice pool
pub mod graph; // Layers, voices and the shared effects chain
pub mod io; // MIDI decoding and mapping
pub mod voices; // Kick, snare, hats, clap

pub use engine::{DrumEngine, EngineConfig, EngineError, Renderer};
pub use graph::effects::{RatConfig, RatUpdate};
pub use voices::{DrumType, DrumVoiceConfig};

/// Largest block rendered in one pass. Longer device buffers are split.
pub const MAX_BLOCK_SIZE: usize = 2048;
