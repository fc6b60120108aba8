//! Render-side graph: declarative drum layers, instantiated voices and the
//! shared effects chain.
//!
//! Descriptions (`Layer`, `VoiceGraph`) are plain values built on the control
//! thread. Instantiated nodes (`VoiceNode`, `EffectsChain`) implement
//! [`GraphNode`] and only ever run on the render thread.

/// Shared distortion pedal, compressor and master gain.
pub mod effects;
/// Single layer of a drum voice (sources, filters, gain envelope).
pub mod layer;
/// Core trait and timing helpers shared by all graph nodes.
pub mod node;
/// A whole drum hit, as description and as renderable node.
pub mod voice;

pub use effects::{ChainTargets, ChainUpdate, EffectsChain, RatConfig, RatUpdate};
pub use layer::{FilterSpec, Layer, Source};
pub use node::{GraphNode, RenderCtx};
pub use voice::{VoiceGraph, VoiceNode};
