//! Real-world scenario benchmarks.
//!
//! Single drum hits rendered through the voice graph, and the whole engine
//! rendering a busy pattern through the effects chain.

mod kit;
mod voices;

pub use kit::bench_kit;
pub use voices::bench_voices;
