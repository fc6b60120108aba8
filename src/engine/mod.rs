//! Engine facade: control handle, render side and the queue between them.
//!
//! ```text
//!   sequencer / MIDI                          audio callback
//!         │                                         │
//!   ┌─────▼──────┐   EngineMessage (rtrb SPSC)   ┌──▼───────┐
//!   │ DrumEngine │ ────────────────────────────▶ │ Renderer │
//!   │            │ ◀──────────────────────────── │          │
//!   └─────▲──────┘     Reclaimed (rtrb SPSC)     └──┬───────┘
//!         └──────────── clock (AtomicU64) ──────────┘
//! ```
//!
//! `DrumEngine` builds voices and prepares effect changes; every allocation
//! happens there, and so does every free: finished voices and replaced
//! curves come back on the second queue. `Renderer` only moves finished payloads into place and
//! renders. Triggers carry absolute times on the renderer's clock, so a
//! caller scheduling a little ahead of [`DrumEngine::current_time`] gets
//! sample-accurate onsets regardless of callback jitter.

pub mod config;
pub mod message;
pub mod renderer;
pub mod scheduler;

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use log::{debug, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;

pub use self::{
    config::EngineConfig,
    message::{EngineMessage, Reclaimed},
    renderer::Renderer,
    scheduler::Scheduler,
};

use crate::{
    graph::{
        effects::{unit, ChainUpdate, EffectsChain, RatConfig, RatUpdate},
        node::frame_to_time,
        voice::VoiceGraph,
    },
    voices::{self, BuildCtx, DrumType, DrumVoiceConfig, Voice},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("drum engine has been disposed")]
    Disposed,
    #[error("control queue is full, message dropped")]
    QueueFull,
}

/// Control handle of the drum engine.
///
/// Exactly one effects chain exists per engine, owned by its [`Renderer`].
/// All calls are non-blocking.
pub struct DrumEngine {
    tx: Producer<EngineMessage>,
    freed: Consumer<Reclaimed>,
    clock: Arc<AtomicU64>,
    disposed: Arc<AtomicBool>,
    sample_rate: f32,
    rng: Pcg32,
    kick_mod: bool,
    rat: RatConfig,
    master_volume: f32,
}

impl DrumEngine {
    pub fn new(config: EngineConfig) -> (Self, Renderer) {
        let config = config.sanitized();
        let (tx, rx) = RingBuffer::new(config.queue_capacity);
        // Room for a full pool plus everything one drain of `rx` can evict
        let (freed_tx, freed) = RingBuffer::new(config.queue_capacity + config.max_voices);
        let clock = Arc::new(AtomicU64::new(0));
        let disposed = Arc::new(AtomicBool::new(false));
        let seed = config.seed.unwrap_or_else(rand::random);

        let effects = EffectsChain::new(
            config.sample_rate,
            config.rat,
            config.master_volume,
            config.smoothing_time,
        );
        let renderer = Renderer::new(
            rx,
            freed_tx,
            Scheduler::new(config.max_voices),
            effects,
            clock.clone(),
            disposed.clone(),
            config.sample_rate,
        );

        debug!(
            "drum engine created: {} Hz, {} voices, seed {}",
            config.sample_rate, config.max_voices, seed
        );

        let engine = Self {
            tx,
            freed,
            clock,
            disposed,
            sample_rate: config.sample_rate,
            rng: Pcg32::seed_from_u64(seed),
            kick_mod: false,
            rat: config.rat,
            master_volume: config.master_volume,
        };
        (engine, renderer)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Seconds rendered so far. Schedule triggers at or after this.
    pub fn current_time(&self) -> f64 {
        frame_to_time(self.clock.load(Ordering::Acquire), self.sample_rate)
    }

    /// Schedule one drum hit at absolute engine `time`.
    ///
    /// Non-finite times mean "now"; negative times are clamped to zero.
    /// Times already in the past play immediately with the elapsed part
    /// of the hit cut off.
    pub fn trigger(
        &mut self,
        drum: DrumType,
        time: f64,
        config: DrumVoiceConfig,
    ) -> Result<(), EngineError> {
        self.ensure_live("trigger")?;

        let time = if time.is_finite() {
            time.max(0.0)
        } else {
            self.current_time()
        };
        let voice = Voice::resolve(drum, self.kick_mod);
        let mut ctx = BuildCtx::new(self.sample_rate, &mut self.rng);
        let graph = voices::build(voice, time, &config, &mut ctx);

        self.attach(graph)
    }

    /// Mix a prepared voice graph into the effects input.
    pub fn attach(&mut self, graph: VoiceGraph) -> Result<(), EngineError> {
        self.ensure_live("attach")?;
        self.reclaim();
        let node = Box::new(graph.instantiate(self.sample_rate));
        self.push(EngineMessage::Voice(node))
    }

    /// Merge a partial pedal update. Changes ramp in, never step.
    pub fn update_distortion(&mut self, update: RatUpdate) -> Result<(), EngineError> {
        self.ensure_live("update_distortion")?;

        let next = self.rat.merged(update);
        if update.is_empty() || next == self.rat {
            return Ok(());
        }

        self.reclaim();
        self.push(EngineMessage::Distortion(ChainUpdate::prepare(&self.rat, next)))?;
        debug!("pedal updated: {:?}", next);
        self.rat = next;
        Ok(())
    }

    pub fn set_master_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        self.ensure_live("set_master_volume")?;

        let volume = unit(volume);
        self.push(EngineMessage::MasterVolume(volume))?;
        debug!("master volume: {volume}");
        self.master_volume = volume;
        Ok(())
    }

    /// Select the modded kick for future triggers. Voices already scheduled
    /// keep the variant they were built with.
    pub fn set_kick_mod_enabled(&mut self, enabled: bool) {
        if enabled != self.kick_mod {
            debug!("kick mod {}", if enabled { "on" } else { "off" });
        }
        self.kick_mod = enabled;
    }

    pub fn kick_mod_enabled(&self) -> bool {
        self.kick_mod
    }

    /// Last applied pedal settings.
    pub fn rat_config(&self) -> RatConfig {
        self.rat
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Detach the effects chain from the output. Rendering produces silence
    /// from the next block on, and every later call returns
    /// [`EngineError::Disposed`].
    pub fn dispose(&mut self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            debug!("drum engine disposed at {:.3}s", self.current_time());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Free whatever the renderer has handed back. Runs on every trigger and
    /// pedal change; call it directly when the engine sits idle for long.
    pub fn reclaim(&mut self) -> usize {
        let mut count = 0;
        while let Ok(reclaimed) = self.freed.pop() {
            drop(reclaimed);
            count += 1;
        }
        count
    }

    fn ensure_live(&self, operation: &str) -> Result<(), EngineError> {
        if self.is_disposed() {
            warn!("{operation} called on a disposed drum engine");
            Err(EngineError::Disposed)
        } else {
            Ok(())
        }
    }

    fn push(&mut self, message: EngineMessage) -> Result<(), EngineError> {
        self.tx.push(message).map_err(|rtrb::PushError::Full(dropped)| {
            warn!("control queue full, dropping {:?}", dropped);
            EngineError::QueueFull
        })
    }
}
