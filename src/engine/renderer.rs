use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer};

use crate::{
    engine::{
        message::{EngineMessage, Reclaimed},
        scheduler::Scheduler,
    },
    graph::{
        effects::EffectsChain,
        node::{GraphNode, RenderCtx},
        voice::VoiceNode,
    },
    MAX_BLOCK_SIZE,
};

/// Render side of the engine. Move it into the audio callback.
///
/// Each call drains pending control messages, mixes every active voice,
/// runs the mix through the effects chain and advances the shared clock.
/// Nothing here blocks, logs or allocates. Voices leaving the pool go back
/// to the [`DrumEngine`](crate::DrumEngine) to be freed there, and so do
/// replaced waveshaper curves.
pub struct Renderer {
    rx: Consumer<EngineMessage>,
    freed: Producer<Reclaimed>,
    scheduler: Scheduler,
    effects: EffectsChain,
    clock: Arc<AtomicU64>,
    disposed: Arc<AtomicBool>,
    frame: u64,
    sample_rate: f32,
    mix: Vec<f32>,
    connected: bool,
    unreturned: u64,
}

impl Renderer {
    pub(crate) fn new(
        rx: Consumer<EngineMessage>,
        freed: Producer<Reclaimed>,
        scheduler: Scheduler,
        effects: EffectsChain,
        clock: Arc<AtomicU64>,
        disposed: Arc<AtomicBool>,
        sample_rate: f32,
    ) -> Self {
        Self {
            rx,
            freed,
            scheduler,
            effects,
            clock,
            disposed,
            frame: 0,
            sample_rate,
            mix: vec![0.0; MAX_BLOCK_SIZE],
            connected: true,
            unreturned: 0,
        }
    }

    /// Render mono output into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain();

        if self.connected {
            for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
                let ctx = RenderCtx::new(self.sample_rate, self.frame);
                self.scheduler.render_block(chunk, &ctx);
                self.effects.render_block(chunk, &ctx);
                self.frame += chunk.len() as u64;
                self.recycle();
            }
        } else {
            // Clock keeps running while disconnected
            out.fill(0.0);
            self.frame += out.len() as u64;
        }

        self.clock.store(self.frame, Ordering::Release);
    }

    /// Render into an interleaved device buffer, copying the mono mix to
    /// every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }

        let mut mix = std::mem::take(&mut self.mix);
        for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let len = frames.len() / channels;
            let block = &mut mix[..len];
            self.render_block(block);

            for (frame, &sample) in frames.chunks_mut(channels).zip(block.iter()) {
                frame.fill(sample);
            }
        }
        self.mix = mix;
    }

    /// Current position of the engine clock, in frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn active_voices(&self) -> usize {
        self.scheduler.active_voices()
    }

    pub fn voices(&self) -> impl Iterator<Item = &VoiceNode> {
        self.scheduler.voices()
    }

    pub fn stolen_voices(&self) -> u64 {
        self.scheduler.stolen_voices()
    }

    pub fn effects(&self) -> &EffectsChain {
        &self.effects
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Payloads freed on the render thread because the return queue was full.
    pub fn unreturned_voices(&self) -> u64 {
        self.unreturned
    }

    fn drain(&mut self) {
        if self.connected && self.disposed.load(Ordering::Acquire) {
            self.connected = false;
            self.effects.dispose();
            self.scheduler.clear();
            self.recycle();
        }

        while let Ok(message) = self.rx.pop() {
            match message {
                EngineMessage::Voice(voice) if self.connected => {
                    self.scheduler.add(voice);
                    self.recycle();
                }
                EngineMessage::Voice(voice) => self.give_back(Reclaimed::Voice(voice)),
                EngineMessage::Distortion(update) => {
                    let replaced = if self.connected {
                        self.effects.apply(update)
                    } else {
                        update.curve
                    };
                    if let Some(curve) = replaced {
                        self.give_back(Reclaimed::Curve(curve));
                    }
                }
                EngineMessage::MasterVolume(volume) => self.effects.set_master_volume(volume),
            }
        }
    }

    fn recycle(&mut self) {
        for voice in self.scheduler.take_released() {
            if self.freed.push(Reclaimed::Voice(voice)).is_err() {
                self.unreturned += 1;
            }
        }
    }

    fn give_back(&mut self, reclaimed: Reclaimed) {
        if self.freed.push(reclaimed).is_err() {
            self.unreturned += 1;
        }
    }
}
