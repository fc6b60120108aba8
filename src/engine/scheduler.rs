use crate::{
    graph::{
        node::{GraphNode, RenderCtx},
        voice::VoiceNode,
    },
    MAX_BLOCK_SIZE,
};

/// Fixed-capacity pool of in-flight voices.
///
/// Voices are mixed for as long as they are active and released at the
/// first block boundary after their stop frame. When the pool is full the
/// voice that ends soonest is stolen to make room.
///
/// Released and stolen voices are parked until [`Scheduler::take_released`]
/// hands them out, so the pool itself never frees a voice.
pub struct Scheduler {
    voices: Vec<Box<VoiceNode>>,
    released: Vec<Box<VoiceNode>>,
    temp_buffer: Vec<f32>,
    max_voices: usize,
    stolen: u64,
}

impl Scheduler {
    pub fn new(max_voices: usize) -> Self {
        let max_voices = max_voices.max(1);
        Self {
            voices: Vec::with_capacity(max_voices),
            released: Vec::with_capacity(max_voices * 2),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            max_voices,
            stolen: 0,
        }
    }

    /// Add a voice, stealing one if the pool is full.
    pub fn add(&mut self, voice: Box<VoiceNode>) {
        if self.voices.len() >= self.max_voices {
            let ending_first = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| v.stop_frame())
                .map(|(idx, _)| idx);

            if let Some(idx) = ending_first {
                let stolen = self.voices.remove(idx);
                self.released.push(stolen);
                self.stolen += 1;
            }
        }
        self.voices.push(voice);
    }

    /// Voices that left the pool since the last call, finished or stolen.
    pub fn take_released(&mut self) -> std::vec::Drain<'_, Box<VoiceNode>> {
        self.released.drain(..)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// In-flight voices, oldest first.
    pub fn voices(&self) -> impl Iterator<Item = &VoiceNode> {
        self.voices.iter().map(|voice| voice.as_ref())
    }

    /// Voices cut short because the pool was full.
    pub fn stolen_voices(&self) -> u64 {
        self.stolen
    }

    pub fn capacity(&self) -> usize {
        self.max_voices
    }

    /// Release every voice at once.
    pub fn clear(&mut self) {
        self.released.append(&mut self.voices);
    }
}

impl GraphNode for Scheduler {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let block_end = ctx.frame + out.len() as u64;

        for voice in self.voices.iter_mut() {
            if voice.start_frame() >= block_end {
                continue;
            }

            let temp = &mut self.temp_buffer[..out.len()];
            voice.render_block(temp, ctx);
            for (o, v) in out.iter_mut().zip(temp.iter()) {
                *o += v;
            }
        }

        let mut index = 0;
        while index < self.voices.len() {
            if self.voices[index].is_active() {
                index += 1;
            } else {
                let finished = self.voices.remove(index);
                self.released.push(finished);
            }
        }
    }

    fn is_active(&self) -> bool {
        !self.voices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{envelope::Envelope, oscillator::Waveform};
    use crate::graph::{
        layer::{Layer, Source},
        voice::VoiceGraph,
    };

    const SAMPLE_RATE: f32 = 1_000.0;

    fn voice(start: f64, stop: f64) -> Box<VoiceNode> {
        let graph = VoiceGraph::new("test").layer(
            Layer::new("tone", start, stop)
                .source(Source::oscillator(Waveform::Square, Envelope::constant(1.0))),
        );
        Box::new(graph.instantiate(SAMPLE_RATE))
    }

    #[test]
    fn voice_starts_on_its_frame() {
        let mut scheduler = Scheduler::new(4);
        scheduler.add(voice(0.005, 0.1));

        let mut out = [0.0f32; 16];
        scheduler.render_block(&mut out, &RenderCtx::new(SAMPLE_RATE, 0));
        assert!(out[..5].iter().all(|&s| s == 0.0));
        assert!(out[5..].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn finished_voices_are_released_after_stop() {
        let mut scheduler = Scheduler::new(4);
        scheduler.add(voice(0.0, 0.020));

        let mut out = [0.0f32; 16];
        scheduler.render_block(&mut out, &RenderCtx::new(SAMPLE_RATE, 0));
        assert_eq!(scheduler.active_voices(), 1);
        scheduler.render_block(&mut out, &RenderCtx::new(SAMPLE_RATE, 16));
        assert_eq!(scheduler.active_voices(), 0);
        assert_eq!(&out[..4], &[1.0; 4]);

        let released: Vec<_> = scheduler.take_released().map(|v| v.stop_frame()).collect();
        assert_eq!(released, [20]);
        assert_eq!(scheduler.take_released().count(), 0);
    }

    #[test]
    fn future_voices_wait() {
        let mut scheduler = Scheduler::new(4);
        scheduler.add(voice(10.0, 10.5));
        let mut out = [0.0f32; 16];
        for block in 0..10 {
            scheduler.render_block(&mut out, &RenderCtx::new(SAMPLE_RATE, block * 16));
        }
        assert_eq!(scheduler.active_voices(), 1);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn overlapping_voices_sum() {
        let mut scheduler = Scheduler::new(4);
        scheduler.add(voice(0.0, 0.1));
        scheduler.add(voice(0.004, 0.1));
        let mut out = [0.0f32; 8];
        scheduler.render_block(&mut out, &RenderCtx::new(SAMPLE_RATE, 0));
        assert_eq!(out, [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn full_pool_steals_the_voice_ending_first() {
        let mut scheduler = Scheduler::new(2);
        scheduler.add(voice(0.0, 0.5));
        scheduler.add(voice(0.0, 0.2));
        assert_eq!(scheduler.take_released().count(), 0);

        scheduler.add(voice(0.0, 0.9));
        let stolen: Vec<_> = scheduler.take_released().map(|v| v.stop_frame()).collect();
        assert_eq!(stolen, [200]);
        assert_eq!(scheduler.active_voices(), 2);
        assert_eq!(scheduler.stolen_voices(), 1);
    }

    #[test]
    fn clear_releases_every_voice() {
        let mut scheduler = Scheduler::new(4);
        scheduler.add(voice(0.0, 0.5));
        scheduler.add(voice(1.0, 1.5));
        scheduler.clear();
        assert_eq!(scheduler.active_voices(), 0);
        assert_eq!(scheduler.take_released().count(), 2);
    }
}
