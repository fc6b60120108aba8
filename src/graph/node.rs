/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frame: Absolute index of the first sample of the block on the engine clock
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frame: u64) -> Self {
        Self { sample_rate, frame }
    }

    /// Engine time, in seconds, of the sample at `offset` within the block.
    #[inline]
    pub fn time_at(&self, offset: usize) -> f64 {
        frame_to_time(self.frame + offset as u64, self.sample_rate)
    }
}

/// Frame index of `time` seconds on a clock running at `sample_rate`.
///
/// Negative and non-finite times map to frame zero.
#[inline]
pub fn time_to_frame(time: f64, sample_rate: f32) -> u64 {
    let frame = (time * sample_rate as f64).round();
    if frame.is_finite() && frame > 0.0 {
        frame as u64
    } else {
        0
    }
}

#[inline]
pub fn frame_to_time(frame: u64, sample_rate: f32) -> f64 {
    frame as f64 / sample_rate as f64
}

/// Core trait for render-side audio nodes
///
/// Nodes either produce a block (voices) or process one in place (the
/// effects chain). Rendering must not allocate or block.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// Used by the scheduler to know when a voice can be released.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
