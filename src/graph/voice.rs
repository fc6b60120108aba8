use crate::graph::{
    layer::{Layer, LayerNode},
    node::{time_to_frame, GraphNode, RenderCtx},
};

/// Declarative description of one drum hit.
///
/// Building a `VoiceGraph` has no side effects. The only thing that makes it
/// audible is handing the instantiated node to the engine, which mixes it
/// into the shared effects input.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceGraph {
    label: &'static str,
    layers: Vec<Layer>,
}

impl VoiceGraph {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            layers: Vec::new(),
        }
    }

    /// Append an independent layer. Layers are mixed, never chained.
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn find(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    pub fn layers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers.iter().filter(move |layer| layer.name() == name)
    }

    /// Earliest layer start, in seconds.
    pub fn start(&self) -> f64 {
        self.layers
            .iter()
            .map(Layer::start)
            .fold(f64::INFINITY, f64::min)
    }

    /// Latest layer stop, in seconds. Nothing sounds after this.
    pub fn stop(&self) -> f64 {
        self.layers.iter().map(Layer::stop).fold(0.0, f64::max)
    }

    /// Turn the description into a renderable node. Allocates.
    pub fn instantiate(&self, sample_rate: f32) -> VoiceNode {
        let layers: Vec<LayerNode> = self
            .layers
            .iter()
            .map(|layer| layer.instantiate(sample_rate))
            .collect();
        let stop_frame = layers.iter().map(LayerNode::stop_frame).max().unwrap_or(0);

        VoiceNode {
            label: self.label,
            layers,
            stop_frame,
            start_frame: time_to_frame(self.start(), sample_rate),
            rendered_to: 0,
        }
    }
}

/// A voice ready for the render thread.
pub struct VoiceNode {
    label: &'static str,
    layers: Vec<LayerNode>,
    start_frame: u64,
    stop_frame: u64,
    rendered_to: u64,
}

impl VoiceNode {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    /// First frame at which every layer is silent.
    pub fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl GraphNode for VoiceNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        for layer in self.layers.iter_mut() {
            layer.render_add(out, ctx.frame);
        }
        self.rendered_to = ctx.frame + out.len() as u64;
    }

    fn is_active(&self) -> bool {
        self.rendered_to < self.stop_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{envelope::Envelope, oscillator::Waveform};
    use crate::graph::layer::Source;

    fn tone(name: &'static str, start: f64, stop: f64) -> Layer {
        Layer::new(name, start, stop)
            .source(Source::oscillator(Waveform::Square, Envelope::constant(10.0)))
    }

    #[test]
    fn span_covers_all_layers() {
        let voice = VoiceGraph::new("test")
            .layer(tone("a", 0.5, 0.6))
            .layer(tone("b", 0.54, 0.75));
        assert_eq!(voice.start(), 0.5);
        assert_eq!(voice.stop(), 0.75);
        assert_eq!(voice.layers().len(), 2);
        assert!(voice.find("b").is_some());
        assert!(voice.find("c").is_none());
    }

    #[test]
    fn node_stays_active_until_stop_is_rendered() {
        let voice = VoiceGraph::new("test").layer(tone("a", 0.0, 0.010));
        let mut node = voice.instantiate(1_000.0);
        assert_eq!(node.stop_frame(), 10);
        assert!(node.is_active());

        let mut out = [0.0f32; 8];
        node.render_block(&mut out, &RenderCtx::new(1_000.0, 0));
        assert!(node.is_active(), "two frames still to play");

        node.render_block(&mut out, &RenderCtx::new(1_000.0, 8));
        assert!(!node.is_active());
        assert_eq!(&out[..2], &[1.0, 1.0]);
        assert!(out[2..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn layers_are_mixed_not_chained() {
        let voice = VoiceGraph::new("test")
            .layer(tone("a", 0.0, 0.004))
            .layer(tone("b", 0.0, 0.004));
        let mut node = voice.instantiate(1_000.0);
        let mut out = [0.0f32; 4];
        node.render_block(&mut out, &RenderCtx::new(1_000.0, 0));
        assert_eq!(out, [2.0; 4]);
    }
}
