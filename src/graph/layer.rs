use crate::{
    dsp::{
        envelope::Envelope,
        filter::{FilterType, SVFilter},
        noise::NoiseBuffer,
        oscillator::{cents_to_ratio, Oscillator, Waveform},
    },
    graph::node::{frame_to_time, time_to_frame},
};

/*
Layers
======

A drum hit is a handful of independent layers: a sine for the sub, a
swept sine for the body, a burst of filtered noise for the click. Each layer
is a tiny fixed chain

    [source(s)] ──(+)──→ [filter] ──→ [filter] ──→ (× gain envelope) ──→ out

that exists only between its start and stop times.

This module holds the DESCRIPTION of a layer: plain data that says which
sources, which filters, which envelope and when. Building a description does
no rendering and touches no shared state, so it can be inspected in tests
and shipped across threads before it is turned into a `LayerNode` that
actually makes sound.

Example usage:

  // 45 Hz sub with a 5 ms attack and half-second decay
  let sub = Layer::new("sub", t, t + 0.5)
      .source(Source::oscillator(Waveform::Sine, Envelope::constant(45.0)))
      .gain(
          Envelope::new(0.0)
              .set_value_at(0.0, t)
              .linear_ramp_to(0.8, t + 0.005)
              .exponential_ramp_to(0.001, t + 0.5),
      );

  // noise click, high-passed
  let click = Layer::new("click", t, t + 0.01)
      .source(Source::noise(buffer))
      .through(FilterSpec::highpass(1000.0))
      .gain(Envelope::new(0.0).set_value_at(0.3, t).exponential_ramp_to(0.001, t + 0.01));
*/

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Oscillator {
        waveform: Waveform,
        /// Frequency in Hz over engine time
        frequency: Envelope,
        detune_cents: f32,
        level: f32,
    },
    Noise {
        buffer: NoiseBuffer,
        level: f32,
    },
}

impl Source {
    pub fn oscillator(waveform: Waveform, frequency: Envelope) -> Self {
        Source::Oscillator {
            waveform,
            frequency,
            detune_cents: 0.0,
            level: 1.0,
        }
    }

    pub fn noise(buffer: NoiseBuffer) -> Self {
        Source::Noise { buffer, level: 1.0 }
    }

    pub fn with_detune(self, cents: f32) -> Self {
        match self {
            Source::Oscillator {
                waveform,
                frequency,
                level,
                ..
            } => Source::Oscillator {
                waveform,
                frequency,
                detune_cents: cents,
                level,
            },
            noise => noise,
        }
    }

    pub fn with_level(self, level: f32) -> Self {
        match self {
            Source::Oscillator {
                waveform,
                frequency,
                detune_cents,
                ..
            } => Source::Oscillator {
                waveform,
                frequency,
                detune_cents,
                level,
            },
            Source::Noise { buffer, .. } => Source::Noise { buffer, level },
        }
    }

    pub fn level(&self) -> f32 {
        match self {
            Source::Oscillator { level, .. } | Source::Noise { level, .. } => *level,
        }
    }

    pub fn waveform(&self) -> Option<Waveform> {
        match self {
            Source::Oscillator { waveform, .. } => Some(*waveform),
            Source::Noise { .. } => None,
        }
    }

    pub fn frequency(&self) -> Option<&Envelope> {
        match self {
            Source::Oscillator { frequency, .. } => Some(frequency),
            Source::Noise { .. } => None,
        }
    }

    pub fn detune_cents(&self) -> f32 {
        match self {
            Source::Oscillator { detune_cents, .. } => *detune_cents,
            Source::Noise { .. } => 0.0,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, Source::Noise { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
}

impl FilterSpec {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            filter_type,
            cutoff_hz,
            q: filter_type.default_q(),
        }
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    fn build(&self, sample_rate: f32) -> SVFilter {
        SVFilter::new(self.filter_type, self.cutoff_hz, sample_rate).with_q(self.q)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: &'static str,
    sources: Vec<Source>,
    filters: Vec<FilterSpec>,
    gain: Envelope,
    start: f64,
    stop: f64,
}

impl Layer {
    pub fn new(name: &'static str, start: f64, stop: f64) -> Self {
        Self {
            name,
            sources: Vec::new(),
            filters: Vec::new(),
            gain: Envelope::constant(1.0),
            start,
            stop: stop.max(start),
        }
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn through(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn gain(mut self, gain: Envelope) -> Self {
        self.gain = gain;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    pub fn gain_envelope(&self) -> &Envelope {
        &self.gain
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Peak amplitude the gain envelope reaches.
    pub fn peak_gain(&self) -> f32 {
        self.gain.peak()
    }

    pub(crate) fn instantiate(&self, sample_rate: f32) -> LayerNode {
        let sources = self
            .sources
            .iter()
            .map(|source| match source {
                Source::Oscillator {
                    waveform,
                    frequency,
                    detune_cents,
                    level,
                } => SourceNode::Oscillator {
                    osc: Oscillator::new(*waveform),
                    frequency: frequency.clone(),
                    ratio: cents_to_ratio(*detune_cents),
                    level: *level,
                },
                Source::Noise { buffer, level } => SourceNode::Noise {
                    buffer: buffer.clone(),
                    level: *level,
                },
            })
            .collect();

        LayerNode {
            sources,
            filters: self.filters.iter().map(|f| f.build(sample_rate)).collect(),
            gain: self.gain.clone(),
            start_frame: time_to_frame(self.start, sample_rate),
            stop_frame: time_to_frame(self.stop, sample_rate),
            sample_rate,
        }
    }
}

enum SourceNode {
    Oscillator {
        osc: Oscillator,
        frequency: Envelope,
        ratio: f32,
        level: f32,
    },
    Noise {
        buffer: NoiseBuffer,
        level: f32,
    },
}

impl SourceNode {
    /// `elapsed` counts frames since the layer's start, so noise read by a
    /// voice that starts late skips the part already gone.
    #[inline]
    fn next_sample(&mut self, time: f64, elapsed: usize, sample_rate: f32) -> f32 {
        match self {
            SourceNode::Oscillator {
                osc,
                frequency,
                ratio,
                level,
            } => {
                let freq = frequency.value_at(time) * *ratio;
                osc.next_sample(freq, sample_rate) * *level
            }
            SourceNode::Noise { buffer, level } => buffer.get(elapsed) * *level,
        }
    }
}

/// A layer instantiated for rendering: sources with running phase, filters
/// with state, and its active span in frames.
pub(crate) struct LayerNode {
    sources: Vec<SourceNode>,
    filters: Vec<SVFilter>,
    gain: Envelope,
    start_frame: u64,
    stop_frame: u64,
    sample_rate: f32,
}

impl LayerNode {
    pub(crate) fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    /// Add this layer's output for the block starting at `frame` into `out`.
    pub(crate) fn render_add(&mut self, out: &mut [f32], frame: u64) {
        let block_end = frame + out.len() as u64;
        if block_end <= self.start_frame || frame >= self.stop_frame {
            return;
        }

        let first = self.start_frame.saturating_sub(frame) as usize;
        let last = (self.stop_frame.min(block_end) - frame) as usize;

        for (offset, sample) in out[first..last].iter_mut().enumerate() {
            let current = frame + (first + offset) as u64;
            let time = frame_to_time(current, self.sample_rate);
            let elapsed = (current - self.start_frame) as usize;

            let mut x = 0.0;
            for source in self.sources.iter_mut() {
                x += source.next_sample(time, elapsed, self.sample_rate);
            }
            for filter in self.filters.iter_mut() {
                x = filter.process(x);
            }

            *sample += x * self.gain.value_at(time);
        }
    }
}
