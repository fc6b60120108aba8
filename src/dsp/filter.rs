use std::f32::consts::{FRAC_1_SQRT_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | constructed by       | passes          | rejects      |
| ----------------- | -------------------- | --------------- | ------------ |
| low-pass          | LPF                  | below cutoff    | above cutoff |
| high-pass         | HPF                  | above cutoff    | below cutoff |
| band-pass         | LPF ∘ HPF (series)   | around cutoff   | outside      |

Topology-preserving (TPT) state-variable filter. One structure gives all three
responses; we pick the one asked for. Coefficients:

    g = tan(π · cutoff / sample_rate)
    k = 1 / Q

The band-pass output is scaled by k so its peak gain is unity regardless of
Q, which is what a drum layer expects when it asks for "noise around 1.2 kHz".

Low/high-pass default to Q = 1/√2 (Butterworth, no peak). Band-pass defaults
to Q = 1.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

impl FilterType {
    pub fn default_q(self) -> f32 {
        match self {
            FilterType::LowPass | FilterType::HighPass => FRAC_1_SQRT_2,
            FilterType::BandPass => 1.0,
        }
    }
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,

    g: f32,
    k: f32,
    sample_rate: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: filter_type.default_q(),
            filter_type,
            g: 0.0,
            k: 0.0,
            sample_rate,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, sample_rate)
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, sample_rate)
    }

    pub fn bandpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, sample_rate)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.set_q(q);
        self
    }

    fn update_coefficients(&mut self) {
        // Keep the cutoff strictly below Nyquist, tan() blows up at π/2
        let nyquist = self.sample_rate * 0.5;
        let cutoff = self.cutoff_hz.clamp(10.0, nyquist * 0.99);
        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 1.0 / self.q;
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: k * v1,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.next_sample(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.update_coefficients();
        }
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.01);
        self.update_coefficients();
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}
