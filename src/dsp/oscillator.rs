use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

Every periodic waveform here is a function of a single number: the phase,
which runs from 0.0 to 1.0 once per cycle. Each sample we advance it by

    increment = frequency / sample_rate

and wrap it back into [0, 1). The waveform is then just a lookup:

    Sine      sin(2π · phase)
    Square    +1 for the first half of the cycle, -1 for the second
    Sawtooth  2 · phase - 1           (rising ramp)
    Triangle  1 - 4 · |phase - 0.5|   (starts at -1, peaks mid-cycle)

Because the frequency is read fresh each sample, pitch sweeps (the kick's
body, the snare's high body) are just a changing increment. The phase never
jumps, so sweeping does not click.

No band-limiting is applied. The drum voices either run at low pitches
(kick, snare bodies) or are filtered hard afterwards (hi-hat bank), which
keeps aliasing out of the audible result.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = shape(self.waveform, self.phase);

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 || self.phase < 0.0 {
            self.phase = self.phase.rem_euclid(1.0);
        }

        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[inline]
fn shape(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

/// Frequency multiplier for a detune in cents (100 cents = 1 semitone).
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    2.0_f32.powf(cents / 1200.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let freq = 440.0;
        let mut osc = Oscillator::new(Waveform::Sine);

        let buffer: Vec<f32> = (0..128).map(|_| osc.next_sample(freq, sample_rate)).collect();

        let sample_index = 12;
        let expected = (TAU * freq * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn square_alternates_full_scale() {
        let mut osc = Oscillator::new(Waveform::Square);
        // 1 kHz at 8 kHz sample rate: 4 samples high, 4 samples low
        let buffer: Vec<f32> = (0..8).map(|_| osc.next_sample(1_000.0, 8_000.0)).collect();
        assert_eq!(buffer, vec![1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = Oscillator::new(waveform);
            for _ in 0..4_096 {
                let sample = osc.next_sample(523.25, 44_100.0);
                assert!((-1.0..=1.0).contains(&sample), "{waveform:?} produced {sample}");
            }
        }
    }

    #[test]
    fn detune_ratio_matches_semitones() {
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
        assert!((cents_to_ratio(0.0) - 1.0).abs() < 1e-6);
        assert!(cents_to_ratio(-10.0) < 1.0);
    }
}
