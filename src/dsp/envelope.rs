#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Breakpoint Envelopes
====================

Drum envelopes are not gated. Nobody holds a kick drum down, so there is no
sustain and no note-off: the whole shape is known the moment the hit is
scheduled. We describe it as a list of breakpoints on an absolute clock
(seconds in the engine's clock domain) and evaluate it at whatever sample
is being rendered.

Vocabulary
----------

  breakpoint  A (time, value) pair plus the kind of ramp used to ARRIVE at it
              from the previous breakpoint.

  step        The value jumps at the breakpoint time. Used to pin the start
              level of a segment (`set_value_at`).

  linear      Straight line from the previous breakpoint.

  exponential Constant-ratio curve from the previous breakpoint:

                  v(t) = v0 · (v1 / v0) ^ ((t - t0) / (t1 - t0))

              Percussive decays sound natural this way because each equal
              slice of time removes the same number of decibels. The curve is
              undefined through zero, so decays target a small positive floor
              (0.001 ≈ -60 dB) rather than 0.0.

The Shape of a Typical Hit
--------------------------

  Level
    v ┐╲
      │ ╲
      │  ╲__
      │     ╲____
  0.001└──────────╲___ → time
      t         t + decay

    set_value_at(v, t)
    exponential_ramp_to(0.001, t + decay)

Evaluation Rules
----------------

  - Before the first breakpoint: the initial value.
  - Between two breakpoints: the ramp kind of the later one.
  - After the last breakpoint: the last value is held.
  - Exponential between values of opposite sign or touching zero cannot be
    evaluated; the earlier value is held instead of producing NaN.

The same type drives pitch. The kick's body sweep is an envelope whose
values are frequencies in Hz.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Step,
    Linear,
    Exponential,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub time: f64,
    pub value: f32,
    pub ramp: Ramp,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    initial: f32,
    points: Vec<Breakpoint>,
}

impl Envelope {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            points: Vec::with_capacity(4),
        }
    }

    /// A constant value for all time.
    pub fn constant(value: f32) -> Self {
        Self::new(value)
    }

    pub fn set_value_at(self, value: f32, time: f64) -> Self {
        self.with_point(value, time, Ramp::Step)
    }

    pub fn linear_ramp_to(self, value: f32, time: f64) -> Self {
        self.with_point(value, time, Ramp::Linear)
    }

    pub fn exponential_ramp_to(self, value: f32, time: f64) -> Self {
        self.with_point(value, time, Ramp::Exponential)
    }

    fn with_point(mut self, value: f32, time: f64, ramp: Ramp) -> Self {
        // Equal times keep insertion order
        let index = self.points.partition_point(|p| p.time <= time);
        self.points.insert(index, Breakpoint { time, value, ramp });
        self
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Time of the last breakpoint, after which the value never changes.
    pub fn end_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time)
    }

    /// Value of the first breakpoint, or the initial value if there is none.
    pub fn start_value(&self) -> f32 {
        self.points.first().map_or(self.initial, |p| p.value)
    }

    /// Largest absolute value any breakpoint reaches.
    pub fn peak(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.value.abs())
            .fold(self.initial.abs(), f32::max)
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let next_index = self.points.partition_point(|p| p.time <= time);

        if next_index == 0 {
            return self.initial;
        }
        let prev = self.points[next_index - 1];
        let Some(next) = self.points.get(next_index) else {
            return prev.value;
        };

        let span = next.time - prev.time;
        if span <= 0.0 {
            return prev.value;
        }
        let progress = ((time - prev.time) / span) as f32;

        match next.ramp {
            Ramp::Step => prev.value,
            Ramp::Linear => prev.value + (next.value - prev.value) * progress,
            Ramp::Exponential => {
                if prev.value == 0.0 || next.value == 0.0 || prev.value.signum() != next.value.signum() {
                    prev.value
                } else {
                    prev.value * (next.value / prev.value).powf(progress)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn holds_initial_before_first_point() {
        let env = Envelope::new(0.0).set_value_at(1.0, 0.5);
        assert_eq!(env.value_at(0.0), 0.0);
        assert_eq!(env.value_at(0.49), 0.0);
        assert_eq!(env.value_at(0.5), 1.0);
    }

    #[test]
    fn linear_ramp_interpolates() {
        let env = Envelope::new(0.0)
            .set_value_at(0.0, 1.0)
            .linear_ramp_to(0.8, 1.005);
        assert!(close(env.value_at(1.0025), 0.4));
        assert!(close(env.value_at(1.005), 0.8));
        assert!(close(env.value_at(2.0), 0.8), "last value should be held");
    }

    #[test]
    fn exponential_ramp_is_geometric() {
        let env = Envelope::new(0.0)
            .set_value_at(1.0, 0.0)
            .exponential_ramp_to(0.01, 1.0);
        // halfway through a 1 -> 0.01 ramp is the geometric mean, 0.1
        assert!(close(env.value_at(0.5), 0.1));
        assert!(close(env.value_at(1.0), 0.01));
    }

    #[test]
    fn pitch_sweep_hits_both_ends() {
        let env = Envelope::new(210.0)
            .set_value_at(210.0, 0.0)
            .exponential_ramp_to(45.0, 0.08);
        assert!(close(env.value_at(0.0), 210.0));
        assert!(close(env.value_at(0.08), 45.0));
        let mid = env.value_at(0.04);
        assert!(mid < 210.0 && mid > 45.0);
    }

    #[test]
    fn exponential_through_zero_holds_previous() {
        let env = Envelope::new(0.0)
            .set_value_at(0.0, 0.0)
            .exponential_ramp_to(1.0, 1.0);
        assert_eq!(env.value_at(0.5), 0.0);
    }

    #[test]
    fn points_are_kept_in_time_order() {
        let env = Envelope::new(0.0)
            .exponential_ramp_to(0.001, 0.25)
            .set_value_at(0.5, 0.0)
            .exponential_ramp_to(0.05, 0.08);
        let times: Vec<f64> = env.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 0.08, 0.25]);
        assert_eq!(env.end_time(), Some(0.25));
        assert!(close(env.peak(), 0.5));
    }
}
