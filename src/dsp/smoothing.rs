//! One-pole parameter smoothing.
//!
//! Gains and cutoffs on the shared effects chain are never stepped. A new
//! value becomes a target, and the live value approaches it exponentially:
//!
//! ```text
//! current += (target - current) · coeff
//! coeff    = 1 - e^(-1 / (time_constant · sample_rate))
//! ```
//!
//! After one time constant the remaining distance has shrunk to 1/e (≈37%),
//! after five it is below 1%. With the default 50 ms constant a drive change
//! settles in roughly a quarter second and never produces a step.

#[derive(Debug, Clone)]
pub struct SmoothedParam {
    // f64 state: at 48 kHz the per-sample step is ~2e-5 of the distance,
    // which f32 stops resolving long before the value settles
    current: f64,
    target: f64,
    coeff: f64,
}

impl SmoothedParam {
    pub fn new(value: f32, time_constant: f32, sample_rate: f32) -> Self {
        Self {
            current: value as f64,
            target: value as f64,
            coeff: smoothing_coeff(time_constant, sample_rate),
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target as f64;
    }

    /// Jump straight to `value`. Only for initialisation, never for live updates.
    pub fn reset(&mut self, value: f32) {
        self.current = value as f64;
        self.target = value as f64;
    }

    pub fn target(&self) -> f32 {
        self.target as f32
    }

    pub fn current(&self) -> f32 {
        self.current as f32
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.coeff;
        self.snap();
        self.current as f32
    }

    /// Advance `frames` samples at once and return the resulting value.
    pub fn advance(&mut self, frames: usize) -> f32 {
        if !self.is_settled() {
            let remaining = (1.0 - self.coeff).powi(frames as i32);
            self.current = self.target + (self.current - self.target) * remaining;
            self.snap();
        }
        self.current as f32
    }

    #[inline]
    fn snap(&mut self) {
        let tolerance = f32::EPSILON as f64 * self.target.abs().max(1.0);
        if (self.target - self.current).abs() <= tolerance {
            self.current = self.target;
        }
    }
}

fn smoothing_coeff(time_constant: f32, sample_rate: f32) -> f64 {
    let samples = time_constant as f64 * sample_rate as f64;
    if samples.is_finite() && samples > 0.0 {
        1.0 - (-1.0 / samples).exp()
    } else {
        1.0
    }
}
