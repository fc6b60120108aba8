//! Asymmetric diode-clipper waveshaping.
//!
//! The overdrive stage is a static transfer function stored as a lookup
//! table. A pedal of this kind clips with a pair of diodes to ground; when
//! the two halves of the waveform see different diode behaviour the clipping
//! is asymmetric, which adds even harmonics on top of the odd ones a
//! symmetric clipper makes.
//!
//! # The Curve
//!
//! With `k = drive · 50 + 1` and `x` sweeping the input domain [-1, 1]:
//!
//! ```text
//!   x ≥ 0:  y = tanh(1.2 · k · x) · 0.9     forward-biased, hard knee
//!   x < 0:  y = tanh(0.8 · k · x)           reverse-biased, softer knee
//! ```
//!
//! The positive half saturates sooner but tops out at 0.9; the negative half
//! bends more gently toward -1. These coefficients define the sound of the
//! pedal and are not meant to be tuned.
//!
//! # Drive Values
//!
//!   0.0  = k of 1, close to linear for quiet signals
//!   0.2  = k of 11, obvious grit
//!   1.0  = k of 51, nearly square
//!
//! # Lookup
//!
//! Entry `i` holds the curve at `x = 2i / N - 1`, and lookups use the same
//! mapping, so an input of zero lands exactly on the zero entry. Inputs
//! between entries are linearly interpolated; inputs outside the range take
//! the end values, exactly like a fixed transfer curve would.

/// Number of entries in a waveshaper curve.
pub const CURVE_SIZE: usize = 44_100;

/// Drive factor for the curve builder: `drive · 50 + 1`.
#[inline]
pub fn drive_factor(drive: f32) -> f32 {
    drive * 50.0 + 1.0
}

/// Transfer function of the diode clipper at a single input value.
#[inline]
pub fn diode_clip(x: f32, k: f32) -> f32 {
    if x >= 0.0 {
        (x * k * 1.2).tanh() * 0.9
    } else {
        (x * k * 0.8).tanh()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveshaperCurve {
    drive: f32,
    table: Vec<f32>,
}

impl WaveshaperCurve {
    /// Build the asymmetric clipping curve for `drive` in [0, 1].
    pub fn diode(drive: f32) -> Self {
        let drive = if drive.is_nan() { 0.0 } else { drive.clamp(0.0, 1.0) };
        let k = drive_factor(drive);
        let n = CURVE_SIZE as f32;

        let table = (0..CURVE_SIZE)
            .map(|i| {
                let x = 2.0 * i as f32 / n - 1.0;
                diode_clip(x, k)
            })
            .collect();

        Self { drive, table }
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Shape one sample through the curve.
    #[inline]
    pub fn shape(&self, input: f32) -> f32 {
        let last = self.table.len() - 1;
        let position = (input + 1.0) * 0.5 * self.table.len() as f32;

        if position.is_nan() || position <= 0.0 {
            return self.table[0];
        }
        if position >= last as f32 {
            return self.table[last];
        }

        let index = position as usize;
        let frac = position - index as f32;
        let a = self.table[index];
        let b = self.table[index + 1];
        a + (b - a) * frac
    }

    pub fn shape_buffer(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.shape(*sample);
        }
    }
}
