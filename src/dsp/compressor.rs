/*
Bus Compressor
==============

A feed-forward compressor with a soft knee. It sits after the overdrive and
glues the whole kit together: loud hits pull the bus down a few dB, then let
go over the release time.

Signal Path
-----------

    input ──┬───────────────────────────────(×)──→ output
            │                                ↑
            └→ |x| → dB → envelope → gain computer

Gain Computer (all in dB)
-------------------------

    over = level - threshold

    over < -knee/2          no reduction
    over >  knee/2          reduction = over · (1 - 1/ratio)
    in between              reduction = (1 - 1/ratio) · (over + knee/2)² / (2 · knee)

The quadratic piece joins the two straight lines without a corner, which is
what "soft knee" means.

Envelope
--------

The detector follows the input level in dB with separate one-pole
coefficients for rising (attack) and falling (release) levels. A 3 ms attack
lets the first click of a kick through before the gain comes down.

Settings are fixed for the drum bus: threshold -12 dB, knee 6 dB, ratio 4:1,
attack 3 ms, release 150 ms.
*/

pub const THRESHOLD_DB: f32 = -12.0;
pub const KNEE_DB: f32 = 6.0;
pub const RATIO: f32 = 4.0;
pub const ATTACK_SECONDS: f32 = 0.003;
pub const RELEASE_SECONDS: f32 = 0.150;

const SILENCE_DB: f32 = -120.0;

#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    knee_db: f32,
    ratio: f32,
    attack_coeff: f32,
    release_coeff: f32,
    envelope_db: f32,
}

impl Compressor {
    /// The drum-bus settings.
    pub fn glue(sample_rate: f32) -> Self {
        Self::new(
            sample_rate,
            THRESHOLD_DB,
            KNEE_DB,
            RATIO,
            ATTACK_SECONDS,
            RELEASE_SECONDS,
        )
    }

    pub fn new(
        sample_rate: f32,
        threshold_db: f32,
        knee_db: f32,
        ratio: f32,
        attack: f32,
        release: f32,
    ) -> Self {
        Self {
            threshold_db,
            knee_db: knee_db.max(0.0),
            ratio: ratio.max(1.0),
            attack_coeff: time_coeff(attack, sample_rate),
            release_coeff: time_coeff(release, sample_rate),
            envelope_db: SILENCE_DB,
        }
    }

    /// Gain reduction in dB (zero or negative) for a detector level in dB.
    pub fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        let half_knee = self.knee_db * 0.5;
        let slope = 1.0 - 1.0 / self.ratio;

        if over <= -half_knee {
            0.0
        } else if over >= half_knee || self.knee_db == 0.0 {
            -over * slope
        } else {
            let x = over + half_knee;
            -slope * x * x / (2.0 * self.knee_db)
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let level_db = linear_to_db(sample.abs());

        let coeff = if level_db > self.envelope_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope_db += coeff * (level_db - self.envelope_db);

        sample * db_to_linear(self.gain_reduction_db(self.envelope_db))
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Current gain reduction applied to the signal, in dB.
    pub fn reduction_db(&self) -> f32 {
        self.gain_reduction_db(self.envelope_db)
    }

    pub fn reset(&mut self) {
        self.envelope_db = SILENCE_DB;
    }
}

fn time_coeff(seconds: f32, sample_rate: f32) -> f32 {
    let samples = seconds * sample_rate;
    if samples > 0.0 {
        1.0 - (-1.0 / samples).exp()
    } else {
        1.0
    }
}

#[inline]
pub fn linear_to_db(amplitude: f32) -> f32 {
    if amplitude <= 1e-6 {
        SILENCE_DB
    } else {
        20.0 * amplitude.log10()
    }
}

#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}
