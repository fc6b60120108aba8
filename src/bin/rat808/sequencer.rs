//! Sequencer - lookahead pattern playback
//!
//! The sequencer runs on the main thread and never touches audio. Every
//! tick it looks at the engine clock and schedules each step that falls
//! inside the lookahead window with its exact start time, so timing does
//! not depend on how late the tick itself wakes up.

use rat808::{DrumEngine, DrumType, DrumVoiceConfig, EngineError};

pub const STEPS: usize = 16;

/// One row of the step grid.
pub struct Track {
    pub drum: DrumType,
    pub steps: [bool; STEPS],
    pub voice: DrumVoiceConfig,
}

impl Track {
    /// Build a track from a 16 character grid, `x` for a hit.
    pub fn new(drum: DrumType, grid: &str, voice: DrumVoiceConfig) -> Self {
        let mut steps = [false; STEPS];
        for (step, cell) in steps.iter_mut().zip(grid.chars()) {
            *step = cell == 'x';
        }
        Self { drum, steps, voice }
    }
}

/// The demo beat.
pub fn four_on_the_floor() -> Vec<Track> {
    let voice = |volume, tune| DrumVoiceConfig {
        volume,
        tune,
        ..DrumVoiceConfig::default()
    };

    vec![
        Track::new(DrumType::Kick, "x...x...x...x...", voice(1.0, 0.5)),
        Track::new(DrumType::Snare, "....x.......x...", voice(0.8, 0.4)),
        Track::new(DrumType::Clap, "............x...", voice(0.6, 0.5)),
        Track::new(DrumType::Hat, "..x...x...x...x.", voice(0.5, 0.6)),
        Track::new(DrumType::OpenHat, "..............x.", voice(0.4, 0.6)),
    ]
}

pub struct Sequencer {
    tracks: Vec<Track>,
    /// Tempo in beats per minute
    bpm: f64,
    /// Next step to schedule
    step: usize,
    /// Engine time of that step, in seconds
    next_step_time: f64,
}

impl Sequencer {
    pub fn new(tracks: Vec<Track>, bpm: f64, start_time: f64) -> Self {
        Self {
            tracks,
            bpm: bpm.clamp(20.0, 300.0),
            step: 0,
            next_step_time: start_time,
        }
    }

    /// Sixteenth-note length in seconds.
    pub fn step_duration(&self) -> f64 {
        60.0 / self.bpm / 4.0
    }

    /// Schedule every step starting before `current_time + lookahead`.
    /// Returns the number of hits scheduled.
    pub fn schedule(&mut self, engine: &mut DrumEngine, lookahead: f64) -> Result<usize, EngineError> {
        let horizon = engine.current_time() + lookahead;
        let mut scheduled = 0;

        while self.next_step_time < horizon {
            for track in self.tracks.iter().filter(|t| t.steps[self.step]) {
                engine.trigger(track.drum, self.next_step_time, track.voice)?;
                scheduled += 1;
            }

            self.step = (self.step + 1) % STEPS;
            self.next_step_time += self.step_duration();
        }

        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rat808::EngineConfig;

    #[test]
    fn grid_parses_hits() {
        let track = Track::new(DrumType::Kick, "x...x...", DrumVoiceConfig::default());
        assert!(track.steps[0] && track.steps[4]);
        assert_eq!(track.steps.iter().filter(|&&s| s).count(), 2);
    }

    #[test]
    fn schedules_only_inside_the_window() {
        let (mut engine, _renderer) = DrumEngine::new(EngineConfig::default().with_seed(1));
        let mut sequencer = Sequencer::new(four_on_the_floor(), 120.0, 0.0);
        assert_eq!(sequencer.step_duration(), 0.125);

        // steps 0 (kick) and 1 (nothing) start before 0.2 s
        assert_eq!(sequencer.schedule(&mut engine, 0.2), Ok(1));
        // nothing new until the clock moves
        assert_eq!(sequencer.schedule(&mut engine, 0.2), Ok(0));
        // steps 2 and 3 fall before 0.5 s: one closed hat
        assert_eq!(sequencer.schedule(&mut engine, 0.5), Ok(1));
    }
}
