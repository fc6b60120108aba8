use crate::{
    engine::{DrumEngine, EngineError},
    graph::effects::RatUpdate,
    io::midi::MidiEvent,
    voices::{DrumType, DrumVoiceConfig},
};

pub const NOTE_KICK: u8 = 36;
pub const NOTE_SNARE: u8 = 38;
pub const NOTE_CLAP: u8 = 39;
pub const NOTE_CLOSED_HAT: u8 = 42;
pub const NOTE_OPEN_HAT: u8 = 46;

pub const CC_MASTER_VOLUME: u8 = 7;
pub const CC_DISTORTION: u8 = 70;
pub const CC_FILTER: u8 = 71;
pub const CC_RAT_VOLUME: u8 = 72;
pub const CC_KICK_MOD: u8 = 73;

/// An engine call decoded from MIDI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    Trigger { drum: DrumType, velocity: u8 },
    Distortion(RatUpdate),
    MasterVolume(f32),
    KickMod(bool),
}

/// Map a General MIDI drum note to a drum.
pub fn note_to_drum(key: u8) -> Option<DrumType> {
    match key {
        NOTE_KICK => Some(DrumType::Kick),
        NOTE_SNARE => Some(DrumType::Snare),
        NOTE_CLAP => Some(DrumType::Clap),
        NOTE_CLOSED_HAT => Some(DrumType::Hat),
        NOTE_OPEN_HAT => Some(DrumType::OpenHat),
        _ => None,
    }
}

pub fn midi_to_command(midi: MidiEvent, channel_filter: u8) -> Option<EngineCommand> {
    if midi.channel() != channel_filter {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => {
            note_to_drum(key).map(|drum| EngineCommand::Trigger { drum, velocity })
        }
        MidiEvent::ControlChange {
            controller, value, ..
        } => {
            let amount = cc_to_unit(value);
            match controller {
                CC_DISTORTION => Some(EngineCommand::Distortion(RatUpdate::distortion(amount))),
                CC_FILTER => Some(EngineCommand::Distortion(RatUpdate::filter(amount))),
                CC_RAT_VOLUME => Some(EngineCommand::Distortion(RatUpdate::volume(amount))),
                CC_MASTER_VOLUME => Some(EngineCommand::MasterVolume(amount)),
                CC_KICK_MOD => Some(EngineCommand::KickMod(value >= 64)),
                _ => None,
            }
        }
        // Drum hits are one-shots
        _ => None,
    }
}

pub fn cc_to_unit(value: u8) -> f32 {
    value.min(127) as f32 / 127.0
}

impl EngineCommand {
    /// Run the command. Triggers are scheduled at `time` using `voice` for
    /// everything but velocity.
    pub fn apply(
        self,
        engine: &mut DrumEngine,
        time: f64,
        voice: DrumVoiceConfig,
    ) -> Result<(), EngineError> {
        match self {
            EngineCommand::Trigger { drum, velocity } => {
                engine.trigger(drum, time, voice.with_velocity(velocity as f32))
            }
            EngineCommand::Distortion(update) => engine.update_distortion(update),
            EngineCommand::MasterVolume(volume) => engine.set_master_volume(volume),
            EngineCommand::KickMod(enabled) => {
                engine.set_kick_mod_enabled(enabled);
                Ok(())
            }
        }
    }
}
