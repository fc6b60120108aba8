// Purpose - MIDI boundary: raw bytes in, engine calls out

pub mod converter;
pub mod midi;

pub use converter::{midi_to_command, EngineCommand};
pub use midi::MidiEvent;
