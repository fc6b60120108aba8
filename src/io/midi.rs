/// Channel voice messages the drum engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Decode one complete channel message.
    ///
    /// Running status, system messages, channel messages a drum machine has
    /// no use for and truncated input yield `None`.
    /// A note-on with velocity zero is reported as a note-off, as the MIDI
    /// standard requires.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 || status >= 0xF0 {
            return None;
        }
        let channel = status & 0x0F;
        let data_byte = |index: usize| data.get(index).copied().filter(|b| *b < 0x80);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data_byte(0)?,
                velocity: data_byte(1)?,
            }),
            0x90 => {
                let key = data_byte(0)?;
                let velocity = data_byte(1)?;
                Some(if velocity == 0 {
                    MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity: 0,
                    }
                } else {
                    MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    }
                })
            }
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data_byte(0)?,
                value: data_byte(1)?,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_on() {
        assert_eq!(
            MidiEvent::parse(&[0x99, 36, 100]),
            Some(MidiEvent::NoteOn {
                channel: 9,
                key: 36,
                velocity: 100
            })
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        assert_eq!(
            MidiEvent::parse(&[0x90, 38, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 38,
                velocity: 0
            })
        );
    }

    #[test]
    fn parses_control_change() {
        assert_eq!(
            MidiEvent::parse(&[0xB3, 70, 127]),
            Some(MidiEvent::ControlChange {
                channel: 3,
                controller: 70,
                value: 127
            })
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(MidiEvent::parse(&[]), None);
        assert_eq!(MidiEvent::parse(&[36, 100]), None, "running status");
        assert_eq!(MidiEvent::parse(&[0x90, 36]), None, "truncated");
        assert_eq!(MidiEvent::parse(&[0x90, 36, 0x80]), None, "bad data byte");
        assert_eq!(MidiEvent::parse(&[0xF8]), None, "clock");
        assert_eq!(MidiEvent::parse(&[0xE0, 0x00, 0x40]), None, "pitch bend");
        assert_eq!(MidiEvent::parse(&[0xC0, 5]), None, "program change");
    }
}
