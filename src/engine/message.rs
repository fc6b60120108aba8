use crate::{
    dsp::distortion::WaveshaperCurve,
    graph::{effects::ChainUpdate, voice::VoiceNode},
};

/// Control thread → render thread.
///
/// Every payload is fully built before it is pushed; the renderer only
/// moves it into place.
pub enum EngineMessage {
    Voice(Box<VoiceNode>),
    Distortion(ChainUpdate),
    MasterVolume(f32),
}

impl std::fmt::Debug for EngineMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMessage::Voice(voice) => f
                .debug_struct("Voice")
                .field("label", &voice.label())
                .field("start_frame", &voice.start_frame())
                .finish(),
            EngineMessage::Distortion(update) => f.debug_tuple("Distortion").field(&update.config).finish(),
            EngineMessage::MasterVolume(volume) => f.debug_tuple("MasterVolume").field(volume).finish(),
        }
    }
}

/// Render thread → control thread: payloads the renderer is done with.
/// They are dropped on the control side so the audio thread never frees.
pub enum Reclaimed {
    Voice(Box<VoiceNode>),
    Curve(Box<WaveshaperCurve>),
}
