#![deny(unsafe_code)]

//! Voice input capabilities: microphone permission probe, transcription, and
//! the one-shot capture that ties them together under a timeout.

pub mod capability;
pub mod capture;
pub mod command;
pub mod error;

pub use capability::{
    Alternative, Microphone, MicrophoneAccess, Transcriber, TranscriptionResult,
    UnconfiguredTranscriber, UnprobedMicrophone,
};
pub use capture::{
    CaptureConfig, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_LOCALE, SpeechCapture, top_candidate,
};
pub use command::{
    CommandMicrophone, CommandSpec, CommandTranscriber, LOCALE_PLACEHOLDER,
    parse_transcription_output,
};
pub use error::{MICROPHONE_DENIED_NOTICE, VoiceError, VoiceResult};
