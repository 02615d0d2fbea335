use futures::future::BoxFuture;
use serde::Deserialize;

use crate::error::{CapabilityUnavailableSnafu, VoiceResult};

/// Outcome of a microphone permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrophoneAccess {
    Granted,
    Denied,
}

/// One candidate transcription.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Alternative {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: None,
        }
    }
}

/// One recognition result; alternatives are ordered best first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

impl TranscriptionResult {
    pub fn new(alternatives: Vec<Alternative>) -> Self {
        Self { alternatives }
    }
}

/// Grants or refuses microphone access.
///
/// Implementations release the device as soon as the answer is known; the probe
/// is never used to record audio.
pub trait Microphone: Send + Sync {
    fn name(&self) -> &str;
    fn request_access<'a>(&'a self) -> BoxFuture<'a, VoiceResult<MicrophoneAccess>>;
}

/// Produces transcription results for one utterance in `locale`.
pub trait Transcriber: Send + Sync {
    fn name(&self) -> &str;
    fn transcribe<'a>(&'a self, locale: &'a str)
    -> BoxFuture<'a, VoiceResult<Vec<TranscriptionResult>>>;
}

/// Microphone used when no probe command is configured; access is assumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnprobedMicrophone;

impl Microphone for UnprobedMicrophone {
    fn name(&self) -> &str {
        "unprobed"
    }

    fn request_access<'a>(&'a self) -> BoxFuture<'a, VoiceResult<MicrophoneAccess>> {
        Box::pin(async { Ok(MicrophoneAccess::Granted) })
    }
}

/// Transcriber used when speech-to-text is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredTranscriber;

impl Transcriber for UnconfiguredTranscriber {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn transcribe<'a>(
        &'a self,
        _locale: &'a str,
    ) -> BoxFuture<'a, VoiceResult<Vec<TranscriptionResult>>> {
        Box::pin(async {
            CapabilityUnavailableSnafu {
                stage: "transcribe",
                capability: "speech transcription",
            }
            .fail()
        })
    }
}
