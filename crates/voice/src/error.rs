use snafu::Snafu;

/// Notice shown when the microphone probe refuses access.
pub const MICROPHONE_DENIED_NOTICE: &str = "Please allow microphone access to use voice input.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VoiceError {
    #[snafu(display("microphone access was denied by '{microphone}'"))]
    PermissionDenied {
        stage: &'static str,
        microphone: String,
    },
    #[snafu(display("{capability} is not configured"))]
    CapabilityUnavailable {
        stage: &'static str,
        capability: &'static str,
    },
    #[snafu(display("command is empty on `{stage}`"))]
    EmptyCommand { stage: &'static str },
    #[snafu(display("failed to parse command '{command}' on `{stage}`: {source}"))]
    InvalidCommand {
        stage: &'static str,
        command: String,
        source: shell_words::ParseError,
    },
    #[snafu(display("failed to run '{program}' on `{stage}`: {source}"))]
    SpawnCommand {
        stage: &'static str,
        program: String,
        source: std::io::Error,
    },
    #[snafu(display("'{program}' exited with {status} on `{stage}`: {stderr}"))]
    CommandFailed {
        stage: &'static str,
        program: String,
        status: String,
        stderr: String,
    },
    #[snafu(display("'{program}' printed JSON that is not a transcription on `{stage}`: {source}"))]
    MalformedOutput {
        stage: &'static str,
        program: String,
        source: serde_json::Error,
    },
    #[snafu(display("speech capture timed out after {timeout_ms}ms"))]
    Timeout {
        stage: &'static str,
        timeout_ms: u64,
        source: tokio::time::error::Elapsed,
    },
    #[snafu(display("transcription produced no candidate"))]
    NoTranscript { stage: &'static str },
}

impl VoiceError {
    /// Text for the user-visible failure notice.
    pub fn user_notice(&self) -> String {
        match self {
            Self::PermissionDenied { .. } => MICROPHONE_DENIED_NOTICE.to_string(),
            other => format!("Voice input failed: {other}"),
        }
    }
}

pub type VoiceResult<T> = Result<T, VoiceError>;
