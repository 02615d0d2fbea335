use std::sync::Arc;
use std::time::Duration;

use snafu::{OptionExt, ResultExt};

use crate::capability::{
    Microphone, MicrophoneAccess, Transcriber, TranscriptionResult, UnconfiguredTranscriber,
    UnprobedMicrophone,
};
use crate::command::{CommandMicrophone, CommandSpec, CommandTranscriber};
use crate::error::{NoTranscriptSnafu, PermissionDeniedSnafu, TimeoutSnafu, VoiceResult};

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub locale: String,
    pub timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }
}

/// One-shot voice input: microphone permission, then a single transcription.
#[derive(Clone)]
pub struct SpeechCapture {
    microphone: Arc<dyn Microphone>,
    transcriber: Arc<dyn Transcriber>,
    config: CaptureConfig,
}

impl SpeechCapture {
    pub fn new(
        microphone: Arc<dyn Microphone>,
        transcriber: Arc<dyn Transcriber>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            microphone,
            transcriber,
            config,
        }
    }

    /// Builds a capture from optional shell-style commands.
    ///
    /// A missing microphone command skips the permission probe; a missing
    /// transcriber command makes every capture fail as unavailable.
    pub fn from_commands(
        microphone_command: Option<&str>,
        transcriber_command: Option<&str>,
        config: CaptureConfig,
    ) -> VoiceResult<Self> {
        let microphone: Arc<dyn Microphone> = match microphone_command {
            Some(raw) => Arc::new(CommandMicrophone::new(CommandSpec::parse(raw)?)),
            None => Arc::new(UnprobedMicrophone),
        };
        let transcriber: Arc<dyn Transcriber> = match transcriber_command {
            Some(raw) => Arc::new(CommandTranscriber::new(CommandSpec::parse(raw)?)),
            None => Arc::new(UnconfiguredTranscriber),
        };

        Ok(Self::new(microphone, transcriber, config))
    }

    /// Returns the top candidate of the first transcription result.
    ///
    /// Both the permission request and the transcription share one timeout, so a
    /// capability that never answers cannot hang the caller.
    pub async fn capture(&self) -> VoiceResult<String> {
        let timeout = self.config.timeout;

        tracing::debug!(
            microphone = %self.microphone.name(),
            transcriber = %self.transcriber.name(),
            locale = %self.config.locale,
            timeout_ms = timeout.as_millis() as u64,
            "starting speech capture"
        );

        let results = tokio::time::timeout(timeout, self.capture_results())
            .await
            .context(TimeoutSnafu {
                stage: "capture-speech",
                timeout_ms: timeout.as_millis() as u64,
            })??;

        top_candidate(&results).context(NoTranscriptSnafu {
            stage: "select-top-candidate",
        })
    }

    async fn capture_results(&self) -> VoiceResult<Vec<TranscriptionResult>> {
        match self.microphone.request_access().await? {
            MicrophoneAccess::Granted => {}
            MicrophoneAccess::Denied => {
                return PermissionDeniedSnafu {
                    stage: "request-microphone",
                    microphone: self.microphone.name().to_string(),
                }
                .fail();
            }
        }

        self.transcriber.transcribe(&self.config.locale).await
    }
}

/// Top alternative of the first result, if it carries any text.
pub fn top_candidate(results: &[TranscriptionResult]) -> Option<String> {
    let transcript = &results.first()?.alternatives.first()?.transcript;
    if transcript.trim().is_empty() {
        None
    } else {
        Some(transcript.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::future::BoxFuture;

    use super::*;
    use crate::capability::Alternative;
    use crate::error::VoiceError;

    struct FakeMicrophone(MicrophoneAccess);

    impl Microphone for FakeMicrophone {
        fn name(&self) -> &str {
            "fake-mic"
        }

        fn request_access<'a>(&'a self) -> BoxFuture<'a, VoiceResult<MicrophoneAccess>> {
            let access = self.0;
            Box::pin(async move { Ok(access) })
        }
    }

    #[derive(Default)]
    struct FakeTranscriber {
        results: Vec<TranscriptionResult>,
        hang: bool,
        seen_locales: Mutex<Vec<String>>,
    }

    impl Transcriber for FakeTranscriber {
        fn name(&self) -> &str {
            "fake-stt"
        }

        fn transcribe<'a>(
            &'a self,
            locale: &'a str,
        ) -> BoxFuture<'a, VoiceResult<Vec<TranscriptionResult>>> {
            Box::pin(async move {
                if let Ok(mut seen) = self.seen_locales.lock() {
                    seen.push(locale.to_string());
                }
                if self.hang {
                    futures::future::pending::<()>().await;
                }
                Ok(self.results.clone())
            })
        }
    }

    fn capture_with(access: MicrophoneAccess, transcriber: Arc<FakeTranscriber>) -> SpeechCapture {
        SpeechCapture::new(
            Arc::new(FakeMicrophone(access)),
            transcriber,
            CaptureConfig::default(),
        )
    }

    fn results(candidates: &[&[&str]]) -> Vec<TranscriptionResult> {
        candidates
            .iter()
            .map(|alternatives| {
                TranscriptionResult::new(
                    alternatives.iter().copied().map(Alternative::new).collect(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn takes_top_candidate_of_first_result() {
        let transcriber = Arc::new(FakeTranscriber {
            results: results(&[&["open the door", "open the floor"], &["ignored"]]),
            ..Default::default()
        });
        let capture = capture_with(MicrophoneAccess::Granted, transcriber.clone());

        let transcript = capture.capture().await.expect("capture succeeds");

        assert_eq!(transcript, "open the door");
        let seen = transcriber.seen_locales.lock().expect("lock").clone();
        assert_eq!(seen, vec![DEFAULT_LOCALE.to_string()]);
    }

    #[tokio::test]
    async fn candidate_text_is_kept_as_transcribed() {
        let transcriber = Arc::new(FakeTranscriber {
            results: results(&[&["  Hello world "]]),
            ..Default::default()
        });
        let capture = capture_with(MicrophoneAccess::Granted, transcriber);

        let transcript = capture.capture().await.expect("capture succeeds");

        assert_eq!(transcript, "  Hello world ");
    }

    #[tokio::test]
    async fn denied_microphone_skips_transcription() {
        let transcriber = Arc::new(FakeTranscriber::default());
        let capture = capture_with(MicrophoneAccess::Denied, transcriber.clone());

        let error = capture.capture().await.expect_err("access denied");

        assert!(matches!(error, VoiceError::PermissionDenied { .. }));
        assert_eq!(
            error.user_notice(),
            "Please allow microphone access to use voice input."
        );
        assert!(transcriber.seen_locales.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn empty_results_are_reported() {
        for empty in [results(&[]), results(&[&[]]), results(&[&["   "]])] {
            let capture = capture_with(
                MicrophoneAccess::Granted,
                Arc::new(FakeTranscriber {
                    results: empty,
                    ..Default::default()
                }),
            );

            let error = capture.capture().await.expect_err("nothing to use");
            assert!(matches!(error, VoiceError::NoTranscript { .. }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn silent_transcriber_times_out() {
        let capture = capture_with(
            MicrophoneAccess::Granted,
            Arc::new(FakeTranscriber {
                hang: true,
                ..Default::default()
            }),
        );

        let error = capture.capture().await.expect_err("transcriber never answers");

        assert!(matches!(
            error,
            VoiceError::Timeout {
                timeout_ms: 10_000,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_transcriber_process_is_killed() {
        let marker = std::env::temp_dir().join(format!("moped-capture-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);
        let raw = format!("sh -c 'sleep 1 && touch \"{}\"'", marker.display());
        let config = CaptureConfig {
            locale: DEFAULT_LOCALE.to_string(),
            timeout: Duration::from_millis(200),
        };
        let capture =
            SpeechCapture::from_commands(None, Some(&raw), config).expect("valid command");

        let error = capture.capture().await.expect_err("transcriber is too slow");
        assert!(matches!(error, VoiceError::Timeout { timeout_ms: 200, .. }));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "transcriber kept running after the timeout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn json_error_from_transcriber_is_not_staged() {
        let capture = SpeechCapture::from_commands(
            None,
            Some(r#"echo '{"error":"no speech"}'"#),
            CaptureConfig::default(),
        )
        .expect("valid command");

        let error = capture.capture().await.expect_err("malformed output");

        assert!(matches!(error, VoiceError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn missing_transcriber_command_is_unavailable() {
        let capture = SpeechCapture::from_commands(None, None, CaptureConfig::default())
            .expect("no commands to parse");

        let error = capture.capture().await.expect_err("not configured");

        assert!(matches!(error, VoiceError::CapabilityUnavailable { .. }));
        assert!(error.user_notice().starts_with("Voice input failed"));
    }
}
