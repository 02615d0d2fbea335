use std::process::{Output, Stdio};

use futures::future::BoxFuture;
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use tokio::process::Command;

use crate::capability::{
    Alternative, Microphone, MicrophoneAccess, Transcriber, TranscriptionResult,
};
use crate::error::{
    CommandFailedSnafu, EmptyCommandSnafu, InvalidCommandSnafu, MalformedOutputSnafu,
    SpawnCommandSnafu, VoiceResult,
};

/// Placeholder replaced by the configured locale in command arguments.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// External command parsed from a shell-style string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn parse(raw: &str) -> VoiceResult<Self> {
        let mut words = shell_words::split(raw).context(InvalidCommandSnafu {
            stage: "parse-command",
            command: raw.to_string(),
        })?;
        ensure!(
            !words.is_empty(),
            EmptyCommandSnafu {
                stage: "parse-command"
            }
        );

        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    fn args_for_locale(&self, locale: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(LOCALE_PLACEHOLDER, locale))
            .collect()
    }

    async fn run(&self, args: Vec<String>, stage: &'static str) -> VoiceResult<Output> {
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the capture future (timeout) must not leave the child running.
            .kill_on_drop(true)
            .output()
            .await
            .context(SpawnCommandSnafu {
                stage,
                program: self.program.clone(),
            })
    }
}

/// Probes microphone access by running a short command against the input device.
///
/// A zero exit status grants access, any other status denies it.
#[derive(Debug, Clone)]
pub struct CommandMicrophone {
    command: CommandSpec,
}

impl CommandMicrophone {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl Microphone for CommandMicrophone {
    fn name(&self) -> &str {
        &self.command.program
    }

    fn request_access<'a>(&'a self) -> BoxFuture<'a, VoiceResult<MicrophoneAccess>> {
        Box::pin(async move {
            let output = self
                .command
                .run(self.command.args.clone(), "probe-microphone")
                .await?;

            if output.status.success() {
                return Ok(MicrophoneAccess::Granted);
            }

            tracing::warn!(
                program = %self.command.program,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "microphone probe refused access"
            );
            Ok(MicrophoneAccess::Denied)
        })
    }
}

/// Runs a speech-to-text command and reads candidates from its stdout.
#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    command: CommandSpec,
}

impl CommandTranscriber {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl Transcriber for CommandTranscriber {
    fn name(&self) -> &str {
        &self.command.program
    }

    fn transcribe<'a>(
        &'a self,
        locale: &'a str,
    ) -> BoxFuture<'a, VoiceResult<Vec<TranscriptionResult>>> {
        Box::pin(async move {
            let output = self
                .command
                .run(self.command.args_for_locale(locale), "run-transcriber")
                .await?;

            if !output.status.success() {
                return CommandFailedSnafu {
                    stage: "run-transcriber",
                    program: self.command.program.clone(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                }
                .fail();
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            parse_transcription_output(&stdout).context(MalformedOutputSnafu {
                stage: "parse-transcription",
                program: self.command.program.clone(),
            })
        })
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionOutput {
    results: Vec<TranscriptionResult>,
}

/// Parses transcriber stdout.
///
/// Accepts `{"results":[{"alternatives":[{"transcript":..}]}]}`. Output that is
/// not a JSON object or array is read as plain text where each non-empty line is one
/// alternative, best first. JSON of any other shape is an error.
pub fn parse_transcription_output(
    stdout: &str,
) -> Result<Vec<TranscriptionResult>, serde_json::Error> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(document @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) =
        serde_json::from_str::<serde_json::Value>(trimmed)
    {
        let parsed = serde_json::from_value::<TranscriptionOutput>(document)?;
        return Ok(parsed.results);
    }

    let alternatives = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Alternative::new)
        .collect::<Vec<_>>();

    Ok(vec![TranscriptionResult::new(alternatives)])
}
