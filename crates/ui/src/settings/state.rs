use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use gpui_component::ThemeMode;
use moped_chat::{Appearance, DEFAULT_BOT_REPLY, DEFAULT_REPLY_DELAY, ReplyPolicy, ViewState};
use moped_voice::{
    CaptureConfig, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_LOCALE, SpeechCapture, VoiceResult,
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "moped";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "MOPED_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySettings {
    #[serde(default = "default_reply_text")]
    pub text: String,
    #[serde(default = "default_reply_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            text: default_reply_text(),
            delay_ms: default_reply_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_voice_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub microphone_command: Option<String>,
    #[serde(default)]
    pub transcriber_command: Option<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            timeout_ms: default_voice_timeout_ms(),
            microphone_command: None,
            transcriber_command: None,
        }
    }
}

/// Startup configuration. Read once; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default = "default_sidebar_visible")]
    pub sidebar_visible: bool,
    #[serde(default)]
    pub reply: ReplySettings,
    #[serde(default)]
    pub voice: VoiceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appearance: Appearance::default(),
            sidebar_visible: default_sidebar_visible(),
            reply: ReplySettings::default(),
            voice: VoiceSettings::default(),
        }
    }
}

impl Settings {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".moped"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Loads settings from the default path, falling back to defaults on error.
    pub fn load() -> Self {
        let path = Self::default_config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!("failed to load settings from {:?}: {}. using defaults", path, error);
                Self::default()
            }
        }
    }

    /// Layers defaults, the JSON file at `path` and `MOPED_*` environment variables.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        let settings = Self::figment(path)
            .extract::<Settings>()
            .context(ExtractSnafu {
                stage: "extract-settings",
                path: path.to_path_buf(),
            })?;

        Ok(settings.normalized())
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn normalized(mut self) -> Self {
        self.reply.text = if self.reply.text.trim().is_empty() {
            default_reply_text()
        } else {
            self.reply.text.trim().to_string()
        };

        self.voice.locale = if self.voice.locale.trim().is_empty() {
            default_locale()
        } else {
            self.voice.locale.trim().to_string()
        };
        if self.voice.timeout_ms == 0 {
            self.voice.timeout_ms = default_voice_timeout_ms();
        }
        self.voice.microphone_command = normalize_command(self.voice.microphone_command);
        self.voice.transcriber_command = normalize_command(self.voice.transcriber_command);

        self
    }

    pub fn reply_policy(&self) -> ReplyPolicy {
        ReplyPolicy::new(
            self.reply.text.clone(),
            Duration::from_millis(self.reply.delay_ms),
        )
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            locale: self.voice.locale.clone(),
            timeout: Duration::from_millis(self.voice.timeout_ms),
        }
    }

    pub fn speech_capture(&self) -> VoiceResult<SpeechCapture> {
        SpeechCapture::from_commands(
            self.voice.microphone_command.as_deref(),
            self.voice.transcriber_command.as_deref(),
            self.capture_config(),
        )
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::new(self.sidebar_visible, self.appearance)
    }
}

/// Maps the chat appearance onto the component library theme mode.
pub fn theme_mode(appearance: Appearance) -> ThemeMode {
    if appearance.is_dark() {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to read settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}

fn normalize_command(command: Option<String>) -> Option<String> {
    command
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_reply_text() -> String {
    DEFAULT_BOT_REPLY.to_string()
}

fn default_reply_delay_ms() -> u64 {
    DEFAULT_REPLY_DELAY.as_millis() as u64
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_voice_timeout_ms() -> u64 {
    DEFAULT_CAPTURE_TIMEOUT.as_millis() as u64
}

fn default_sidebar_visible() -> bool {
    true
}
