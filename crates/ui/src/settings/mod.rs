pub mod state;

pub use state::{ReplySettings, Settings, SettingsError, VoiceSettings, theme_mode};
