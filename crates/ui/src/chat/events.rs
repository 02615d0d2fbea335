/// Emitted when a sidebar row is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadSelected {
    pub index: usize,
}

/// Emitted when the user asks for a fresh chat thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NewThreadRequested;

/// Emitted on every edit of the input box with its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChanged {
    pub text: String,
}

/// Emitted when the user presses Enter or the send button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitRequested;

/// Emitted when the microphone button is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceCaptureRequested;

/// Emitted when voice input fails; `notice` is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCaptureFailed {
    pub notice: String,
}
