/// Text typed or transcribed but not yet sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedInput {
    text: String,
}

impl StagedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the staged text on every keystroke.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Overwrites the staged text with a speech transcript.
    pub fn replace_with_transcript(&mut self, transcript: impl Into<String>) {
        self.text = transcript.into();
    }

    /// True when the staged text has nothing to send.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
