use serde::{Deserialize, Serialize};

use crate::input::StagedInput;
use crate::session::Session;

/// Color scheme of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Presentation-only flags. Nothing here is linked to chat data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub sidebar_visible: bool,
    pub appearance: Appearance,
}

impl ViewState {
    pub fn new(sidebar_visible: bool, appearance: Appearance) -> Self {
        Self {
            sidebar_visible,
            appearance,
        }
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_visible = !self.sidebar_visible;
        self.sidebar_visible
    }

    pub fn toggle_appearance(&mut self) -> Appearance {
        self.appearance = self.appearance.toggled();
        self.appearance
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(true, Appearance::Light)
    }
}

/// Single owner of all mutable chat UI state.
///
/// The view layer holds one of these and hands references to subcomponents
/// instead of each component keeping its own copy.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub session: Session,
    pub input: StagedInput,
    pub view: ViewState,
}

impl ChatState {
    pub fn new(view: ViewState) -> Self {
        Self {
            session: Session::new(),
            input: StagedInput::new(),
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_are_independent_of_session() {
        let mut state = ChatState::new(ViewState::default());
        state.session.new_thread();
        let threads_before = state.session.threads().to_vec();

        assert!(!state.view.toggle_sidebar());
        assert_eq!(state.view.toggle_appearance(), Appearance::Dark);
        assert!(state.view.toggle_sidebar());
        assert_eq!(state.view.toggle_appearance(), Appearance::Light);

        assert_eq!(state.session.threads(), threads_before.as_slice());
        assert_eq!(state.session.active_index(), 1);
    }
}
