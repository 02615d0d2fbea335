use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    v_flex,
};

use crate::chat::events::{DraftChanged, SubmitRequested, VoiceCaptureRequested};

pub const INPUT_PLACEHOLDER: &str = "Ask anything";

pub struct MessageInput {
    input_state: Entity<InputState>,
    is_capturing: bool,
    pending_newline: bool,
}

impl EventEmitter<DraftChanged> for MessageInput {}
impl EventEmitter<SubmitRequested> for MessageInput {}
impl EventEmitter<VoiceCaptureRequested> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(INPUT_PLACEHOLDER)
                .clean_on_escape()
                .auto_grow(1, 8)
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, state, event: &InputEvent, window, cx| match event {
                InputEvent::Change => {
                    let text = state.read(cx).value().to_string();
                    cx.emit(DraftChanged { text });
                }
                InputEvent::PressEnter { secondary } => {
                    if *secondary {
                        this.pending_newline = false;
                        return;
                    }

                    if this.pending_newline {
                        // Shift+Enter already inserted the newline; swallow the enter it also emits.
                        this.pending_newline = false;
                    } else {
                        this.trim_trailing_newline(window, cx);
                        this.submit(cx);
                    }
                }
                _ => {}
            },
        )
        .detach();

        Self {
            input_state,
            is_capturing: false,
            pending_newline: false,
        }
    }

    pub fn text(&self, cx: &App) -> String {
        self.input_state.read(cx).value().to_string()
    }

    /// Disables the microphone button while a capture is in flight.
    pub fn set_capturing(&mut self, capturing: bool, cx: &mut Context<Self>) {
        self.is_capturing = capturing;
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.set_text("", window, cx);
        self.pending_newline = false;
    }

    /// Replaces the visible text without submitting it.
    pub fn set_text(&mut self, text: impl Into<SharedString>, window: &mut Window, cx: &mut Context<Self>) {
        let text = text.into();
        self.input_state.update(cx, |state, cx| {
            state.set_value(text.clone(), window, cx);
        });
        cx.emit(DraftChanged {
            text: text.to_string(),
        });
        cx.notify();
    }

    fn handle_shift_enter(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.pending_newline = true;
        self.input_state.update(cx, |state, cx| {
            state.insert("\n", window, cx);
        });
        cx.notify();
    }

    fn trim_trailing_newline(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            let value = state.value().to_string();
            if let Some(trimmed) = value.strip_suffix('\n') {
                state.set_value(trimmed.to_string(), window, cx);
            }
        });
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        // Blank drafts are filtered by the owner.
        let text = self.text(cx);
        cx.emit(DraftChanged { text });
        cx.emit(SubmitRequested);
    }

    fn request_voice_capture(&mut self, cx: &mut Context<Self>) {
        if self.is_capturing {
            return;
        }
        cx.emit(VoiceCaptureRequested);
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let is_capturing = self.is_capturing;

        let microphone = Button::new("voice-input")
            .small()
            .ghost()
            .child(if is_capturing { "Listening..." } else { "Voice" })
            .loading(is_capturing)
            .disabled(is_capturing)
            .on_click(cx.listener(|this, _, _window, cx| {
                this.request_voice_capture(cx);
            }));

        let send = Button::new("send")
            .small()
            .primary()
            .icon(IconName::ArrowUp)
            .on_click(cx.listener(|this, _, _window, cx| {
                this.submit(cx);
            }));

        v_flex()
            .bg(theme.background)
            .p_3()
            .child(
                h_flex()
                    .w_full()
                    .gap_2()
                    .items_end()
                    .px_3()
                    .py_2()
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.background)
                    .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                        if event.keystroke.key == "enter" && event.keystroke.modifiers.shift {
                            this.handle_shift_enter(window, cx);
                        }
                    }))
                    .child(div().flex_1().min_w_0().child(Input::new(&self.input_state).w_full()))
                    .child(microphone)
                    .child(send),
            )
    }
}
