use gpui::*;
use gpui_component::{ActiveTheme, h_flex, label::Label, v_flex};
use moped_chat::{Message, Sender};

use crate::chat::scroll_manager::ScrollManager;

pub const EMPTY_THREAD_PLACEHOLDER: &str = "What can I help with?";

const BUBBLE_MAX_WIDTH: Pixels = px(320.);
const BUBBLE_PADDING_X: Pixels = px(16.);
const BUBBLE_PADDING_Y: Pixels = px(8.);

pub struct MessageList {
    messages: Vec<Message>,
    awaiting_reply: bool,
    scroll_manager: ScrollManager,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            awaiting_reply: false,
            scroll_manager: ScrollManager::new(),
        }
    }

    /// Replaces the rendered messages; any growth scrolls the list to its end.
    pub fn set_messages(
        &mut self,
        messages: Vec<Message>,
        awaiting_reply: bool,
        cx: &mut Context<Self>,
    ) {
        let grew = messages.len() > self.messages.len() || awaiting_reply != self.awaiting_reply;

        self.messages = messages;
        self.awaiting_reply = awaiting_reply;

        if grew {
            self.scroll_manager.request_scroll_to_end();
        }

        cx.notify();
    }

    /// Called when another thread becomes active.
    pub fn reset_scroll_tracking(&mut self, cx: &mut Context<Self>) {
        self.scroll_manager.request_scroll_to_end();
        cx.notify();
    }

    fn render_message_row(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        // Empty text still renders a bubble of normal height.
        let content = if message.text.is_empty() {
            " ".to_string()
        } else {
            message.text.clone()
        };

        match message.sender {
            Sender::User => v_flex()
                .w_full()
                .items_end()
                .child(
                    div()
                        .max_w(BUBBLE_MAX_WIDTH)
                        .px(BUBBLE_PADDING_X)
                        .py(BUBBLE_PADDING_Y)
                        .rounded_lg()
                        .shadow_md()
                        .bg(theme.accent)
                        .text_color(theme.accent_foreground)
                        .child(Label::new(content).text_sm()),
                )
                .into_any_element(),
            Sender::Bot => v_flex()
                .w_full()
                .items_start()
                .child(
                    div()
                        .max_w(BUBBLE_MAX_WIDTH)
                        .px(BUBBLE_PADDING_X)
                        .py(BUBBLE_PADDING_Y)
                        .rounded_lg()
                        .shadow_md()
                        .bg(theme.muted)
                        .text_color(theme.foreground)
                        .child(Label::new(content).text_sm()),
                )
                .into_any_element(),
        }
    }

    fn render_waiting_indicator(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .gap_2()
            .items_center()
            .child(div().size(px(8.)).rounded_full().bg(theme.primary))
            .child(
                Label::new("Waiting for response...")
                    .text_xs()
                    .text_color(theme.foreground.opacity(0.65)),
            )
            .into_any_element()
    }

    fn render_placeholder(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .id("message-list-empty")
            .size_full()
            .items_center()
            .justify_center()
            .child(
                div()
                    .text_2xl()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child(EMPTY_THREAD_PLACEHOLDER),
            )
            .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.messages.is_empty() && !self.awaiting_reply {
            return self.render_placeholder(cx);
        }

        let mut rows = self
            .messages
            .iter()
            .map(|message| self.render_message_row(message, cx))
            .collect::<Vec<_>>();
        if self.awaiting_reply {
            rows.push(self.render_waiting_indicator(cx));
        }
        // End marker keeps "scroll to last child" landing below the newest row.
        rows.push(div().id("message-list-end").h(px(1.)).into_any_element());

        self.scroll_manager.apply_pending_scroll(rows.len());

        div()
            .id("message-list")
            .size_full()
            .min_h_0()
            .overflow_y_scroll()
            .track_scroll(self.scroll_manager.handle())
            .flex()
            .flex_col()
            .px_4()
            .py_3()
            .gap_4()
            .children(rows)
            .into_any_element()
    }
}
