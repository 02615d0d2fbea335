use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    list::ListItem,
    v_flex,
};
use moped_chat::{Session, thread_title};

use crate::chat::events::{NewThreadRequested, ThreadSelected};

const THREAD_ROW_HEIGHT: f32 = 40.0;

/// Render data for one sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub title: String,
    pub awaiting_reply: bool,
}

/// Builds one row per thread in session order.
pub fn sidebar_rows(session: &Session) -> Vec<SidebarRow> {
    session
        .threads()
        .iter()
        .enumerate()
        .map(|(position, thread)| SidebarRow {
            title: thread_title(position),
            awaiting_reply: session.is_awaiting_reply(thread.id),
        })
        .collect()
}

pub struct ChatSidebar {
    rows: Vec<SidebarRow>,
    active_index: usize,
    scroll_handle: ScrollHandle,
}

impl EventEmitter<ThreadSelected> for ChatSidebar {}
impl EventEmitter<NewThreadRequested> for ChatSidebar {}

impl ChatSidebar {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            rows: Vec::new(),
            active_index: 0,
            scroll_handle: ScrollHandle::new(),
        }
    }

    pub fn set_threads(&mut self, rows: Vec<SidebarRow>, active_index: usize, cx: &mut Context<Self>) {
        let grew = rows.len() > self.rows.len();
        self.rows = rows;
        self.active_index = active_index;

        if grew {
            // New threads are appended, so keep the freshly created row in view.
            self.scroll_handle.scroll_to_item(self.active_index);
        }
        cx.notify();
    }

    fn render_header(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .items_center()
            .justify_between()
            .px_3()
            .pt(px(12.))
            .pb_2()
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child("Chats"),
            )
            .child(
                Button::new("sidebar-new-chat")
                    .ghost()
                    .small()
                    .icon(IconName::Plus)
                    .on_click(cx.listener(|_, _, _, cx| {
                        cx.emit(NewThreadRequested);
                    })),
            )
    }

    fn render_thread_list(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let active_index = self.active_index;

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let theme = cx.theme();
                let title = row.title.clone();
                let awaiting_reply = row.awaiting_reply;

                div()
                    .w_full()
                    .h(px(THREAD_ROW_HEIGHT))
                    .px_2()
                    .child(
                        ListItem::new(("thread", index))
                            .w_full()
                            .h_full()
                            .px_3()
                            .py_2()
                            .rounded_md()
                            .selected(index == active_index)
                            .on_click(cx.listener(move |_, _event: &ClickEvent, _window, cx| {
                                cx.emit(ThreadSelected { index });
                            }))
                            .child(
                                h_flex()
                                    .w_full()
                                    .items_center()
                                    .gap_2()
                                    .child(
                                        div()
                                            .flex_1()
                                            .min_w_0()
                                            .truncate()
                                            .child(Label::new(title).text_sm()),
                                    )
                                    .when(awaiting_reply, |row| {
                                        row.child(
                                            div().size(px(6.)).rounded_full().bg(theme.primary),
                                        )
                                    }),
                            ),
                    )
                    .into_any_element()
            })
            .collect::<Vec<_>>();

        div()
            .id("thread-list")
            .flex_1()
            .min_h_0()
            .overflow_y_scroll()
            .track_scroll(&self.scroll_handle)
            .child(v_flex().w_full().children(rows))
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .min_w_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(self.render_header(cx))
            .child(self.render_thread_list(cx))
    }
}

#[cfg(test)]
mod tests {
    use moped_chat::{ReplyPolicy, StagedInput, send};

    use super::*;

    #[test]
    fn rows_follow_thread_positions_and_pending_replies() {
        let mut session = Session::new();
        let mut input = StagedInput::new();
        input.set("hi");
        send(&mut session, &mut input, &ReplyPolicy::default()).expect("not blank");
        session.new_thread();

        let rows = sidebar_rows(&session);

        assert_eq!(rows, vec![
            SidebarRow {
                title: "Chat 1".to_string(),
                awaiting_reply: true,
            },
            SidebarRow {
                title: "Chat 2".to_string(),
                awaiting_reply: false,
            },
        ]);
    }
}
