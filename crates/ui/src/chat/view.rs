use gpui::*;
use gpui_component::{ActiveTheme, Theme, v_flex};
use gpui_tokio_bridge::Tokio;
use moped_chat::{
    ChatState, PendingReply, ReplyPolicy, ReplyReceiver, ReplyScheduler, reply_channel, send,
};
use moped_voice::SpeechCapture;

use crate::chat::events::{
    DraftChanged, NewThreadRequested, SubmitRequested, ThreadSelected, VoiceCaptureFailed,
    VoiceCaptureRequested,
};
use crate::chat::sidebar::sidebar_rows;
use crate::chat::{ChatSidebar, MessageInput, MessageList};
use crate::settings::{Settings, theme_mode};

/// Parent coordinator for sidebar, message list, input and the reply/voice workers.
///
/// All chat state lives in one `ChatState`; the child views only render copies
/// pushed to them after each mutation.
pub struct ChatView {
    state: ChatState,
    reply_policy: ReplyPolicy,
    reply_scheduler: ReplyScheduler,
    speech_capture: Result<SpeechCapture, String>,
    sidebar: Entity<ChatSidebar>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    reply_reader_task: Option<Task<()>>,
    speech_task: Option<Task<()>>,
}

impl EventEmitter<VoiceCaptureFailed> for ChatView {}

impl ChatView {
    pub fn new(settings: &Settings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let sidebar = cx.new(ChatSidebar::new);
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));
        let (reply_scheduler, reply_receiver) = reply_channel();

        let speech_capture = settings.speech_capture().map_err(|error| {
            tracing::warn!("voice input unavailable: {}", error);
            error.user_notice()
        });

        let mut this = Self {
            state: ChatState::new(settings.view_state()),
            reply_policy: settings.reply_policy(),
            reply_scheduler,
            speech_capture,
            sidebar: sidebar.clone(),
            message_list: message_list.clone(),
            message_input: message_input.clone(),
            reply_reader_task: None,
            speech_task: None,
        };

        cx.subscribe(&sidebar, |this, _, event: &ThreadSelected, cx| {
            this.select_thread(event.index, cx);
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, _event: &NewThreadRequested, cx| {
            this.new_thread(cx);
        })
        .detach();

        cx.subscribe(&message_input, |this, _, event: &DraftChanged, _cx| {
            this.state.input.set(event.text.clone());
        })
        .detach();

        cx.subscribe_in(
            &message_input,
            window,
            |this, _, _event: &SubmitRequested, window, cx| {
                this.submit(window, cx);
            },
        )
        .detach();

        cx.subscribe_in(
            &message_input,
            window,
            |this, _, _event: &VoiceCaptureRequested, window, cx| {
                this.start_voice_capture(window, cx);
            },
        )
        .detach();

        this.spawn_reply_reader(reply_receiver, cx);
        this.sync_children(cx);
        this
    }

    pub fn sidebar(&self) -> &Entity<ChatSidebar> {
        &self.sidebar
    }

    pub fn is_sidebar_visible(&self) -> bool {
        self.state.view.sidebar_visible
    }

    pub fn new_thread(&mut self, cx: &mut Context<Self>) {
        let thread_id = self.state.session.new_thread();
        tracing::debug!(thread_id = %thread_id, "created thread");

        self.message_list.update(cx, |list, cx| list.reset_scroll_tracking(cx));
        self.sync_children(cx);
    }

    pub fn select_thread(&mut self, index: usize, cx: &mut Context<Self>) {
        if index == self.state.session.active_index() {
            return;
        }

        if let Err(error) = self.state.session.select_thread(index) {
            tracing::error!("ignoring thread selection: {}", error);
            return;
        }

        self.message_list.update(cx, |list, cx| list.reset_scroll_tracking(cx));
        self.sync_children(cx);
    }

    pub fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        let visible = self.state.view.toggle_sidebar();
        tracing::debug!(visible, "toggled sidebar");
        cx.notify();
    }

    pub fn toggle_appearance(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let appearance = self.state.view.toggle_appearance();
        Theme::change(theme_mode(appearance), Some(window), cx);
        tracing::debug!(?appearance, "toggled appearance");
        cx.notify();
    }

    fn submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(pending) = send(
            &mut self.state.session,
            &mut self.state.input,
            &self.reply_policy,
        ) else {
            return;
        };

        self.message_input
            .update(cx, |input, cx| input.clear(window, cx));
        self.spawn_reply_worker(pending, cx);
        self.sync_children(cx);
    }

    fn spawn_reply_worker(&mut self, pending: PendingReply, cx: &mut Context<Self>) {
        // Reply workers are fire-and-forget; overlapping sends each get their own timer.
        let worker = self.reply_scheduler.schedule(pending);
        Tokio::spawn(cx, worker).detach();
    }

    fn spawn_reply_reader(&mut self, mut receiver: ReplyReceiver, cx: &mut Context<Self>) {
        self.reply_reader_task = Some(cx.spawn(async move |this, cx| {
            while let Some(pending) = receiver.recv().await {
                let delivered = this.update(cx, |this, cx| {
                    this.deliver_reply(pending, cx);
                });
                if delivered.is_err() {
                    break;
                }
            }
        }));
    }

    fn deliver_reply(&mut self, pending: PendingReply, cx: &mut Context<Self>) {
        let thread_id = pending.thread;
        if let Err(error) = pending.deliver(&mut self.state.session) {
            tracing::error!(thread_id = %thread_id, "failed to deliver reply: {}", error);
            return;
        }

        self.sync_children(cx);
    }

    fn start_voice_capture(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.speech_task.is_some() {
            return;
        }

        let capture = match &self.speech_capture {
            Ok(capture) => capture.clone(),
            Err(notice) => {
                cx.emit(VoiceCaptureFailed {
                    notice: notice.clone(),
                });
                return;
            }
        };

        self.message_input
            .update(cx, |input, cx| input.set_capturing(true, cx));

        let capture_task = Tokio::spawn(cx, async move { capture.capture().await });
        self.speech_task = Some(cx.spawn_in(window, async move |this, cx| {
            let outcome = match capture_task.await {
                Ok(result) => result.map_err(|error| {
                    tracing::warn!("speech capture failed: {}", error);
                    error.user_notice()
                }),
                Err(error) => {
                    tracing::error!("speech capture task failed: {}", error);
                    Err(format!("Voice input failed: {error}"))
                }
            };

            let _ = this.update_in(cx, |this, window, cx| {
                this.finish_voice_capture(outcome, window, cx);
            });
        }));
    }

    fn finish_voice_capture(
        &mut self,
        outcome: Result<String, String>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.speech_task = None;
        self.message_input
            .update(cx, |input, cx| input.set_capturing(false, cx));

        match outcome {
            Ok(transcript) => {
                tracing::debug!(chars = transcript.len(), "staged voice transcript");
                self.state.input.replace_with_transcript(transcript.clone());
                self.message_input
                    .update(cx, |input, cx| input.set_text(transcript, window, cx));
            }
            Err(notice) => cx.emit(VoiceCaptureFailed { notice }),
        }
    }

    /// Pushes the current session snapshot into the child views.
    fn sync_children(&mut self, cx: &mut Context<Self>) {
        let session = &self.state.session;
        let active_index = session.active_index();
        let rows = sidebar_rows(session);
        let messages = session.active_thread().messages.clone();
        let awaiting_reply = session.is_awaiting_reply(session.active_thread_id());

        self.sidebar
            .update(cx, |sidebar, cx| sidebar.set_threads(rows, active_index, cx));
        self.message_list.update(cx, |list, cx| {
            list.set_messages(messages, awaiting_reply, cx);
        });
        cx.notify();
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            )
    }
}
