use std::time::Duration;

use crate::error::ChatResult;
use crate::input::StagedInput;
use crate::message::{Message, ThreadId};
use crate::session::Session;

pub const DEFAULT_BOT_REPLY: &str = "This is a bot response.";
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Canned bot reply emitted after every user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPolicy {
    pub text: String,
    pub delay: Duration,
}

impl ReplyPolicy {
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
        }
    }
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_REPLY, DEFAULT_REPLY_DELAY)
    }
}

/// Bot reply scheduled at send time.
///
/// The target thread is captured when the user sends, so the reply lands in that
/// thread even if another one is active by the time the delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub thread: ThreadId,
    pub text: String,
    pub delay: Duration,
}

impl PendingReply {
    /// Appends the bot message to the captured thread.
    pub fn deliver(self, session: &mut Session) -> ChatResult<()> {
        session.finish_reply(self.thread);
        session.append(self.thread, Message::bot(self.text))?;
        tracing::debug!(thread_id = %self.thread, "delivered bot reply");
        Ok(())
    }
}

/// Sends the staged input as a user message in the active thread.
///
/// Returns `None` without touching any state when the staged text is blank.
/// Otherwise the user message is appended immediately, the staged input is
/// cleared, and the returned reply must be scheduled by the caller.
pub fn send(
    session: &mut Session,
    input: &mut StagedInput,
    policy: &ReplyPolicy,
) -> Option<PendingReply> {
    if input.is_blank() {
        return None;
    }

    let thread = session.active_thread_id();
    let text = input.text().to_string();
    // The active thread always exists, so this append cannot miss.
    if let Err(error) = session.append(thread, Message::user(text)) {
        tracing::error!(thread_id = %thread, error = %error, "failed to append user message");
        return None;
    }
    input.clear();
    session.begin_reply(thread);

    tracing::debug!(
        thread_id = %thread,
        delay_ms = policy.delay.as_millis() as u64,
        "scheduled bot reply"
    );

    Some(PendingReply {
        thread,
        text: policy.text.clone(),
        delay: policy.delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    fn staged(text: &str) -> StagedInput {
        let mut input = StagedInput::new();
        input.set(text);
        input
    }

    #[test]
    fn blank_sends_are_ignored() {
        let mut session = Session::new();
        let policy = ReplyPolicy::default();

        for text in ["", "   ", "\n\t"] {
            let mut input = staged(text);
            assert!(send(&mut session, &mut input, &policy).is_none());
            assert_eq!(input.text(), text);
        }

        assert!(session.active_thread().is_empty());
        assert!(!session.is_awaiting_reply(session.active_thread_id()));
    }

    #[test]
    fn send_appends_user_message_and_clears_input() {
        let mut session = Session::new();
        let mut input = staged("hi");

        let pending = send(&mut session, &mut input, &ReplyPolicy::default())
            .expect("non-blank input produces a reply");

        assert_eq!(session.active_thread().messages, vec![Message::user("hi")]);
        assert_eq!(input.text(), "");
        assert_eq!(pending.thread, session.active_thread_id());
        assert_eq!(pending.text, DEFAULT_BOT_REPLY);
        assert_eq!(pending.delay, Duration::from_millis(1000));
        assert!(session.is_awaiting_reply(pending.thread));
    }

    #[test]
    fn user_text_is_kept_as_typed() {
        let mut session = Session::new();
        let mut input = staged("  padded  ");

        send(&mut session, &mut input, &ReplyPolicy::default()).expect("not blank");

        assert_eq!(session.active_thread().messages[0].text, "  padded  ");
    }

    #[test]
    fn reply_lands_in_thread_captured_at_send_time() {
        let mut session = Session::new();
        let thread_a = session.active_thread_id();
        let mut input = staged("question");
        let pending =
            send(&mut session, &mut input, &ReplyPolicy::default()).expect("not blank");

        let thread_b = session.new_thread();
        pending.deliver(&mut session).expect("thread A still exists");

        let a = session.thread(thread_a).expect("thread A exists");
        let b = session.thread(thread_b).expect("thread B exists");
        assert_eq!(a.len(), 2);
        assert_eq!(a.messages[1].sender, Sender::Bot);
        assert!(b.is_empty());
        assert!(!session.is_awaiting_reply(thread_a));
    }

    #[test]
    fn overlapping_sends_track_each_pending_reply() {
        let mut session = Session::new();
        let thread = session.active_thread_id();
        let policy = ReplyPolicy::new("ok", Duration::from_millis(5));

        let first = send(&mut session, &mut staged("one"), &policy).expect("not blank");
        let second = send(&mut session, &mut staged("two"), &policy).expect("not blank");
        assert_eq!(session.pending_replies(thread), 2);

        first.deliver(&mut session).expect("thread exists");
        assert_eq!(session.pending_replies(thread), 1);
        second.deliver(&mut session).expect("thread exists");
        assert_eq!(session.pending_replies(thread), 0);

        let texts = session
            .active_thread()
            .messages
            .iter()
            .map(|message| message.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["one", "two", "ok", "ok"]);
    }
}
