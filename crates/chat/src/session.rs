use std::collections::HashMap;

use snafu::{OptionExt, ensure};

use crate::error::{ChatResult, ThreadIndexOutOfRangeSnafu, ThreadNotFoundSnafu};
use crate::message::{Message, Thread, ThreadId};

/// Ordered collection of chat threads plus the active thread index.
///
/// A session always holds at least one thread and `active` always points at one
/// of them. Threads are only ever appended, never removed or reordered.
#[derive(Debug, Clone)]
pub struct Session {
    threads: Vec<Thread>,
    active: usize,
    next_thread_id: u64,
    pending_replies: HashMap<ThreadId, usize>,
}

impl Session {
    /// Creates a session with one empty, active thread.
    pub fn new() -> Self {
        let mut session = Self {
            threads: Vec::new(),
            active: 0,
            next_thread_id: 1,
            pending_replies: HashMap::new(),
        };
        session.new_thread();
        session
    }

    /// Appends an empty thread and makes it active.
    pub fn new_thread(&mut self) -> ThreadId {
        let id = ThreadId::new(self.next_thread_id);
        self.next_thread_id = self.next_thread_id.saturating_add(1);
        self.threads.push(Thread::new(id));
        self.active = self.threads.len() - 1;

        tracing::debug!(thread_id = %id, position = self.active, "created chat thread");
        id
    }

    /// Moves the active index to `index`.
    ///
    /// Indices come from enumerating existing threads, so an out-of-range value is a
    /// caller bug. It is rejected and leaves the session untouched.
    pub fn select_thread(&mut self, index: usize) -> ChatResult<()> {
        ensure!(
            index < self.threads.len(),
            ThreadIndexOutOfRangeSnafu {
                stage: "select-thread",
                index,
                len: self.threads.len(),
            }
        );

        self.active = index;
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_thread(&self) -> &Thread {
        &self.threads[self.active]
    }

    pub fn active_thread_id(&self) -> ThreadId {
        self.active_thread().id
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// True only if the session holds no threads.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn thread(&self, thread_id: ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|thread| thread.id == thread_id)
    }

    pub fn position_of(&self, thread_id: ThreadId) -> Option<usize> {
        self.threads.iter().position(|thread| thread.id == thread_id)
    }

    /// Appends `message` to the thread identified by `thread_id`.
    pub fn append(&mut self, thread_id: ThreadId, message: Message) -> ChatResult<()> {
        let thread = self
            .threads
            .iter_mut()
            .find(|thread| thread.id == thread_id)
            .context(ThreadNotFoundSnafu {
                stage: "append-message",
                thread_id,
            })?;
        thread.push(message);
        Ok(())
    }

    /// Number of bot replies scheduled for `thread_id` that have not landed yet.
    pub fn pending_replies(&self, thread_id: ThreadId) -> usize {
        self.pending_replies.get(&thread_id).copied().unwrap_or(0)
    }

    pub fn is_awaiting_reply(&self, thread_id: ThreadId) -> bool {
        self.pending_replies(thread_id) > 0
    }

    pub(crate) fn begin_reply(&mut self, thread_id: ThreadId) {
        *self.pending_replies.entry(thread_id).or_insert(0) += 1;
    }

    pub(crate) fn finish_reply(&mut self, thread_id: ThreadId) {
        if let Some(count) = self.pending_replies.get_mut(&thread_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.pending_replies.remove(&thread_id);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;

    #[test]
    fn starts_with_one_empty_active_thread() {
        let session = Session::new();

        assert_eq!(session.len(), 1);
        assert_eq!(session.active_index(), 0);
        assert!(session.active_thread().is_empty());
    }

    #[test]
    fn new_thread_appends_and_activates_without_touching_prior_threads() {
        let mut session = Session::new();
        let first = session.active_thread_id();
        session
            .append(first, Message::user("kept"))
            .expect("first thread exists");

        let second = session.new_thread();

        assert_eq!(session.len(), 2);
        assert_eq!(session.active_index(), 1);
        assert_eq!(session.active_thread_id(), second);
        assert!(session.active_thread().is_empty());
        assert_eq!(
            session.thread(first).map(|thread| thread.messages.clone()),
            Some(vec![Message::user("kept")])
        );
    }

    #[test]
    fn thread_ids_are_unique_and_stable() {
        let mut session = Session::new();
        let a = session.active_thread_id();
        let b = session.new_thread();
        let c = session.new_thread();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(session.position_of(a), Some(0));
        assert_eq!(session.position_of(c), Some(2));
    }

    #[test]
    fn select_thread_only_moves_the_active_index() {
        let mut session = Session::new();
        let first = session.active_thread_id();
        session
            .append(first, Message::user("hello"))
            .expect("first thread exists");
        session.new_thread();
        let before = session.threads().to_vec();

        session.select_thread(0).expect("index 0 is valid");

        assert_eq!(session.active_index(), 0);
        assert_eq!(session.threads(), before.as_slice());
    }

    #[test]
    fn select_thread_rejects_out_of_range_index() {
        let mut session = Session::new();
        session.new_thread();

        let error = session.select_thread(2).expect_err("index 2 is out of range");

        assert!(matches!(
            error,
            ChatError::ThreadIndexOutOfRange { index: 2, len: 2, .. }
        ));
        assert_eq!(session.active_index(), 1);
    }

    #[test]
    fn append_to_unknown_thread_fails() {
        let mut session = Session::new();

        let error = session
            .append(ThreadId::new(99), Message::bot("lost"))
            .expect_err("thread 99 does not exist");

        assert!(matches!(error, ChatError::ThreadNotFound { .. }));
        assert!(session.active_thread().is_empty());
    }
}
