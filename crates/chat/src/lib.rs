#![deny(unsafe_code)]

//! Chat session model for Moped.
//!
//! Holds the thread collection, the staged input and the presentation flags, and
//! implements the send flow with its delayed canned bot reply. Nothing here knows
//! about the GUI toolkit; the app crate drives these types from its views.

pub mod error;
pub mod exchange;
pub mod input;
pub mod message;
pub mod scheduler;
pub mod session;
pub mod view;

pub use error::{ChatError, ChatResult};
pub use exchange::{DEFAULT_BOT_REPLY, DEFAULT_REPLY_DELAY, PendingReply, ReplyPolicy, send};
pub use input::StagedInput;
pub use message::{Message, Sender, Thread, ThreadId, thread_title};
pub use scheduler::{ReplyReceiver, ReplyScheduler, ReplyWorker, reply_channel};
pub use session::Session;
pub use view::{Appearance, ChatState, ViewState};
