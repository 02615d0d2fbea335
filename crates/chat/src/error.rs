use snafu::Snafu;

use crate::message::ThreadId;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("thread index {index} is out of range for {len} thread(s)"))]
    ThreadIndexOutOfRange {
        stage: &'static str,
        index: usize,
        len: usize,
    },
    #[snafu(display("thread {thread_id} was not found on `{stage}`"))]
    ThreadNotFound {
        stage: &'static str,
        thread_id: ThreadId,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
