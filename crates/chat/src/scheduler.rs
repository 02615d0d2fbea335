use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::exchange::PendingReply;

/// Detached timer future that forwards one reply when its delay elapses.
pub type ReplyWorker = BoxFuture<'static, ()>;

/// Creates a connected scheduler/receiver pair.
pub fn reply_channel() -> (ReplyScheduler, ReplyReceiver) {
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();
    (ReplyScheduler { reply_tx }, ReplyReceiver { reply_rx })
}

/// Turns pending replies into timer workers.
///
/// Workers are independent: there is no throttle and no cancellation, so every
/// scheduled reply is eventually forwarded as long as the receiver is alive.
#[derive(Debug, Clone)]
pub struct ReplyScheduler {
    reply_tx: mpsc::UnboundedSender<PendingReply>,
}

impl ReplyScheduler {
    /// Builds the worker for `pending`. It must be spawned on a tokio runtime.
    pub fn schedule(&self, pending: PendingReply) -> ReplyWorker {
        let reply_tx = self.reply_tx.clone();
        // The delay counts from the send, not from when the runtime first polls the worker.
        let deadline = tokio::time::Instant::now() + pending.delay;

        Box::pin(async move {
            tokio::time::sleep_until(deadline).await;

            let thread_id = pending.thread;
            if reply_tx.send(pending).is_err() {
                tracing::warn!(thread_id = %thread_id, "reply receiver closed before delivery");
            }
        })
    }
}

/// Foreground end of the reply channel.
#[derive(Debug)]
pub struct ReplyReceiver {
    reply_rx: mpsc::UnboundedReceiver<PendingReply>,
}

impl ReplyReceiver {
    pub async fn recv(&mut self) -> Option<PendingReply> {
        self.reply_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PendingReply> {
        self.reply_rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::message::ThreadId;

    fn pending(thread: u64, text: &str, delay_ms: u64) -> PendingReply {
        PendingReply {
            thread: ThreadId::new(thread),
            text: text.to_string(),
            delay: Duration::from_millis(delay_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn worker_forwards_only_after_delay() {
        let (scheduler, mut receiver) = reply_channel();
        let start = tokio::time::Instant::now();
        tokio::spawn(scheduler.schedule(pending(1, "late", 1000)));

        tokio::time::advance(Duration::from_millis(999)).await;
        tokio::task::yield_now().await;
        assert!(receiver.try_recv().is_none());

        let reply = receiver.recv().await;
        assert_eq!(reply, Some(pending(1, "late", 1000)));
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn equal_delays_deliver_in_schedule_order() {
        let (scheduler, mut receiver) = reply_channel();

        tokio::spawn(scheduler.schedule(pending(1, "first", 1000)));
        tokio::time::advance(Duration::from_millis(10)).await;
        tokio::spawn(scheduler.schedule(pending(2, "second", 1000)));

        let first = receiver.recv().await.expect("first reply");
        let second = receiver.recv().await.expect("second reply");

        assert_eq!(first.text, "first");
        assert_eq!(second.text, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_does_not_panic_worker() {
        let (scheduler, receiver) = reply_channel();
        drop(receiver);

        let worker = tokio::spawn(scheduler.schedule(pending(1, "orphan", 5)));

        assert!(worker.await.is_ok());
    }
}
