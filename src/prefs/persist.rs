//! Fire-and-forget preference writer.
//!
//! One background tokio task drains a FIFO queue and applies each write to the
//! store. Callers never wait unless they want to: `persist` hands back a
//! [`WriteTicket`] that may be awaited or dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::StoreError;
use crate::storage::KeyValueStore;

/// Work item for the writer task.
enum Job {
    /// Store `value` under `key`, then report the outcome.
    Write {
        /// Storage key.
        key: &'static str,
        /// Complete value to store.
        value: String,
        /// Outcome channel; the receiver may already be gone.
        done: oneshot::Sender<Result<(), StoreError>>,
    },
    /// Signal once every earlier job has been processed.
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Cloning shares the same queue.
///
/// The task exits once every handle is dropped and the queue is drained.
#[derive(Clone, Debug)]
pub struct Persister {
    /// Queue feeding the writer task.
    tx: mpsc::UnboundedSender<Job>,
}

impl Persister {
    /// What: Start the writer task over `store`.
    ///
    /// Output:
    /// - Handle used to enqueue writes.
    ///
    /// Details:
    /// - Must be called from within a tokio runtime.
    /// - Writes are applied strictly in enqueue order, so the last write to a
    ///   key is the one that lands.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::Write { key, value, done } => {
                        let result = store.set(key, &value).await;
                        match &result {
                            Ok(()) => tracing::debug!(key, value = %value, "preference persisted"),
                            Err(e) => tracing::warn!(
                                key,
                                value = %value,
                                error = %e,
                                "failed to persist preference; keeping in-memory value"
                            ),
                        }
                        let _ = done.send(result);
                    }
                    Job::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            tracing::debug!("preference writer stopped");
        });
        Self { tx }
    }

    /// What: Enqueue a write of `value` under `key`.
    ///
    /// Output:
    /// - Ticket resolving to the write outcome. Dropping it is fine.
    ///
    /// Details:
    /// - Never blocks and never fails synchronously; if the writer is gone the
    ///   ticket resolves to `StoreError::Closed`.
    pub fn persist(&self, key: &'static str, value: impl Into<String>) -> WriteTicket {
        let (done, rx) = oneshot::channel();
        let job = Job::Write {
            key,
            value: value.into(),
            done,
        };
        if self.tx.send(job).is_err() {
            tracing::warn!(key, "preference writer is closed; write dropped");
        }
        WriteTicket { rx }
    }

    /// What: Wait until every write enqueued before this call has finished.
    ///
    /// Output:
    /// - `true` when the writer acknowledged; `false` if it is gone.
    pub async fn flush(&self) -> bool {
        let (ack, rx) = oneshot::channel();
        if self.tx.send(Job::Flush(ack)).is_err() {
            return false;
        }
        rx.await.is_ok()
    }
}

/// Completion handle for one enqueued write.
#[derive(Debug)]
pub struct WriteTicket {
    /// Receives the outcome from the writer task.
    rx: oneshot::Receiver<Result<(), StoreError>>,
}

impl WriteTicket {
    /// What: Wait for the write to finish.
    ///
    /// # Errors
    /// - The store's error when the write failed.
    /// - `StoreError::Closed` when the writer stopped before handling it.
    pub async fn wait(self) -> Result<(), StoreError> {
        self.rx.await.unwrap_or(Err(StoreError::Closed))
    }
}
