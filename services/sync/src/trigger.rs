//! Drain trigger plumbing.
//!
//! Every reason to drain (startup, connectivity regained, a fresh enqueue,
//! a manual request) funnels into one bounded channel. Requests never
//! block: a full channel means a drain is already queued behind the
//! in-flight one, so dropping the event loses nothing.

use tokio::sync::mpsc;

use crate::domain::types::TriggerEvent;

/// Cloneable sender handed to everything that may want a drain.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: mpsc::Sender<TriggerEvent>,
}

impl TriggerHandle {
    /// Request a drain. Fire-and-forget.
    pub fn request(&self, event: TriggerEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::debug!(trigger = event.as_str(), "trigger queue full, collapsed");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                tracing::warn!(trigger = event.as_str(), "sync scheduler is gone");
            }
        }
    }
}

/// Build the trigger channel. The receiver goes to the scheduler loop.
pub fn channel(depth: usize) -> (TriggerHandle, mpsc::Receiver<TriggerEvent>) {
    let (tx, rx) = mpsc::channel(depth);
    (TriggerHandle { tx }, rx)
}
