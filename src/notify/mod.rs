//! Notification delivery seam
//!
//! The core produces formatted text addressed to a destination; the
//! transport that actually delivers it (websocket, SSE, ...) lives outside
//! this crate and drains a queue. Delivery is fire-and-forget: failures are
//! logged, never surfaced to the caller, and never retried.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::Destination;

/// A formatted notification addressed to one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub dest: Destination,
    pub text: String,
}

/// Delivery seam between the core and the client transport
///
/// Within one destination, messages must be delivered in the order the
/// calls are made; no ordering is guaranteed across destinations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, dest: &Destination, text: &str);
}

/// Notifier that forwards onto an mpsc queue for the transport to drain
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end for the transport
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, dest: &Destination, text: &str) {
        debug!(%dest, %text, "ChannelNotifier::send");
        let notification = Notification {
            dest: dest.clone(),
            text: text.to_string(),
        };
        if self.tx.send(notification).await.is_err() {
            warn!(%dest, "notification dropped: transport queue closed");
        }
    }
}

#[cfg(test)]
pub(crate) struct RecordingNotifier {
    sent: tokio::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, dest: &Destination, text: &str) {
        self.sent.lock().await.push(Notification {
            dest: dest.clone(),
            text: text.to_string(),
        });
    }
}
