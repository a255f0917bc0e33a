//! Shutdown coordination between the server and its background tasks.

use tokio::sync::broadcast;

/// Broadcast handle every long-running task subscribes to.
///
/// Triggering with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(notified, "Shutdown triggered");
    }

    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
