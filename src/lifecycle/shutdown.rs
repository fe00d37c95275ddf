//! Shutdown coordination.
//!
//! Two long-running tasks listen for shutdown: the HTTP server, which stops
//! accepting and drains in-flight webhooks, and the SIGHUP reloader, which
//! stops waiting for reload signals. `main` triggers the broadcast once
//! SIGINT or SIGTERM arrives.

use tokio::sync::broadcast;

/// One-shot broadcast to the server and the reloader.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a task that must stop on shutdown. Subscribe before
    /// triggering; later subscribers miss the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber and return how many were notified.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(tasks = notified, "Shutdown broadcast sent");
        notified
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
