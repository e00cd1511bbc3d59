//! Pub/sub channel carrying flow-context updates to subscribers (UI,
//! side panels, tests).
//!
//! A thin wrapper over `tokio::sync::broadcast`. Publishing is lossy by
//! design: an engine with no subscribers, or a subscriber that has fallen
//! behind the buffer, must never block or fail a transition.

use tokio::sync::broadcast;

use crate::context::FlowContext;

#[derive(Debug, Clone)]
pub struct ContextBus {
    tx: broadcast::Sender<FlowContext>,
}

impl ContextBus {
    /// A bus buffering up to `capacity` contexts per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Broadcast `ctx` to every subscriber. No subscribers is fine.
    pub fn publish(&self, ctx: FlowContext) {
        let _ = self.tx.send(ctx);
    }

    /// Subscribe to context updates. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FlowContext> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ContextBus {
    fn default() -> Self {
        Self::new(32)
    }
}
