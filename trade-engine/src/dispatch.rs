//! Completion mode selection and the deferred worker seam.

use crate::engine::Engine;
use broker_api::OrderId;
use log::warn;
use std::time::Duration;

/// How an order is driven from open to terminal after creation. Selected
/// per call; there is no global toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Complete inline, within the same unit of work as creation.
    Synchronous,
    /// Hand off to a local worker that completes after a fixed delay.
    Deferred,
    /// Enqueue a completion command for an external consumer (two-phase).
    Queued,
}

/// Backend for deferred completion. The default spawner is fire-and-forget
/// with no retry; a stricter at-least-once policy slots in here without
/// touching the engine.
pub trait DeferredCompletion: Send + Sync {
    /// Schedules completion of `order_id`. Must not block the caller.
    fn submit(&self, engine: Engine, order_id: OrderId, two_phase: bool);
}

/// Tokio-backed deferred worker with a fixed submission delay.
pub struct DelayedSpawner {
    delay: Duration,
}

impl DelayedSpawner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl DeferredCompletion for DelayedSpawner {
    fn submit(&self, engine: Engine, order_id: OrderId, two_phase: bool) {
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = engine.complete_order(order_id, two_phase).await {
                // No retry, and the original creation is not rolled back.
                warn!("deferred completion of order {} failed: {}", order_id, e);
            }
        });
    }
}
