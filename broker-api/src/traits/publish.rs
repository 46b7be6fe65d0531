use crate::model::events::{MarketEvent, OrderMessage, QuotePriceChange};
use anyhow::Result;
use async_trait::async_trait;

/// Point-to-point broker queue carrying order completion commands to an
/// external consumer.
#[async_trait]
pub trait CompletionQueue: Send + Sync {
    /// Durably enqueues the command. An error here means the command is NOT
    /// on the queue and the caller must compensate.
    async fn enqueue(&self, message: &OrderMessage) -> Result<()>;
}

/// Broadcast boundary for price changes and market events. The core only
/// builds well-formed payloads and hands them off; delivery guarantees
/// belong to the implementation.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish_quote_change(&self, change: &QuotePriceChange) -> Result<()>;
    async fn publish_event(&self, event: &MarketEvent) -> Result<()>;
}
