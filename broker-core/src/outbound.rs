//! Queue and topic adapters binding the typed sockets to the `broker-api`
//! publish seams.
//!
//! The memory constructors return the receiving half alongside the adapter
//! so in-process consumers (and tests) can drain what the engine emits.

use crate::comms::socket::{ReceiverSocket, SenderSocket};
use crate::comms::transports::memory::memory_pair;
use anyhow::Result;
use async_trait::async_trait;
use broker_api::{CompletionQueue, MarketEvent, NotificationPublisher, OrderMessage, QuotePriceChange};

/// Sends order completion commands to the external broker queue.
pub struct QueueSender {
    socket: SenderSocket<OrderMessage>,
}

impl QueueSender {
    pub fn new(socket: SenderSocket<OrderMessage>) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl CompletionQueue for QueueSender {
    async fn enqueue(&self, message: &OrderMessage) -> Result<()> {
        self.socket.send(message).await
    }
}

/// Broadcasts price changes and market events on two typed channels, the
/// way the streamer topic is split from the broker queue.
pub struct TopicPublisher {
    quotes: SenderSocket<QuotePriceChange>,
    events: SenderSocket<MarketEvent>,
}

impl TopicPublisher {
    pub fn new(quotes: SenderSocket<QuotePriceChange>, events: SenderSocket<MarketEvent>) -> Self {
        Self { quotes, events }
    }
}

#[async_trait]
impl NotificationPublisher for TopicPublisher {
    async fn publish_quote_change(&self, change: &QuotePriceChange) -> Result<()> {
        self.quotes.send(change).await
    }

    async fn publish_event(&self, event: &MarketEvent) -> Result<()> {
        self.events.send(event).await
    }
}

/// Creates an in-process completion queue plus its consumer endpoint.
pub fn memory_queue(capacity: usize) -> (QueueSender, ReceiverSocket<OrderMessage>) {
    let (output, input) = memory_pair(capacity);
    (
        QueueSender::new(SenderSocket::new(Box::new(output))),
        ReceiverSocket::new(Box::new(input)),
    )
}

/// Creates an in-process notification topic plus its subscriber endpoints.
pub fn memory_topic(
    capacity: usize,
) -> (
    TopicPublisher,
    ReceiverSocket<QuotePriceChange>,
    ReceiverSocket<MarketEvent>,
) {
    let (quote_out, quote_in) = memory_pair(capacity);
    let (event_out, event_in) = memory_pair(capacity);
    (
        TopicPublisher::new(
            SenderSocket::new(Box::new(quote_out)),
            SenderSocket::new(Box::new(event_out)),
        ),
        ReceiverSocket::new(Box::new(quote_in)),
        ReceiverSocket::new(Box::new(event_in)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_api::{OrderId, Quote};

    #[tokio::test]
    async fn test_memory_queue_round_trip() -> Result<()> {
        let (queue, mut consumer) = memory_queue(16);

        let message = OrderMessage::new_order(OrderId::new(5), true, 1_700_000_000_000);
        queue.enqueue(&message).await?;

        let received = consumer.recv().await?;
        assert_eq!(received, message);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_topic_round_trip() -> Result<()> {
        let (topic, mut quotes, mut events) = memory_topic(16);

        let quote = Quote::new("s:1", "S1 Incorporated", 50.0);
        let change = QuotePriceChange::new(&quote, 49.0, 1.02, 100.0, 1_700_000_000_000);
        topic.publish_quote_change(&change).await?;
        topic
            .publish_event(&MarketEvent::RecentListChanged("s:1".to_string()))
            .await?;

        assert_eq!(quotes.recv().await?, change);
        assert_eq!(
            events.recv().await?,
            MarketEvent::RecentListChanged("s:1".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_enqueue_fails_when_consumer_gone() {
        let (queue, consumer) = memory_queue(16);
        drop(consumer);

        let message = OrderMessage::new_order(OrderId::new(5), true, 0);
        assert!(queue.enqueue(&message).await.is_err());
    }
}
