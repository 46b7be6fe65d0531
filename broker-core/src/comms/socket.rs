//! Typed socket abstractions.
//!
//! Provides `ReceiverSocket` and `SenderSocket` which handle
//! serialization/deserialization automatically.

use crate::comms::transport::{TransportInput, TransportOutput};
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// A strongly-typed input socket.
pub struct ReceiverSocket<C> {
    transport: Box<dyn TransportInput>,
    _marker: PhantomData<C>,
}

impl<C> ReceiverSocket<C>
where
    C: DeserializeOwned,
{
    /// Creates a new ReceiverSocket from a raw transport backend.
    pub fn new(transport: Box<dyn TransportInput>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }

    /// Receives the next message and deserializes it.
    ///
    /// This is a blocking call (asynchronous).
    pub async fn recv(&mut self) -> Result<C> {
        let bytes = self.transport.recv_bytes().await?;
        let data = bincode::deserialize(&bytes)?;
        Ok(data)
    }

    /// Receives the next message and deserializes it (non-blocking attempt).
    ///
    /// # Returns
    ///
    /// * `Ok(C)` if a message is immediately available.
    /// * `Err` if no message is available or another error occurs.
    pub async fn try_recv(&mut self) -> Result<C> {
        let bytes = self.transport.try_recv().await?;
        let data = bincode::deserialize(&bytes)?;
        Ok(data)
    }
}

/// A strongly-typed output socket.
pub struct SenderSocket<C> {
    transport: Box<dyn TransportOutput>,
    _marker: PhantomData<C>,
}

impl<C> SenderSocket<C>
where
    C: Serialize,
{
    /// Creates a new SenderSocket from a raw transport backend.
    pub fn new(transport: Box<dyn TransportOutput>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }

    /// Serializes and sends the message.
    pub async fn send(&self, data: &C) -> Result<()> {
        let bytes = bincode::serialize(data)?;
        self.transport.send_bytes(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comms::transports::memory::memory_pair;
    use broker_api::{OrderId, OrderMessage};

    #[tokio::test]
    async fn test_typed_socket_memory() -> Result<()> {
        // 1. Setup memory transport
        let (output_transport, input_transport) = memory_pair(100);

        // 2. Wrap in typed sockets
        let output: SenderSocket<OrderMessage> = SenderSocket::new(Box::new(output_transport));
        let mut input: ReceiverSocket<OrderMessage> =
            ReceiverSocket::new(Box::new(input_transport));

        // 3. Send a typed message
        let message = OrderMessage::new_order(OrderId::new(17), true, 1_700_000_000_000);
        output.send(&message).await?;

        // 4. Receive & verify
        let received = input.recv().await?;
        assert_eq!(received, message);
        assert_eq!(received.order_id(), OrderId::new(17));

        Ok(())
    }

    #[tokio::test]
    async fn test_try_recv_empty_channel() {
        let (_output, input_transport) = memory_pair(4);
        let mut input: ReceiverSocket<OrderMessage> =
            ReceiverSocket::new(Box::new(input_transport));

        assert!(input.try_recv().await.is_err());
    }
}
