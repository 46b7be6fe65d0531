//! Factory functions for creating communication endpoints.
//!
//! Abstracts the creation of `SenderSocket` and `ReceiverSocket` based on
//! `Address`. Memory channels are paired endpoints and must be wired
//! explicitly (see `crate::outbound`), so the factories only build
//! inter-process endpoints.

use super::address::Address;
use super::socket::{ReceiverSocket, SenderSocket};
use super::transport::{TransportInput, TransportOutput};
use anyhow::{bail, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Factory to create broadcast sender endpoints.
pub fn build_publisher<T>(address: &Address) -> Result<SenderSocket<T>>
where
    T: Serialize + Send + Sync + 'static,
{
    let transport: Box<dyn TransportOutput> = match address {
        Address::Zmq(endpoint) => zmq_publisher(endpoint)?,
        Address::Memory(_) => {
            bail!("Memory channels are paired; wire them explicitly instead of via the builder");
        }
        Address::Empty => {
            bail!("Cannot build a publisher with an empty address");
        }
    };
    Ok(SenderSocket::new(transport))
}

/// Factory to create broadcast receiver endpoints.
pub fn build_subscriber<T>(address: &Address) -> Result<ReceiverSocket<T>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let transport: Box<dyn TransportInput> = match address {
        Address::Zmq(endpoint) => zmq_subscriber(endpoint)?,
        Address::Memory(_) => {
            bail!("Memory channels are paired; wire them explicitly instead of via the builder");
        }
        Address::Empty => {
            bail!("Cannot build a subscriber with an empty address");
        }
    };
    Ok(ReceiverSocket::new(transport))
}

/// Factory to create point-to-point queue sender endpoints.
pub fn build_queue_sender<T>(address: &Address) -> Result<SenderSocket<T>>
where
    T: Serialize + Send + Sync + 'static,
{
    let transport: Box<dyn TransportOutput> = match address {
        Address::Zmq(endpoint) => zmq_pusher(endpoint)?,
        Address::Memory(_) => {
            bail!("Memory channels are paired; wire them explicitly instead of via the builder");
        }
        Address::Empty => {
            bail!("Cannot build a queue sender with an empty address");
        }
    };
    Ok(SenderSocket::new(transport))
}

/// Factory to create point-to-point queue receiver endpoints.
pub fn build_queue_receiver<T>(address: &Address) -> Result<ReceiverSocket<T>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let transport: Box<dyn TransportInput> = match address {
        Address::Zmq(endpoint) => zmq_puller(endpoint)?,
        Address::Memory(_) => {
            bail!("Memory channels are paired; wire them explicitly instead of via the builder");
        }
        Address::Empty => {
            bail!("Cannot build a queue receiver with an empty address");
        }
    };
    Ok(ReceiverSocket::new(transport))
}

#[cfg(feature = "zmq")]
fn zmq_publisher(endpoint: &str) -> Result<Box<dyn TransportOutput>> {
    use super::transports::zmq::ZmqPublisher;
    Ok(Box::new(ZmqPublisher::new(endpoint)?))
}

#[cfg(feature = "zmq")]
fn zmq_subscriber(endpoint: &str) -> Result<Box<dyn TransportInput>> {
    use super::transports::zmq::ZmqSubscriber;
    Ok(Box::new(ZmqSubscriber::new(endpoint)?))
}

#[cfg(feature = "zmq")]
fn zmq_pusher(endpoint: &str) -> Result<Box<dyn TransportOutput>> {
    use super::transports::zmq::ZmqPusher;
    Ok(Box::new(ZmqPusher::new(endpoint)?))
}

#[cfg(feature = "zmq")]
fn zmq_puller(endpoint: &str) -> Result<Box<dyn TransportInput>> {
    use super::transports::zmq::ZmqPuller;
    Ok(Box::new(ZmqPuller::new(endpoint)?))
}

#[cfg(not(feature = "zmq"))]
fn zmq_publisher(endpoint: &str) -> Result<Box<dyn TransportOutput>> {
    bail!("ZMQ support not compiled in (enable the `zmq` feature): {}", endpoint)
}

#[cfg(not(feature = "zmq"))]
fn zmq_subscriber(endpoint: &str) -> Result<Box<dyn TransportInput>> {
    bail!("ZMQ support not compiled in (enable the `zmq` feature): {}", endpoint)
}

#[cfg(not(feature = "zmq"))]
fn zmq_pusher(endpoint: &str) -> Result<Box<dyn TransportOutput>> {
    bail!("ZMQ support not compiled in (enable the `zmq` feature): {}", endpoint)
}

#[cfg(not(feature = "zmq"))]
fn zmq_puller(endpoint: &str) -> Result<Box<dyn TransportInput>> {
    bail!("ZMQ support not compiled in (enable the `zmq` feature): {}", endpoint)
}
