//! # Broker Core Library
//!
//! Infrastructure shared by the brokerage services.
//!
//! ## Modules
//! - `comms`: Typed sender/receiver sockets over pluggable transports
//!   (in-process memory channels, optional ZeroMQ).
//! - `outbound`: Queue and topic adapters implementing the `broker-api`
//!   publish seams.
//! - `store`: In-memory arena implementation of the record store.
//! - `fs`: Atomic state persistence helpers.

pub mod comms;
pub mod fs;
pub mod outbound;
pub mod store;

pub use comms::Address;
pub use outbound::{memory_queue, memory_topic, QueueSender, TopicPublisher};
pub use store::MemoryStore;
