pub mod address;
pub mod builder;
pub mod socket;
pub mod transport;
pub(crate) mod transports;

pub use address::Address;
pub use socket::{ReceiverSocket, SenderSocket};
