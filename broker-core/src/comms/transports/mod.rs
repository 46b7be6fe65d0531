pub(crate) mod memory;
#[cfg(feature = "zmq")]
pub(crate) mod zmq;
