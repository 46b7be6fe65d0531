//! Address models for endpoint configuration.
//!
//! Defines the `Address` enum for abstracting over transport backends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents an endpoint address for communication channels.
///
/// Shields the application from specific transport implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    /// ZeroMQ transport (inter-process).
    /// Format: "tcp://ip:port" or "ipc://path"
    Zmq(String),

    /// Internal memory channel (intra-process).
    /// Format: "channel_name"
    Memory(String),

    /// No connection.
    Empty,
}

impl Address {
    /// Creates a new ZMQ TCP address.
    pub fn zmq_tcp(ip: &str, port: u16) -> Self {
        Address::Zmq(format!("tcp://{}:{}", ip, port))
    }

    /// Creates a new memory channel address.
    pub fn memory(name: &str) -> Self {
        Address::Memory(name.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Zmq(addr) => write!(f, "zmq:{}", addr),
            Address::Memory(name) => write!(f, "mem:{}", name),
            Address::Empty => write!(f, "empty"),
        }
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(stripped) = s.strip_prefix("zmq:") {
            Ok(Address::Zmq(stripped.to_string()))
        } else if let Some(stripped) = s.strip_prefix("mem:") {
            Ok(Address::Memory(stripped.to_string()))
        } else if s == "empty" {
            Ok(Address::Empty)
        } else if s.starts_with("tcp://") || s.starts_with("ipc://") {
            Ok(Address::Zmq(s.to_string()))
        } else {
            Err(format!("Unknown address format: {}", s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let addr = Address::zmq_tcp("127.0.0.1", 5563);
        let parsed: Address = addr.to_string().strip_prefix("zmq:").unwrap().parse().unwrap();
        assert_eq!(addr, parsed);

        assert_eq!("mem:orders".parse::<Address>(), Ok(Address::memory("orders")));
        assert_eq!("empty".parse::<Address>(), Ok(Address::Empty));
        assert!("bogus".parse::<Address>().is_err());
    }
}
