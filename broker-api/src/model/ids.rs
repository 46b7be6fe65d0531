//! Stable numeric keys for arena records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned sequence value backing every record key.
pub type Id = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Id);

impl AccountId {
    pub fn new(id: Id) -> Self {
        Self(id)
    }

    pub fn value(&self) -> Id {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldingId(Id);

impl HoldingId {
    pub fn new(id: Id) -> Self {
        Self(id)
    }

    pub fn value(&self) -> Id {
        self.0
    }
}

impl fmt::Display for HoldingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Id);

impl OrderId {
    pub fn new(id: Id) -> Self {
        Self(id)
    }

    pub fn value(&self) -> Id {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
