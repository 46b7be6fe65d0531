use broker_api::{OrderId, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradeError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("order {0} is already completed")]
    AlreadyCompleted(OrderId),
    #[error("order quantity must be positive")]
    InvalidQuantity,
    #[error("store operation failed: {0}")]
    Store(#[source] StoreError),
    #[error("dispatch failed: {0}")]
    Dispatch(anyhow::Error),
    #[error("notification publish failed: {0}")]
    Publish(anyhow::Error),
}

impl From<StoreError> for TradeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => TradeError::NotFound { entity, key },
            other => TradeError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, TradeError>;
