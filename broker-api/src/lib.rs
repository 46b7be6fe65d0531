//! # Broker API
//!
//! Shared data model and collaborator seams for the brokerage platform.
//!
//! ## Modules
//! - `model`: Record types (Account, Holding, Order, Quote) and wire payloads
//!   with identical serialization on both sides of a transport.
//! - `traits`: Boundaries the engine talks through (record store, completion
//!   queue, notification publisher).

pub mod model;
pub mod traits;

pub use model::account::Account;
pub use model::events::{MarketEvent, OrderMessage, QuotePriceChange};
pub use model::holding::Holding;
pub use model::ids::{AccountId, HoldingId, Id, OrderId};
pub use model::order::{Order, OrderKind, OrderStatus};
pub use model::quote::Quote;
pub use model::summary::MarketSummary;
pub use traits::publish::{CompletionQueue, NotificationPublisher};
pub use traits::store::{StoreError, TradeStore};
