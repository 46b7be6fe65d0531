use crate::model::account::Account;
use crate::model::holding::Holding;
use crate::model::ids::{AccountId, HoldingId, OrderId};
use crate::model::order::{Order, OrderKind};
use crate::model::quote::Quote;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        StoreError::Duplicate {
            entity,
            key: key.to_string(),
        }
    }
}

/// Durable record storage for accounts, holdings, orders and quotes.
///
/// Calls are synchronous and may block on I/O. Record keys are assigned by
/// the store and stay stable for the life of the record. A missing holding
/// is an expected domain state (a concurrent sell may have removed it), so
/// holding reads return `Option`; other lookups fail with `NotFound`.
pub trait TradeStore: Send + Sync {
    fn insert_account(
        &self,
        user_id: &str,
        open_balance: f64,
        creation_date: i64,
    ) -> Result<Account, StoreError>;
    fn account(&self, account_id: AccountId) -> Result<Account, StoreError>;
    fn account_for_user(&self, user_id: &str) -> Result<Account, StoreError>;
    fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    fn create_quote(&self, quote: Quote) -> Result<Quote, StoreError>;
    fn quote(&self, symbol: &str) -> Result<Quote, StoreError>;
    fn update_quote(&self, quote: &Quote) -> Result<(), StoreError>;
    /// All quotes in stable storage order.
    fn all_quotes(&self) -> Result<Vec<Quote>, StoreError>;

    fn create_holding(
        &self,
        account_id: AccountId,
        symbol: &str,
        quantity: f64,
        purchase_price: f64,
        purchase_date: i64,
    ) -> Result<Holding, StoreError>;
    fn holding(&self, holding_id: HoldingId) -> Result<Option<Holding>, StoreError>;
    fn update_holding(&self, holding: &Holding) -> Result<(), StoreError>;
    /// Removes and returns the holding, or `None` if it was already gone.
    fn remove_holding(&self, holding_id: HoldingId) -> Result<Option<Holding>, StoreError>;
    fn holdings_for_account(&self, account_id: AccountId) -> Result<Vec<Holding>, StoreError>;

    #[allow(clippy::too_many_arguments)]
    fn create_order(
        &self,
        account_id: AccountId,
        symbol: &str,
        kind: OrderKind,
        quantity: f64,
        price: f64,
        fee: f64,
        holding_id: Option<HoldingId>,
        open_date: i64,
    ) -> Result<Order, StoreError>;
    fn order(&self, order_id: OrderId) -> Result<Order, StoreError>;
    fn update_order(&self, order: &Order) -> Result<(), StoreError>;
    fn orders_for_account(&self, account_id: AccountId) -> Result<Vec<Order>, StoreError>;
}
