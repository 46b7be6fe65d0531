use super::ids::{AccountId, HoldingId};
use serde::{Deserialize, Serialize};

/// A quantity of one stock symbol owned by an account, pending sale.
///
/// A purchase date of zero is the reservation sentinel: the holding has a
/// sell in flight and must not be sold again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    holding_id: HoldingId,
    account_id: AccountId,
    symbol: String,
    quantity: f64,
    purchase_price: f64,
    purchase_date: i64,
}

impl Holding {
    pub fn new(
        holding_id: HoldingId,
        account_id: AccountId,
        symbol: impl Into<String>,
        quantity: f64,
        purchase_price: f64,
        purchase_date: i64,
    ) -> Self {
        Self {
            holding_id,
            account_id,
            symbol: symbol.into(),
            quantity,
            purchase_price,
            purchase_date,
        }
    }

    pub fn holding_id(&self) -> HoldingId {
        self.holding_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn purchase_date(&self) -> i64 {
        self.purchase_date
    }

    /// Marks the holding as having a sell in flight.
    pub fn reserve(&mut self) {
        self.purchase_date = 0;
    }

    pub fn is_reserved(&self) -> bool {
        self.purchase_date == 0
    }
}
