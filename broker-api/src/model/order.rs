use super::ids::{AccountId, HoldingId, OrderId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Buy,
    Sell,
}

/// Lifecycle status. `Open` is the only non-terminal state; `Completed` is
/// applied by the closed-order sweep after the owner has seen the fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Closed,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    kind: OrderKind,
    status: OrderStatus,
    account_id: AccountId,
    symbol: String,
    quantity: f64,
    price: f64,
    fee: f64,
    open_date: i64,
    completion_date: Option<i64>,
    holding_id: Option<HoldingId>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: OrderId,
        kind: OrderKind,
        account_id: AccountId,
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        fee: f64,
        holding_id: Option<HoldingId>,
        open_date: i64,
    ) -> Self {
        Self {
            order_id,
            kind,
            status: OrderStatus::Open,
            account_id,
            symbol: symbol.into(),
            quantity,
            price,
            fee,
            open_date,
            completion_date: None,
            holding_id,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn status(&self) -> OrderStatus {
        self.status
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

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn open_date(&self) -> i64 {
        self.open_date
    }

    pub fn completion_date(&self) -> Option<i64> {
        self.completion_date
    }

    pub fn holding_id(&self) -> Option<HoldingId> {
        self.holding_id
    }

    pub fn is_buy(&self) -> bool {
        self.kind == OrderKind::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.kind == OrderKind::Sell
    }

    pub fn set_holding(&mut self, holding_id: Option<HoldingId>) {
        self.holding_id = holding_id;
    }

    pub fn close(&mut self, now: i64) {
        self.status = OrderStatus::Closed;
        self.completion_date = Some(now);
    }

    pub fn cancel(&mut self, now: i64) {
        self.status = OrderStatus::Cancelled;
        self.completion_date = Some(now);
    }

    /// Closed -> Completed, applied once by the closed-order sweep.
    pub fn mark_completed(&mut self) {
        self.status = OrderStatus::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_order() -> Order {
        Order::new(
            OrderId::new(1),
            OrderKind::Buy,
            AccountId::new(1),
            "s:0",
            100.0,
            25.50,
            24.95,
            None,
            1_700_000_000_000,
        )
    }

    #[test]
    fn test_new_order_is_open() {
        let order = open_order();
        assert_eq!(order.status(), OrderStatus::Open);
        assert!(!order.status().is_terminal());
        assert_eq!(order.completion_date(), None);
        assert_eq!(order.holding_id(), None);
    }

    #[test]
    fn test_close_is_terminal() {
        let mut order = open_order();
        order.close(1_700_000_001_000);

        assert_eq!(order.status(), OrderStatus::Closed);
        assert!(order.status().is_terminal());
        assert_eq!(order.completion_date(), Some(1_700_000_001_000));
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut order = open_order();
        order.cancel(1_700_000_001_000);

        assert!(order.status().is_terminal());
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_serialization_round_trip() {
        let order = open_order();
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
