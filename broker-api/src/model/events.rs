//! Wire payloads handed to the external broker queue and the notification
//! topic. Field names follow the established message schema, so renames here
//! are wire-breaking.

use super::ids::OrderId;
use super::quote::Quote;
use serde::{Deserialize, Serialize};

/// Completion command enqueued for the external order consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMessage {
    command: String,
    order_id: i64,
    two_phase: bool,
    publish_time: i64,
    text: String,
}

impl OrderMessage {
    pub fn new_order(order_id: OrderId, two_phase: bool, publish_time: i64) -> Self {
        Self {
            command: "neworder".to_string(),
            order_id: order_id.value(),
            two_phase,
            publish_time,
            text: format!("neworder: orderID={} twoPhase={}", order_id, two_phase),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.order_id)
    }

    pub fn two_phase(&self) -> bool {
        self.two_phase
    }

    pub fn publish_time(&self) -> i64 {
        self.publish_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Broadcast payload describing one quote mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePriceChange {
    command: String,
    symbol: String,
    company: String,
    price: f64,
    old_price: f64,
    open: f64,
    low: f64,
    high: f64,
    volume: f64,
    change_factor: f64,
    shares_traded: f64,
    publish_time: i64,
    text: String,
}

impl QuotePriceChange {
    pub fn new(
        quote: &Quote,
        old_price: f64,
        change_factor: f64,
        shares_traded: f64,
        publish_time: i64,
    ) -> Self {
        Self {
            command: "updateQuote".to_string(),
            symbol: quote.symbol().to_string(),
            company: quote.company_name().to_string(),
            price: quote.price(),
            old_price,
            open: quote.open_price(),
            low: quote.low(),
            high: quote.high(),
            volume: quote.volume(),
            change_factor,
            shares_traded,
            publish_time,
            text: format!(
                "Update stock price for {} old price = {} new price = {}",
                quote.symbol(),
                old_price,
                quote.price()
            ),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn old_price(&self) -> f64 {
        self.old_price
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn change_factor(&self) -> f64 {
        self.change_factor
    }

    pub fn shares_traded(&self) -> f64 {
        self.shares_traded
    }

    pub fn publish_time(&self) -> i64 {
        self.publish_time
    }
}

/// Secondary notifications fanned out to push listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// The market summary snapshot was refreshed.
    SummaryUpdate,
    /// The named symbol was admitted to the recent-change list.
    RecentListChanged(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_message_wire_fields() {
        let message = OrderMessage::new_order(OrderId::new(42), true, 1_700_000_000_000);
        let json = serde_json::to_string(&message).unwrap();

        assert!(json.contains("\"command\":\"neworder\""));
        assert!(json.contains("\"orderId\":42"));
        assert!(json.contains("\"twoPhase\":true"));
        assert!(json.contains("\"publishTime\":1700000000000"));
        assert_eq!(message.order_id(), OrderId::new(42));
    }

    #[test]
    fn test_quote_change_wire_fields() {
        let mut quote = Quote::new("s:3", "S3 Incorporated", 100.0);
        quote.apply_price(101.0);
        quote.add_volume(500.0);

        let change = QuotePriceChange::new(&quote, 100.0, 1.01, 500.0, 1_700_000_000_000);
        let json = serde_json::to_string(&change).unwrap();

        assert!(json.contains("\"command\":\"updateQuote\""));
        assert!(json.contains("\"oldPrice\":100.0"));
        assert!(json.contains("\"changeFactor\":1.01"));
        assert!(json.contains("\"sharesTraded\":500.0"));
        assert_eq!(change.symbol(), "s:3");
        assert_eq!(change.price(), 101.0);
    }
}
