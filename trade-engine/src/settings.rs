//! Engine tuning knobs and the bounded-price business rules.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Price floor that triggers the forced recovery multiplier.
pub const PENNY_STOCK_PRICE: f64 = 0.01;
/// Change factor forced onto a quote sitting at the penny floor.
pub const PENNY_STOCK_RECOVERY_MULTIPLIER: f64 = 600.0;
/// Price ceiling above which a split is forced.
pub const MAXIMUM_STOCK_PRICE: f64 = 400.0;
/// Change factor forced onto a quote above the ceiling.
pub const MAXIMUM_STOCK_SPLIT_MULTIPLIER: f64 = 0.5;

fn default_order_fee() -> f64 {
    24.95
}

fn default_summary_interval() -> i64 {
    20
}

fn default_true() -> bool {
    true
}

fn default_max_quotes() -> u32 {
    1000
}

fn default_list_change_frequency() -> u32 {
    100
}

fn default_deferred_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSettings {
    /// Flat fee charged on every order.
    #[serde(default = "default_order_fee")]
    order_fee: f64,
    /// Seconds between market summary refreshes. Zero recomputes on every
    /// call; negative serves the cached snapshot until a manual refresh.
    #[serde(default = "default_summary_interval")]
    market_summary_interval: i64,
    /// Master switch for quote price mutation.
    #[serde(default = "default_true")]
    update_quote_prices: bool,
    /// Whether price changes are broadcast to the notification topic.
    #[serde(default = "default_true")]
    publish_quote_price_change: bool,
    /// Size of the tradeable symbol universe.
    #[serde(default = "default_max_quotes")]
    max_quotes: u32,
    /// Percentage of the universe mirrored into the recent-change list.
    #[serde(default = "default_list_change_frequency")]
    list_change_frequency: u32,
    /// Delay before a deferred completion fires.
    #[serde(default = "default_deferred_delay_ms")]
    deferred_delay_ms: u64,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            order_fee: default_order_fee(),
            market_summary_interval: default_summary_interval(),
            update_quote_prices: true,
            publish_quote_price_change: true,
            max_quotes: default_max_quotes(),
            list_change_frequency: default_list_change_frequency(),
            deferred_delay_ms: default_deferred_delay_ms(),
        }
    }
}

impl TradeSettings {
    /// Loads settings from a JSON file, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        broker_core::fs::load_state(path).unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        broker_core::fs::save_state(path, self)
    }

    pub fn order_fee(&self) -> f64 {
        self.order_fee
    }

    pub fn market_summary_interval(&self) -> i64 {
        self.market_summary_interval
    }

    pub fn update_quote_prices(&self) -> bool {
        self.update_quote_prices
    }

    pub fn publish_quote_price_change(&self) -> bool {
        self.publish_quote_price_change
    }

    pub fn max_quotes(&self) -> u32 {
        self.max_quotes
    }

    pub fn list_change_frequency(&self) -> u32 {
        self.list_change_frequency
    }

    pub fn deferred_delay_ms(&self) -> u64 {
        self.deferred_delay_ms
    }

    pub fn with_order_fee(mut self, fee: f64) -> Self {
        self.order_fee = fee;
        self
    }

    pub fn with_market_summary_interval(mut self, seconds: i64) -> Self {
        self.market_summary_interval = seconds;
        self
    }

    pub fn with_update_quote_prices(mut self, enabled: bool) -> Self {
        self.update_quote_prices = enabled;
        self
    }

    pub fn with_publish_quote_price_change(mut self, enabled: bool) -> Self {
        self.publish_quote_price_change = enabled;
        self
    }

    pub fn with_max_quotes(mut self, max_quotes: u32) -> Self {
        self.max_quotes = max_quotes;
        self
    }

    pub fn with_list_change_frequency(mut self, percent: u32) -> Self {
        self.list_change_frequency = percent;
        self
    }

    pub fn with_deferred_delay_ms(mut self, millis: u64) -> Self {
        self.deferred_delay_ms = millis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TradeSettings::default();
        assert_eq!(settings.order_fee(), 24.95);
        assert_eq!(settings.market_summary_interval(), 20);
        assert!(settings.update_quote_prices());
        assert!(settings.publish_quote_price_change());
        assert_eq!(settings.deferred_delay_ms(), 500);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: TradeSettings =
            serde_json::from_str(r#"{"market_summary_interval": -1}"#).unwrap();
        assert_eq!(settings.market_summary_interval(), -1);
        assert_eq!(settings.order_fee(), 24.95);
        assert_eq!(settings.max_quotes(), 1000);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings =
            TradeSettings::load_or_default(Path::new("/nonexistent/trade-settings.json"));
        assert_eq!(settings.order_fee(), 24.95);
    }
}
