//! Quote price mutation and the recent-change list.

use crate::error::{Result, TradeError};
use crate::settings::{
    TradeSettings, MAXIMUM_STOCK_PRICE, MAXIMUM_STOCK_SPLIT_MULTIPLIER, PENNY_STOCK_PRICE,
    PENNY_STOCK_RECOVERY_MULTIPLIER,
};
use broker_api::{MarketEvent, NotificationPublisher, Quote, QuotePriceChange, TradeStore};
use chrono::Utc;
use log::{debug, warn};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Entries kept in the recent-change list.
const RECENT_LIST_CAPACITY: usize = 5;

/// Rounds to two decimals, half away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Simulated market movement: a factor between 0.9 and 1.1, snapped to two
/// decimals. Never at or below zero.
pub fn random_change_factor() -> f64 {
    let mut rng = rand::rng();
    let mut percent: f64 = rng.random::<f64>() * 0.1;
    if rng.random_bool(0.5) {
        percent = -percent;
    }
    let factor = round2(1.0 + percent);
    if factor <= 0.0 {
        1.0
    } else {
        factor
    }
}

/// The last five quote mutations, newest first. Fan-out state for push
/// listeners, not authoritative.
#[derive(Default)]
pub struct RecentQuoteChanges {
    list: Mutex<VecDeque<Quote>>,
}

impl RecentQuoteChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits the quote if its numeric symbol suffix falls below the
    /// configured share of the universe. Returns whether it was admitted.
    pub fn add(&self, quote: &Quote, max_quotes: u32, frequency_percent: u32) -> bool {
        let Some(suffix) = symbol_suffix(quote.symbol()) else {
            return false;
        };
        if f64::from(suffix) >= f64::from(max_quotes) * f64::from(frequency_percent) * 0.01 {
            return false;
        }

        let mut list = self.list.lock().unwrap();
        list.push_front(quote.clone());
        list.truncate(RECENT_LIST_CAPACITY);
        true
    }

    pub fn recent(&self) -> Vec<Quote> {
        self.list.lock().unwrap().iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.list.lock().unwrap().is_empty()
    }
}

/// Trailing digits of a symbol like "s:42".
fn symbol_suffix(symbol: &str) -> Option<u32> {
    let digits: String = symbol
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Sole owner of Quote mutation. Applies the bounded-price business rules,
/// persists the result and fans out the change notification.
#[derive(Clone)]
pub struct QuotePriceUpdater {
    store: Arc<dyn TradeStore>,
    publisher: Arc<dyn NotificationPublisher>,
    recent: Arc<RecentQuoteChanges>,
    settings: Arc<TradeSettings>,
}

impl QuotePriceUpdater {
    pub fn new(
        store: Arc<dyn TradeStore>,
        publisher: Arc<dyn NotificationPublisher>,
        settings: Arc<TradeSettings>,
    ) -> Self {
        Self {
            store,
            publisher,
            recent: Arc::new(RecentQuoteChanges::new()),
            settings,
        }
    }

    pub fn recent_changes(&self) -> Vec<Quote> {
        self.recent.recent()
    }

    /// Applies `change_factor` to the quote's price and adds `shares_traded`
    /// to its volume.
    ///
    /// A quote stuck at the penny floor is forced into a recovery rally and
    /// one above the maximum price is forcibly split, regardless of the
    /// requested factor. Returns the empty quote when price updates are
    /// globally disabled.
    pub async fn update_price_volume(
        &self,
        symbol: &str,
        change_factor: f64,
        shares_traded: f64,
    ) -> Result<Quote> {
        if !self.settings.update_quote_prices() {
            return Ok(Quote::default());
        }

        let mut quote = self.store.quote(symbol)?;
        let old_price = quote.price();

        let factor = if old_price == PENNY_STOCK_PRICE {
            PENNY_STOCK_RECOVERY_MULTIPLIER
        } else if old_price > MAXIMUM_STOCK_PRICE {
            MAXIMUM_STOCK_SPLIT_MULTIPLIER
        } else {
            change_factor
        };

        let new_price = round2(factor * old_price);
        quote.apply_price(new_price);
        quote.add_volume(shares_traded);
        self.store.update_quote(&quote)?;

        debug!(
            "quote {}: {:.2} -> {:.2} (factor {:.2}, {} shares)",
            symbol, old_price, new_price, factor, shares_traded
        );

        if self.settings.publish_quote_price_change() {
            let change = QuotePriceChange::new(
                &quote,
                old_price,
                factor,
                shares_traded,
                Utc::now().timestamp_millis(),
            );
            self.publisher
                .publish_quote_change(&change)
                .await
                .map_err(TradeError::Publish)?;
        }

        if self.recent.add(
            &quote,
            self.settings.max_quotes(),
            self.settings.list_change_frequency(),
        ) {
            // Secondary event; losing it only delays push listeners.
            if let Err(e) = self
                .publisher
                .publish_event(&MarketEvent::RecentListChanged(symbol.to_string()))
                .await
            {
                warn!("recent-change event for {} dropped: {}", symbol, e);
            }
        }

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(1.07342), 1.07);
        assert_eq!(round2(600.0 * 0.01), 6.0);
    }

    #[test]
    fn test_random_change_factor_bounds() {
        for _ in 0..1000 {
            let factor = random_change_factor();
            assert!((0.9..=1.1).contains(&factor), "factor out of range: {}", factor);
            // Snapped to two decimals
            assert!((factor * 100.0 - (factor * 100.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symbol_suffix() {
        assert_eq!(symbol_suffix("s:42"), Some(42));
        assert_eq!(symbol_suffix("s:0"), Some(0));
        assert_eq!(symbol_suffix("cash"), None);
    }

    #[test]
    fn test_recent_list_bounded_newest_first() {
        let recent = RecentQuoteChanges::new();
        for i in 0..7 {
            let quote = Quote::new(format!("s:{}", i), "Test", 10.0);
            assert!(recent.add(&quote, 1000, 100));
        }

        let list = recent.recent();
        assert_eq!(list.len(), RECENT_LIST_CAPACITY);
        assert_eq!(list[0].symbol(), "s:6");
        assert_eq!(list[4].symbol(), "s:2");
    }

    #[test]
    fn test_recent_list_threshold() {
        let recent = RecentQuoteChanges::new();
        // 10% of a 100-symbol universe: only suffixes below 10 are admitted.
        assert!(recent.add(&Quote::new("s:9", "Test", 10.0), 100, 10));
        assert!(!recent.add(&Quote::new("s:10", "Test", 10.0), 100, 10));
        assert!(!recent.add(&Quote::new("s:99", "Test", 10.0), 100, 10));
        assert_eq!(recent.recent().len(), 1);
    }
}
