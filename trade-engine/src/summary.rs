//! Interval-debounced, single-flight market summary cache.

use crate::error::Result;
use broker_api::{MarketEvent, MarketSummary, NotificationPublisher, Quote, TradeStore};
use chrono::Utc;
use log::warn;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, RwLock};

/// Caches the market-wide aggregate snapshot, recomputing at most once per
/// configured interval.
///
/// The mutex window only decides who refreshes; the expensive recomputation
/// runs outside it. Everyone who is not the elected refresher (losers of
/// the race, callers arriving while the refresh is in progress) gets the
/// previous snapshot without blocking.
pub struct MarketSummaryCache {
    store: Arc<dyn TradeStore>,
    publisher: Arc<dyn NotificationPublisher>,
    /// Seconds between refreshes; zero disables caching, negative freezes
    /// the cached snapshot.
    interval_secs: i64,
    next_due: AtomicI64,
    election: Mutex<()>,
    snapshot: RwLock<Arc<MarketSummary>>,
}

impl MarketSummaryCache {
    pub fn new(
        store: Arc<dyn TradeStore>,
        publisher: Arc<dyn NotificationPublisher>,
        interval_secs: i64,
    ) -> Self {
        Self {
            store,
            publisher,
            interval_secs,
            next_due: AtomicI64::new(Utc::now().timestamp_millis()),
            election: Mutex::new(()),
            snapshot: RwLock::new(Arc::new(MarketSummary::default())),
        }
    }

    /// Returns the current snapshot, refreshing it first if this caller wins
    /// the election for an overdue refresh.
    pub async fn market_summary(&self) -> Result<Arc<MarketSummary>> {
        if self.interval_secs == 0 {
            return self.refresh().await;
        }
        if self.interval_secs < 0 {
            return Ok(self.cached());
        }

        let now = Utc::now().timestamp_millis();
        let observed_due = self.next_due.load(AtomicOrdering::Acquire);

        if now > observed_due {
            let mut elected = false;
            {
                let _guard = self.election.lock().unwrap();
                // Did we lose the race? If the due time moved, the work is
                // already claimed and we serve the old copy.
                if self.next_due.load(AtomicOrdering::Acquire) == observed_due {
                    elected = true;
                    let mut next = observed_due + self.interval_secs * 1000;
                    // After an idle stretch the due time can lag far behind;
                    // re-base on the current time instead of playing catch-up.
                    if next < now {
                        next = now + self.interval_secs * 1000;
                    }
                    self.next_due.store(next, AtomicOrdering::Release);
                }
            }

            if elected {
                return self.refresh().await;
            }
        }

        Ok(self.cached())
    }

    /// Recomputes the snapshot from the full quote universe and replaces the
    /// shared copy. Callable directly for manual refresh when the interval
    /// is negative.
    pub async fn refresh(&self) -> Result<Arc<MarketSummary>> {
        let quotes = self.store.all_quotes()?;
        let summary = Arc::new(compute_summary(&quotes, Utc::now().timestamp_millis()));

        *self.snapshot.write().unwrap() = Arc::clone(&summary);

        if let Err(e) = self.publisher.publish_event(&MarketEvent::SummaryUpdate).await {
            warn!("market summary update event dropped: {}", e);
        }

        Ok(summary)
    }

    pub fn cached(&self) -> Arc<MarketSummary> {
        Arc::clone(&self.snapshot.read().unwrap())
    }
}

/// Aggregates the quote universe: five biggest movers each way (stable sort,
/// so ties keep storage order), mean price and open price, summed volume.
fn compute_summary(quotes: &[Quote], summary_date: i64) -> MarketSummary {
    let mut losers: Vec<Quote> = quotes.to_vec();
    losers.sort_by(|a, b| a.change().partial_cmp(&b.change()).unwrap_or(Ordering::Equal));
    losers.truncate(5);

    let mut gainers: Vec<Quote> = quotes.to_vec();
    gainers.sort_by(|a, b| b.change().partial_cmp(&a.change()).unwrap_or(Ordering::Equal));
    gainers.truncate(5);

    let count = quotes.len();
    let (index_value, open_index_value, total_volume) = if count == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let price_sum: f64 = quotes.iter().map(Quote::price).sum();
        let open_sum: f64 = quotes.iter().map(Quote::open_price).sum();
        let volume_sum: f64 = quotes.iter().map(Quote::volume).sum();
        (price_sum / count as f64, open_sum / count as f64, volume_sum)
    };

    MarketSummary::new(
        index_value,
        open_index_value,
        total_volume,
        gainers,
        losers,
        summary_date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_with_change(symbol: &str, open: f64, price: f64, volume: f64) -> Quote {
        let mut quote = Quote::new(symbol, format!("{} Incorporated", symbol), open);
        quote.apply_price(price);
        quote.add_volume(volume);
        quote
    }

    #[test]
    fn test_compute_summary_aggregates() {
        let quotes = vec![
            quote_with_change("s:0", 100.0, 110.0, 10.0), // +10
            quote_with_change("s:1", 100.0, 95.0, 20.0),  // -5
            quote_with_change("s:2", 100.0, 100.0, 30.0), // 0
        ];

        let summary = compute_summary(&quotes, 0);
        assert!((summary.index_value() - (110.0 + 95.0 + 100.0) / 3.0).abs() < 1e-9);
        assert!((summary.open_index_value() - 100.0).abs() < 1e-9);
        assert!((summary.total_volume() - 60.0).abs() < 1e-9);

        assert_eq!(summary.top_gainers()[0].symbol(), "s:0");
        assert_eq!(summary.top_losers()[0].symbol(), "s:1");
    }

    #[test]
    fn test_compute_summary_bounds_movers() {
        let quotes: Vec<Quote> = (0..9)
            .map(|i| quote_with_change(&format!("s:{}", i), 100.0, 100.0 + i as f64, 1.0))
            .collect();

        let summary = compute_summary(&quotes, 0);
        assert_eq!(summary.top_gainers().len(), 5);
        assert_eq!(summary.top_losers().len(), 5);
        // Gainers descend, losers ascend.
        assert_eq!(summary.top_gainers()[0].symbol(), "s:8");
        assert_eq!(summary.top_losers()[0].symbol(), "s:0");
    }

    #[test]
    fn test_compute_summary_ties_keep_storage_order() {
        let quotes: Vec<Quote> = (0..6)
            .map(|i| quote_with_change(&format!("s:{}", i), 100.0, 100.0, 1.0))
            .collect();

        let summary = compute_summary(&quotes, 0);
        let gainer_symbols: Vec<&str> =
            summary.top_gainers().iter().map(Quote::symbol).collect();
        assert_eq!(gainer_symbols, vec!["s:0", "s:1", "s:2", "s:3", "s:4"]);
    }

    #[test]
    fn test_compute_summary_empty_universe() {
        let summary = compute_summary(&[], 0);
        assert_eq!(summary.index_value(), 0.0);
        assert_eq!(summary.open_index_value(), 0.0);
        assert_eq!(summary.total_volume(), 0.0);
        assert!(summary.top_gainers().is_empty());
        assert!(summary.top_losers().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_flight_refresh() {
        use broker_api::TradeStore;
        use broker_core::outbound::memory_topic;
        use broker_core::MemoryStore;
        use std::time::Duration;

        let store = Arc::new(MemoryStore::new());
        store
            .create_quote(Quote::new("s:0", "S0 Incorporated", 100.0))
            .unwrap();
        let (topic, _quote_rx, mut event_rx) = memory_topic(64);
        let cache = Arc::new(MarketSummaryCache::new(store, Arc::new(topic), 3600));

        // Let the construction-time due mark lapse.
        tokio::time::sleep(Duration::from_millis(5)).await;

        let barrier = Arc::new(tokio::sync::Barrier::new(16));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                cache.market_summary().await.unwrap()
            }));
        }

        // Everyone gets a snapshot without blocking: the winner the fresh
        // one, losers the previous copy.
        let mut fresh = 0;
        for handle in handles {
            let summary = handle.await.unwrap();
            if summary.index_value() != 0.0 {
                fresh += 1;
            }
        }
        assert!(fresh >= 1);

        // Exactly one recomputation fired, regardless of caller count.
        assert!(event_rx.try_recv().await.is_ok());
        assert!(event_rx.try_recv().await.is_err());

        // Inside the interval the shared snapshot is served as-is.
        let again = cache.market_summary().await.unwrap();
        assert!((again.index_value() - 100.0).abs() < 1e-9);
        assert!(event_rx.try_recv().await.is_err());
    }
}
