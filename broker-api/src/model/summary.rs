use super::quote::Quote;
use serde::{Deserialize, Serialize};

/// Entries kept on each side of the movers lists.
pub const TOP_MOVERS: usize = 5;

/// Market-wide aggregate snapshot. Immutable once built; the summary cache
/// replaces it wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    index_value: f64,
    open_index_value: f64,
    total_volume: f64,
    top_gainers: Vec<Quote>,
    top_losers: Vec<Quote>,
    summary_date: i64,
}

impl MarketSummary {
    pub fn new(
        index_value: f64,
        open_index_value: f64,
        total_volume: f64,
        mut top_gainers: Vec<Quote>,
        mut top_losers: Vec<Quote>,
        summary_date: i64,
    ) -> Self {
        top_gainers.truncate(TOP_MOVERS);
        top_losers.truncate(TOP_MOVERS);
        Self {
            index_value,
            open_index_value,
            total_volume,
            top_gainers,
            top_losers,
            summary_date,
        }
    }

    /// Mean price across all tracked quotes.
    pub fn index_value(&self) -> f64 {
        self.index_value
    }

    /// Mean opening price across all tracked quotes.
    pub fn open_index_value(&self) -> f64 {
        self.open_index_value
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn top_gainers(&self) -> &[Quote] {
        &self.top_gainers
    }

    pub fn top_losers(&self) -> &[Quote] {
        &self.top_losers
    }

    pub fn summary_date(&self) -> i64 {
        self.summary_date
    }

    /// Percentage move of the index against its open, two decimals.
    pub fn gain_percent(&self) -> f64 {
        if self.open_index_value == 0.0 {
            return 0.0;
        }
        let ratio = (self.index_value / self.open_index_value - 1.0) * 100.0;
        (ratio * 100.0).round() / 100.0
    }
}
