use serde::{Deserialize, Serialize};

/// A tradeable symbol and its current pricing. Mutated only by the quote
/// price updater.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    symbol: String,
    company_name: String,
    price: f64,
    open_price: f64,
    low: f64,
    high: f64,
    change: f64,
    volume: f64,
}

impl Quote {
    /// A freshly listed quote opens flat: low, high and open all equal the
    /// listing price.
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            company_name: company_name.into(),
            price,
            open_price: price,
            low: price,
            high: price,
            change: 0.0,
            volume: 0.0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn open_price(&self) -> f64 {
        self.open_price
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Moves the price and rederives the day change against the open.
    pub fn apply_price(&mut self, new_price: f64) {
        self.price = new_price;
        self.change = new_price - self.open_price;
    }

    pub fn add_volume(&mut self, shares_traded: f64) {
        self.volume += shares_traded;
    }
}
