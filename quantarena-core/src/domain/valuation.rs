//! Valuation — capability interface for pricing an instrument off the market.
//!
//! Any type that can produce a present value from the current snapshot is a
//! valid instrument; there is no base-type requirement. Callback strategies
//! may supply their own implementations for user-defined instruments.

use super::market::MarketSnapshot;

/// Prices an instrument against the current market snapshot.
pub trait Valuation: Send + Sync {
    /// Identifier of the instrument this valuation prices.
    fn instrument_id(&self) -> &str;

    /// Present value per unit, or `None` if the market has no way to price
    /// the instrument yet (no quote observed).
    fn present_value(&self, market: &MarketSnapshot) -> Option<f64>;
}

/// Spot instrument: present value is the latest traded price.
#[derive(Debug, Clone)]
pub struct Spot {
    instrument: String,
}

impl Spot {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
        }
    }
}

impl Valuation for Spot {
    fn instrument_id(&self) -> &str {
        &self.instrument
    }

    fn present_value(&self, market: &MarketSnapshot) -> Option<f64> {
        market.price(&self.instrument)
    }
}
