//! MarketSnapshot — latest quote per instrument at the current step.
//!
//! Only the simulation driver advances the snapshot, strictly forward in
//! time. Strategies receive `&MarketSnapshot` and therefore cannot observe
//! quotes for steps not yet reached.

use super::quote::Quote;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Read-only (to strategies) view of the market at the current timestamp.
#[derive(Debug, Default)]
pub struct MarketSnapshot {
    timestamp: Option<NaiveDateTime>,
    quotes: BTreeMap<String, Quote>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the snapshot to a new step.
    ///
    /// Invariant: timestamps advance monotonically; the driver feeds batches
    /// in ascending order and never revisits a past timestamp.
    pub(crate) fn advance(&mut self, timestamp: NaiveDateTime, quotes: &[Quote]) {
        debug_assert!(
            self.timestamp.map_or(true, |t| timestamp > t),
            "market snapshot must advance monotonically"
        );
        self.timestamp = Some(timestamp);
        for quote in quotes {
            self.quotes.insert(quote.instrument.clone(), quote.clone());
        }
    }

    /// The current step's timestamp, if the market has been advanced at all.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Latest quote for an instrument.
    pub fn quote(&self, instrument: &str) -> Option<&Quote> {
        self.quotes.get(instrument)
    }

    /// Latest price for an instrument.
    pub fn price(&self, instrument: &str) -> Option<f64> {
        self.quotes.get(instrument).map(|q| q.price)
    }

    /// Instruments with at least one quote so far, in deterministic order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(|s| s.as_str())
    }
}
