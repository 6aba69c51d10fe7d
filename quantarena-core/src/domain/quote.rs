//! Quote — one observed price for one instrument at one timestamp.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single market observation. Immutable once produced by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: NaiveDateTime,
    pub instrument: String,
    pub price: f64,
    pub volume: Option<f64>,
}

impl Quote {
    pub fn new(timestamp: NaiveDateTime, instrument: impl Into<String>, price: f64) -> Self {
        Self {
            timestamp,
            instrument: instrument.into(),
            price,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn quote_builder() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let q = Quote::new(ts, "SPY", 400.0).with_volume(1_000_000.0);
        assert_eq!(q.instrument, "SPY");
        assert_eq!(q.price, 400.0);
        assert_eq!(q.volume, Some(1_000_000.0));
    }
}
