//! WeightVector — signed fractions of portfolio value per instrument.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping instrument → signed fraction of portfolio value.
///
/// Backed by a `BTreeMap` so iteration order (and everything derived from it)
/// is deterministic. Weights of exactly zero are still stored; turnover
/// computation walks the key union of two vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(BTreeMap<String, f64>);

impl WeightVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, instrument: impl Into<String>, weight: f64) {
        self.0.insert(instrument.into(), weight);
    }

    pub fn get(&self, instrument: &str) -> f64 {
        self.0.get(instrument).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gross exposure: Σ|w_i|.
    pub fn gross(&self) -> f64 {
        self.0.values().map(|w| w.abs()).sum()
    }

    /// Turnover against a previous vector: Σ|w_i − prev_i| over the key union.
    pub fn turnover(&self, prev: &WeightVector) -> f64 {
        let mut total = 0.0;
        for (instrument, weight) in self.iter() {
            total += (weight - prev.get(instrument)).abs();
        }
        for (instrument, prev_weight) in prev.iter() {
            if !self.0.contains_key(instrument) {
                total += prev_weight.abs();
            }
        }
        total
    }
}

impl FromIterator<(String, f64)> for WeightVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
