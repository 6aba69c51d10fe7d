//! Pivot long-format records into a dense (timestamp × instrument) table.

use super::long_format::LongRecord;
use crate::domain::Quote;
use crate::error::DataError;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Dense table with sorted, de-duplicated timestamp rows and instrument
/// columns. Cells a long-format input never mentioned are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    timestamps: Vec<NaiveDateTime>,
    instruments: Vec<String>,
    // Row-major: values[t * instruments.len() + i].
    values: Vec<Option<f64>>,
}

impl WideTable {
    /// Pivot long records. Two records for the same (timestamp, instrument)
    /// cell are an input error, not a silent overwrite.
    pub fn pivot(records: &[LongRecord]) -> Result<Self, DataError> {
        if records.is_empty() {
            return Err(DataError::Empty);
        }

        let timestamps: Vec<NaiveDateTime> = records
            .iter()
            .map(|r| r.timestamp)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let instruments: Vec<String> = records
            .iter()
            .map(|r| r.instrument.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let width = instruments.len();
        let mut values = vec![None; timestamps.len() * width];
        for record in records {
            let row = timestamps.binary_search(&record.timestamp).expect("known timestamp");
            let col = instruments
                .binary_search(&record.instrument)
                .expect("known instrument");
            let cell = &mut values[row * width + col];
            if cell.is_some() {
                return Err(DataError::DuplicateRecord {
                    timestamp: record.timestamp,
                    instrument: record.instrument.clone(),
                });
            }
            *cell = Some(record.value);
        }

        Ok(Self {
            timestamps,
            instruments,
            values,
        })
    }

    /// Pivot price quotes into a close-price table.
    pub fn pivot_quotes(quotes: &[Quote]) -> Result<Self, DataError> {
        let records: Vec<LongRecord> = quotes
            .iter()
            .map(|q| LongRecord {
                timestamp: q.timestamp,
                instrument: q.instrument.clone(),
                value: q.price,
            })
            .collect();
        Self::pivot(&records)
    }

    pub fn num_steps(&self) -> usize {
        self.timestamps.len()
    }

    pub fn num_instruments(&self) -> usize {
        self.instruments.len()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn instrument_index(&self, instrument: &str) -> Option<usize> {
        self.instruments
            .binary_search_by(|probe| probe.as_str().cmp(instrument))
            .ok()
    }

    pub fn value(&self, step: usize, instrument_index: usize) -> Option<f64> {
        self.values[step * self.instruments.len() + instrument_index]
    }

    pub fn get(&self, step: usize, instrument: &str) -> Option<f64> {
        self.instrument_index(instrument)
            .and_then(|i| self.value(step, i))
    }

    /// Simple return of one instrument over `step-1 → step`, when both
    /// endpoints are priced.
    pub fn step_return(&self, step: usize, instrument_index: usize) -> Option<f64> {
        if step == 0 {
            return None;
        }
        let prev = self.value(step - 1, instrument_index)?;
        let curr = self.value(step, instrument_index)?;
        if prev.abs() < f64::EPSILON {
            return None;
        }
        Some(curr / prev - 1.0)
    }

    /// Quotes present in one row, for feeding a market snapshot.
    pub fn row_quotes(&self, step: usize) -> Vec<Quote> {
        let timestamp = self.timestamps[step];
        self.instruments
            .iter()
            .enumerate()
            .filter_map(|(i, instrument)| {
                self.value(step, i)
                    .map(|price| Quote::new(timestamp, instrument.clone(), price))
            })
            .collect()
    }

    /// Flatten back to long format, skipping empty cells. Output is sorted by
    /// (timestamp, instrument).
    pub fn to_long(&self) -> Vec<LongRecord> {
        let mut records = Vec::new();
        for (row, &timestamp) in self.timestamps.iter().enumerate() {
            for (col, instrument) in self.instruments.iter().enumerate() {
                if let Some(value) = self.value(row, col) {
                    records.push(LongRecord {
                        timestamp,
                        instrument: instrument.clone(),
                        value,
                    });
                }
            }
        }
        records
    }
}
