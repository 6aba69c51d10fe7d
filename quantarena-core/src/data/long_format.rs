//! Long-format CSV ingestion.
//!
//! Both price history and vectorized submissions arrive as long-format rows:
//! one row per (timestamp, instrument, value). The instrument column may be
//! headed `instrument` or `ticker`; timestamps accept RFC 3339, ISO
//! date-times, or bare dates.

use crate::domain::Quote;
use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;

/// One long-format record.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub timestamp: NaiveDateTime,
    pub instrument: String,
    pub value: f64,
}

/// Parse a timestamp in any accepted format.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

struct Columns {
    timestamp: usize,
    instrument: usize,
    value: usize,
    volume: Option<usize>,
}

fn resolve_columns(
    headers: &csv::StringRecord,
    value_column: &str,
) -> Result<Columns, DataError> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let timestamp = find("timestamp")
        .ok_or_else(|| DataError::MissingColumn("timestamp".into()))?;
    let instrument = find("instrument")
        .or_else(|| find("ticker"))
        .ok_or_else(|| DataError::MissingColumn("instrument".into()))?;
    let value = find(value_column)
        .ok_or_else(|| DataError::MissingColumn(value_column.into()))?;

    Ok(Columns {
        timestamp,
        instrument,
        value,
        volume: find("volume"),
    })
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    line: usize,
) -> Result<f64, DataError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| DataError::BadNumber {
        line,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Read long-format records, taking values from `value_column`.
pub fn read_long_csv<R: Read>(reader: R, value_column: &str) -> Result<Vec<LongRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = resolve_columns(csv_reader.headers()?, value_column)?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = row + 2; // 1-based, after the header

        let raw_ts = record.get(columns.timestamp).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::BadTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;
        let instrument = record.get(columns.instrument).unwrap_or("").to_string();
        let value = parse_field(&record, columns.value, value_column, line)?;

        records.push(LongRecord {
            timestamp,
            instrument,
            value,
        });
    }

    if records.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(records)
}

/// Read a long-format price file into quotes (`close` column, optional
/// `volume`).
pub fn read_price_csv<R: Read>(reader: R) -> Result<Vec<Quote>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = resolve_columns(csv_reader.headers()?, "close")?;

    let mut quotes = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = row + 2;

        let raw_ts = record.get(columns.timestamp).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::BadTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;
        let instrument = record.get(columns.instrument).unwrap_or("").to_string();
        let price = parse_field(&record, columns.value, "close", line)?;

        let mut quote = Quote::new(timestamp, instrument, price);
        if let Some(vol_idx) = columns.volume {
            let raw = record.get(vol_idx).unwrap_or("").trim();
            if !raw.is_empty() {
                quote.volume = Some(parse_field(&record, vol_idx, "volume", line)?);
            }
        }
        quotes.push(quote);
    }

    if quotes.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(quotes)
}
