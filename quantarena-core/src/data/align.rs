//! Align submitted allocations onto the price grid.

use super::long_format::LongRecord;
use super::pivot::WideTable;
use crate::domain::WeightVector;
use crate::error::DataError;

/// Produce one target weight vector per price timestamp.
///
/// An observed allocation row restates the whole book: every submitted
/// instrument takes the row's value, and instruments the row does not mention
/// go to zero. Forward-fill only bridges price timestamps with no allocation
/// row at all, and weights are zero before the first row. Allocation rows at
/// timestamps outside the price grid are ignored, and allocation instruments
/// the price table does not cover are dropped. If no submitted instrument
/// overlaps the price universe the submission is unusable.
pub fn align_allocations(
    prices: &WideTable,
    allocations: &[LongRecord],
) -> Result<Vec<WeightVector>, DataError> {
    let overlapping: Vec<LongRecord> = allocations
        .iter()
        .filter(|r| prices.instrument_index(&r.instrument).is_some())
        .cloned()
        .collect();
    if overlapping.is_empty() {
        return Err(DataError::DisjointUniverse);
    }

    let alloc_table = WideTable::pivot(&overlapping)?;
    let instruments = alloc_table.instruments().to_vec();
    let mut last_known: Vec<Option<f64>> = vec![None; instruments.len()];

    let mut targets = Vec::with_capacity(prices.num_steps());
    for &timestamp in prices.timestamps() {
        if let Ok(row) = alloc_table.timestamps().binary_search(&timestamp) {
            for (col, slot) in last_known.iter_mut().enumerate() {
                *slot = Some(alloc_table.value(row, col).unwrap_or(0.0));
            }
        }
        let target: WeightVector = instruments
            .iter()
            .zip(&last_known)
            .map(|(instrument, value)| (instrument.clone(), value.unwrap_or(0.0)))
            .collect();
        targets.push(target);
    }
    Ok(targets)
}
