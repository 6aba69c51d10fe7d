//! JSON export of evaluation records.
//!
//! One file per record, named by its content hash, so re-evaluating identical
//! inputs overwrites the same artifact instead of accumulating duplicates.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::record::EvaluationRecord;

/// Serialize a record to pretty JSON.
pub fn export_json(record: &EvaluationRecord) -> Result<String> {
    serde_json::to_string_pretty(record).context("failed to serialize EvaluationRecord to JSON")
}

/// Deserialize a record from JSON.
pub fn import_json(json: &str) -> Result<EvaluationRecord> {
    serde_json::from_str(json).context("failed to deserialize EvaluationRecord from JSON")
}

/// Write a record as `<record_id>.json` under `dir`, creating the directory
/// if needed. Returns the written path.
pub fn write_record(record: &EvaluationRecord, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("{}.json", record.record_id));
    std::fs::write(&path, export_json(record)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
