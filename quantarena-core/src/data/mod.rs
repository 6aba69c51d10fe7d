//! Data ingestion: long-format CSV parsing, pivoting, allocation alignment.

pub mod align;
pub mod long_format;
pub mod pivot;

pub use align::align_allocations;
pub use long_format::{parse_timestamp, read_long_csv, read_price_csv, LongRecord};
pub use pivot::WideTable;
