//! QuantArena Core — the backtest evaluation engine.
//!
//! Scores trading-competition submissions by simulating them against withheld
//! price history:
//! - Domain types (quotes, market snapshot, portfolio, weight vectors)
//! - Long-format CSV ingestion, pivoting, allocation alignment
//! - Two strategy shapes (per-step callback, vectorized targets) normalized
//!   into one trajectory representation
//! - Strictly sequential simulation driver with per-step fault isolation and
//!   a single wall-clock deadline
//! - No-leverage constraint validation
//! - Risk-adjusted metrics (Sharpe as the ranking metric) net of transaction
//!   costs

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod result;
pub mod strategy;
