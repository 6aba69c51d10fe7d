//! Error taxonomy for the evaluation engine.
//!
//! Two fatal families abort a run with no score:
//! - [`DataError`] — malformed or missing input schema
//! - [`ValidationError`] — submission-wide constraint violation
//!
//! Non-fatal faults never interrupt the step sequence; they accumulate as
//! [`StepFault`] entries in the result's error log so a participant can debug
//! a completed-with-errors run without resubmitting blindly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed or missing input data. Fatal: no score is produced.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: unparseable timestamp '{value}'")]
    BadTimestamp { line: usize, value: String },

    #[error("line {line}: unparseable number '{value}' in column '{column}'")]
    BadNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("duplicate record for ({timestamp}, {instrument})")]
    DuplicateRecord {
        timestamp: NaiveDateTime,
        instrument: String,
    },

    #[error("input contains no records")]
    Empty,

    #[error("submission universe shares no instruments with the price universe")]
    DisjointUniverse,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Submission-wide constraint violation. Fatal: the whole submission is
/// rejected with no partial score.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("leverage breach at {timestamp}: gross exposure {gross:.4} exceeds 1.0")]
    LeverageBreach {
        timestamp: NaiveDateTime,
        gross: f64,
    },

    #[error("position size {value:.4} for '{instrument}' at {timestamp} outside [-1.0, 1.0]")]
    WeightOutOfRange {
        timestamp: NaiveDateTime,
        instrument: String,
        value: f64,
    },
}

/// Fatal run-aborting errors.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Error raised by a strategy inside a per-step invocation.
///
/// Non-fatal: the driver records it against the step's timestamp, rolls back
/// the step's trades, and continues.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for StrategyError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for StrategyError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Category of a non-fatal per-step fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The strategy's per-step hook returned an error.
    StrategyRuntime,
    /// An `enter` call was rejected without state change.
    ConstraintViolation,
    /// An instrument's return was undefined for a step (missing price).
    MissingPrice,
}

/// One entry in the ordered non-fatal error log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFault {
    pub timestamp: NaiveDateTime,
    pub kind: FaultKind,
    pub message: String,
}

impl StepFault {
    pub fn new(timestamp: NaiveDateTime, kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            message: message.into(),
        }
    }
}
