//! QuantArena Runner — evaluation orchestration around the core engine.
//!
//! This crate builds on `quantarena-core` to provide:
//! - Externally supplied evaluation parameters (TOML-loadable)
//! - End-to-end scoring of vectorized and callback submissions
//! - The outward-facing evaluation record with a content-hash id
//! - JSON export for the persistence collaborator

pub mod export;
pub mod params;
pub mod record;
pub mod runner;

pub use export::{export_json, import_json, write_record};
pub use params::{EvalParams, ParamsError};
pub use record::{EvaluationRecord, SubmissionIds};
pub use runner::{evaluate_callback, evaluate_vectorized, RunError};
