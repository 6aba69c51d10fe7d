//! End-to-end evaluation — wires together data loading, the driver, metrics,
//! and record assembly.
//!
//! Error routing follows who is at fault:
//! - Malformed *price* data is an operator problem and surfaces as `Err`.
//! - A malformed or constraint-violating *submission* is the participant's
//!   problem and yields a `rejected:<reason>` record, never an `Err`.

use thiserror::Error;

use quantarena_core::data::{align_allocations, read_long_csv, read_price_csv, WideTable};
use quantarena_core::engine::Driver;
use quantarena_core::error::DataError;
use quantarena_core::result::SimulationResult;
use quantarena_core::strategy::{StrategyFactory, TargetSchedule};

use crate::params::EvalParams;
use crate::record::{EvaluationRecord, SubmissionIds};

/// Operator-side failures. Participant-side failures become rejections.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("price data error: {0}")]
    PriceData(#[source] DataError),
}

fn load_prices(price_csv: &str) -> Result<WideTable, RunError> {
    let quotes = read_price_csv(price_csv.as_bytes()).map_err(RunError::PriceData)?;
    WideTable::pivot_quotes(&quotes).map_err(RunError::PriceData)
}

/// Score a vectorized submission (long-format `position_size` rows).
pub fn evaluate_vectorized(
    price_csv: &str,
    submission_csv: &str,
    ids: &SubmissionIds,
    params: &EvalParams,
) -> Result<EvaluationRecord, RunError> {
    tracing::info!(
        participant = %ids.participant_id,
        submission = %ids.submission_id,
        "starting vectorized evaluation"
    );
    let prices = load_prices(price_csv)?;

    let allocations = match read_long_csv(submission_csv.as_bytes(), "position_size") {
        Ok(records) => records,
        Err(error) => return Ok(reject(ids, format!("DataError: {error}"))),
    };
    let targets = match align_allocations(&prices, &allocations) {
        Ok(targets) => targets,
        Err(error) => return Ok(reject(ids, format!("DataError: {error}"))),
    };

    let driver = Driver::new(params.timeout_seconds);
    let trajectory = match driver.run_vectorized(&prices, &TargetSchedule::new(targets)) {
        Ok(trajectory) => trajectory,
        Err(error) => return Ok(reject(ids, format!("ValidationError: {error}"))),
    };

    let result = SimulationResult::scored(trajectory, &params.metric_params());
    Ok(finish(ids, result))
}

/// Score a callback submission built from its factory entry point.
pub fn evaluate_callback(
    price_csv: &str,
    factory: &StrategyFactory,
    ids: &SubmissionIds,
    params: &EvalParams,
) -> Result<EvaluationRecord, RunError> {
    tracing::info!(
        participant = %ids.participant_id,
        submission = %ids.submission_id,
        "starting callback evaluation"
    );
    let prices = load_prices(price_csv)?;

    let mut strategy = factory(prices.instruments());
    let driver = Driver::new(params.timeout_seconds);
    let trajectory = driver.run_callback(&prices, strategy.as_mut(), params.initial_capital);

    let result = SimulationResult::scored(trajectory, &params.metric_params());
    Ok(finish(ids, result))
}

fn reject(ids: &SubmissionIds, reason: String) -> EvaluationRecord {
    tracing::warn!(
        participant = %ids.participant_id,
        submission = %ids.submission_id,
        %reason,
        "submission rejected"
    );
    EvaluationRecord::new(ids, SimulationResult::rejected(reason))
}

fn finish(ids: &SubmissionIds, result: SimulationResult) -> EvaluationRecord {
    for fault in &result.faults {
        tracing::warn!(
            timestamp = %fault.timestamp,
            kind = ?fault.kind,
            message = %fault.message,
            "non-fatal step fault"
        );
    }
    tracing::info!(
        participant = %ids.participant_id,
        submission = %ids.submission_id,
        status = %result.status,
        steps = result.nav_curve.len(),
        "evaluation complete"
    );
    EvaluationRecord::new(ids, result)
}
