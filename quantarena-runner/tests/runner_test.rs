//! Integration tests for the end-to-end evaluation entry points.

use quantarena_core::result::RunStatus;
use quantarena_core::strategy::{MovingAverageCross, StrategyFactory};
use quantarena_runner::{
    evaluate_callback, evaluate_vectorized, write_record, EvalParams, SubmissionIds,
};

const PRICES: &str = "\
timestamp,instrument,close
2024-01-02,SPY,100.0
2024-01-03,SPY,110.0
2024-01-04,SPY,99.0
";

const SUBMISSION: &str = "\
timestamp,instrument,position_size
2024-01-02,SPY,0.5
2024-01-04,SPY,0.0
";

fn ids() -> SubmissionIds {
    SubmissionIds::new("participant-7", "submission-42")
}

#[test]
fn vectorized_submission_is_scored() {
    let params = EvalParams {
        cost_bps: 10.0,
        ..EvalParams::default()
    };
    let record = evaluate_vectorized(PRICES, SUBMISSION, &ids(), &params).unwrap();

    assert_eq!(record.status, RunStatus::Scored);
    let metrics = record.metrics.unwrap();
    assert!((metrics.total_return - (-0.003025)).abs() < 1e-9);
    assert_eq!(record.nav_curve.len(), 3);
    assert!((record.nav_curve[2].nav - 0.996975).abs() < 1e-12);
    assert!(record.error_log.is_empty());
}

#[test]
fn overleveraged_submission_yields_rejected_record() {
    let prices = "\
timestamp,instrument,close
2024-01-02,SPY,100.0
2024-01-02,QQQ,50.0
2024-01-03,SPY,101.0
2024-01-03,QQQ,51.0
";
    let submission = "\
timestamp,instrument,position_size
2024-01-02,SPY,0.6
2024-01-02,QQQ,0.5
";
    let record = evaluate_vectorized(prices, submission, &ids(), &EvalParams::default()).unwrap();
    assert!(record.status.to_string().starts_with("rejected:ValidationError"));
    assert!(record.metrics.is_none());
    assert!(record.nav_curve.is_empty());
}

#[test]
fn malformed_submission_yields_rejected_record() {
    let submission = "timestamp,instrument,weight\n2024-01-02,SPY,0.5\n";
    let record = evaluate_vectorized(PRICES, submission, &ids(), &EvalParams::default()).unwrap();
    assert!(record.status.to_string().starts_with("rejected:DataError"));
}

#[test]
fn disjoint_universe_yields_rejected_record() {
    let submission = "timestamp,instrument,position_size\n2024-01-02,TLT,0.5\n";
    let record = evaluate_vectorized(PRICES, submission, &ids(), &EvalParams::default()).unwrap();
    assert!(record.status.to_string().starts_with("rejected:DataError"));
}

#[test]
fn malformed_price_data_is_an_operator_error() {
    let prices = "timestamp,instrument\n2024-01-02,SPY\n";
    let result = evaluate_vectorized(prices, SUBMISSION, &ids(), &EvalParams::default());
    assert!(result.is_err());
}

#[test]
fn identical_inputs_produce_identical_record_ids() {
    let params = EvalParams::default();
    let a = evaluate_vectorized(PRICES, SUBMISSION, &ids(), &params).unwrap();
    let b = evaluate_vectorized(PRICES, SUBMISSION, &ids(), &params).unwrap();
    assert_eq!(a.record_id, b.record_id);
    assert_eq!(a.metrics, b.metrics);
}

#[test]
fn tiny_timeout_scores_a_partial_run_as_timeout() {
    let params = EvalParams {
        timeout_seconds: 1e-9,
        ..EvalParams::default()
    };
    let record = evaluate_vectorized(PRICES, SUBMISSION, &ids(), &params).unwrap();
    assert_eq!(record.status, RunStatus::Timeout);
    assert!(record.metrics.is_some());
}

#[test]
fn callback_strategy_runs_end_to_end() {
    let factory: StrategyFactory = Box::new(|universe: &[String]| {
        Box::new(MovingAverageCross::new(universe.to_vec(), 1, 2).unwrap())
    });
    let record = evaluate_callback(PRICES, &factory, &ids(), &EvalParams::default()).unwrap();
    assert_eq!(record.status, RunStatus::Scored);
    assert_eq!(record.nav_curve.len(), 3);
}

#[test]
fn record_is_written_under_its_id() {
    let record = evaluate_vectorized(PRICES, SUBMISSION, &ids(), &EvalParams::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write_record(&record, dir.path()).unwrap();
    let loaded = quantarena_runner::import_json(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(loaded.record_id, record.record_id);
    assert_eq!(loaded.status, record.status);
}
