//! End-to-end engine tests: CSV in, scored result out.
//!
//! Covers the three concrete scenarios:
//! 1. Single instrument with a mid-run rebalance and transaction costs
//! 2. A leverage-violating vectorized submission is rejected outright
//! 3. A callback strategy failing on one of five steps still scores fully

use quantarena_core::data::{align_allocations, read_long_csv, read_price_csv, WideTable};
use quantarena_core::domain::{MarketSnapshot, Portfolio};
use quantarena_core::engine::Driver;
use quantarena_core::error::{FaultKind, StrategyError, ValidationError};
use quantarena_core::metrics::MetricParams;
use quantarena_core::result::{RunStatus, SimulationResult};
use quantarena_core::strategy::{CallbackStrategy, TargetSchedule};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn price_table(csv: &str) -> WideTable {
    let quotes = read_price_csv(csv.as_bytes()).unwrap();
    WideTable::pivot_quotes(&quotes).unwrap()
}

fn schedule_from_csv(prices: &WideTable, csv: &str) -> TargetSchedule {
    let records = read_long_csv(csv.as_bytes(), "position_size").unwrap();
    TargetSchedule::new(align_allocations(prices, &records).unwrap())
}

// ──────────────────────────────────────────────
// Scenario 1: costs and the one-step lag
// ──────────────────────────────────────────────

#[test]
fn single_instrument_rebalance_with_costs() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-03,SPY,110.0\n\
         2024-01-04,SPY,99.0\n",
    );
    let schedule = schedule_from_csv(
        &prices,
        "timestamp,instrument,position_size\n\
         2024-01-02,SPY,0.5\n\
         2024-01-04,SPY,0.0\n",
    );

    let trajectory = Driver::unbounded().run_vectorized(&prices, &schedule).unwrap();
    let params = MetricParams {
        cost_bps: 10.0,
        risk_free_rate: 0.02,
        annualization: 252.0,
    };
    let result = SimulationResult::scored(trajectory, &params);

    assert_eq!(result.status, RunStatus::Scored);
    let nav: Vec<f64> = result.nav_curve.iter().map(|p| p.nav).collect();
    assert_eq!(nav.len(), 3);
    assert!((nav[0] - 1.0).abs() < 1e-12);
    assert!((nav[1] - 1.05).abs() < 1e-12);
    assert!((nav[2] - 0.996975).abs() < 1e-12);

    let metrics = result.metrics.unwrap();
    assert!((metrics.total_return - (-0.003025)).abs() < 1e-9);
    assert!((metrics.turnover_total - 0.5).abs() < 1e-12);
}

// ──────────────────────────────────────────────
// Scenario 2: fatal leverage breach
// ──────────────────────────────────────────────

#[test]
fn overleveraged_submission_is_rejected_without_metrics() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-02,QQQ,50.0\n\
         2024-01-03,SPY,101.0\n\
         2024-01-03,QQQ,51.0\n",
    );
    let schedule = schedule_from_csv(
        &prices,
        "timestamp,instrument,position_size\n\
         2024-01-02,SPY,0.5\n\
         2024-01-03,SPY,0.6\n\
         2024-01-03,QQQ,-0.5\n",
    );

    let err = Driver::unbounded()
        .run_vectorized(&prices, &schedule)
        .unwrap_err();
    assert!(matches!(err, ValidationError::LeverageBreach { .. }));

    // The runner turns the fatal error into a participant-visible rejection.
    let result = SimulationResult::rejected(format!("ValidationError: {err}"));
    assert!(result.status.to_string().starts_with("rejected:ValidationError"));
    assert!(result.metrics.is_none());
    assert!(result.nav_curve.is_empty());
}

// ──────────────────────────────────────────────
// Scenario 3: per-step fault isolation
// ──────────────────────────────────────────────

struct FailsOnceAtStep {
    fail_at: usize,
    step: usize,
}

impl CallbackStrategy for FailsOnceAtStep {
    fn on_step(
        &mut self,
        _market: &MarketSnapshot,
        _portfolio: &mut Portfolio,
    ) -> Result<(), StrategyError> {
        self.step += 1;
        if self.step == self.fail_at {
            return Err(StrategyError::new("deliberate failure"));
        }
        Ok(())
    }
}

#[test]
fn one_failing_step_out_of_five_still_scores_all_five() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-03,SPY,101.0\n\
         2024-01-04,SPY,102.0\n\
         2024-01-05,SPY,103.0\n\
         2024-01-08,SPY,104.0\n",
    );
    let mut strategy = FailsOnceAtStep { fail_at: 3, step: 0 };
    let trajectory = Driver::unbounded().run_callback(&prices, &mut strategy, 1_000_000.0);

    assert_eq!(trajectory.len(), 5);
    assert_eq!(trajectory.faults.len(), 1);
    assert_eq!(trajectory.faults[0].kind, FaultKind::StrategyRuntime);
    assert_eq!(trajectory.faults[0].timestamp, prices.timestamps()[2]);

    let result = SimulationResult::scored(trajectory, &MetricParams::default());
    assert_eq!(result.status, RunStatus::Scored);
    assert_eq!(result.nav_curve.len(), 5);
    assert_eq!(result.faults.len(), 1);
    assert!(result.metrics.is_some());
}

// ──────────────────────────────────────────────
// Trajectory length, zero-std, timeout, determinism
// ──────────────────────────────────────────────

#[test]
fn nav_curve_length_matches_processed_steps() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-03,SPY,101.0\n\
         2024-01-04,SPY,102.0\n",
    );
    let schedule = schedule_from_csv(
        &prices,
        "timestamp,instrument,position_size\n2024-01-02,SPY,1.0\n",
    );
    let trajectory = Driver::unbounded().run_vectorized(&prices, &schedule).unwrap();
    assert_eq!(trajectory.len(), prices.num_steps());
}

#[test]
fn constant_zero_weight_scores_all_zero_metrics() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-03,SPY,110.0\n\
         2024-01-04,SPY,90.0\n",
    );
    let schedule = schedule_from_csv(
        &prices,
        "timestamp,instrument,position_size\n2024-01-02,SPY,0.0\n",
    );
    let trajectory = Driver::unbounded().run_vectorized(&prices, &schedule).unwrap();
    let result = SimulationResult::scored(trajectory, &MetricParams::default());

    let metrics = result.metrics.unwrap();
    assert_eq!(metrics.sharpe, 0.0);
    assert_eq!(metrics.total_return, 0.0);
    assert_eq!(metrics.max_drawdown, 0.0);
    assert_eq!(metrics.turnover_total, 0.0);
}

#[test]
fn expired_deadline_yields_timeout_status() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-03,SPY,101.0\n",
    );
    let schedule = schedule_from_csv(
        &prices,
        "timestamp,instrument,position_size\n2024-01-02,SPY,0.5\n",
    );
    let trajectory = Driver::new(1e-9).run_vectorized(&prices, &schedule).unwrap();
    assert!(trajectory.timed_out);

    let result = SimulationResult::scored(trajectory, &MetricParams::default());
    assert_eq!(result.status, RunStatus::Timeout);
    assert!(result.metrics.is_some());
}

#[test]
fn identical_inputs_score_identically() {
    let prices = price_table(
        "timestamp,instrument,close\n\
         2024-01-02,SPY,100.0\n\
         2024-01-02,QQQ,50.0\n\
         2024-01-03,SPY,104.0\n\
         2024-01-03,QQQ,49.0\n\
         2024-01-04,SPY,102.0\n\
         2024-01-04,QQQ,52.0\n",
    );
    let submission = "timestamp,instrument,position_size\n\
                      2024-01-02,SPY,0.4\n\
                      2024-01-02,QQQ,-0.3\n\
                      2024-01-04,SPY,0.1\n";

    let run = || {
        let schedule = schedule_from_csv(&prices, submission);
        let trajectory = Driver::unbounded().run_vectorized(&prices, &schedule).unwrap();
        SimulationResult::scored(trajectory, &MetricParams::default())
    };
    let first = run();
    let second = run();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
