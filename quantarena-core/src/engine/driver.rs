//! Simulation driver: strictly sequential, one strategy invocation per step.
//!
//! NAV at step t depends on NAV at step t−1 and nothing later, so there is no
//! concurrency inside a run. Cancellation is a single wall-clock deadline
//! checked once per step; on expiry the remaining steps are dropped and the
//! accumulated trajectory is returned flagged, not discarded.

use std::time::{Duration, Instant};

use crate::data::WideTable;
use crate::domain::{MarketSnapshot, Portfolio};
use crate::error::{FaultKind, StepFault, ValidationError};
use crate::strategy::{CallbackStrategy, TargetSchedule};

use super::constraints::validate_targets;
use super::trajectory::{Trajectory, TrajectoryPoint};

pub struct Driver {
    budget: Option<Duration>,
}

impl Driver {
    /// `timeout_seconds <= 0` means unbounded.
    pub fn new(timeout_seconds: f64) -> Self {
        let budget = (timeout_seconds > 0.0).then(|| Duration::from_secs_f64(timeout_seconds));
        Self { budget }
    }

    pub fn unbounded() -> Self {
        Self { budget: None }
    }

    fn deadline(&self) -> Option<Instant> {
        self.budget.map(|b| Instant::now() + b)
    }

    /// Simulate a vectorized submission.
    ///
    /// Every target row is validated before the first step; any leverage
    /// breach rejects the whole submission with no partial score. The NAV
    /// curve is normalized to 1.0 and carries gross (pre-cost) returns; the
    /// metrics layer applies transaction costs. An instrument return that is
    /// undefined for a step (missing price at either endpoint) contributes
    /// zero and is logged as a non-fatal fault.
    pub fn run_vectorized(
        &self,
        prices: &WideTable,
        schedule: &TargetSchedule,
    ) -> Result<Trajectory, ValidationError> {
        validate_targets(prices.timestamps(), schedule.targets())?;

        let deadline = self.deadline();
        let steps = prices.num_steps().min(schedule.len());
        let mut trajectory = Trajectory::default();
        let mut nav = 1.0;

        for step in 0..steps {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                trajectory.timed_out = true;
                break;
            }
            let timestamp = prices.timestamps()[step];

            if let Some(held) = schedule.held(step) {
                let mut step_return = 0.0;
                for (instrument, weight) in held.iter() {
                    if weight == 0.0 {
                        continue;
                    }
                    let instrument_return = prices
                        .instrument_index(instrument)
                        .and_then(|i| prices.step_return(step, i));
                    match instrument_return {
                        Some(r) => step_return += weight * r,
                        None => trajectory.faults.push(StepFault::new(
                            timestamp,
                            FaultKind::MissingPrice,
                            format!("return for '{instrument}' undefined at this step"),
                        )),
                    }
                }
                nav *= 1.0 + step_return;
            }

            trajectory.points.push(TrajectoryPoint {
                timestamp,
                nav,
                weights: schedule.target(step).clone(),
            });
        }
        Ok(trajectory)
    }

    /// Simulate a callback submission against the price table.
    ///
    /// A failing hook aborts only its own step: the step's trades are rolled
    /// back, the fault is logged with the step's timestamp, and the run
    /// continues. Trade rejections recorded by the portfolio are drained into
    /// the fault log every step.
    pub fn run_callback(
        &self,
        prices: &WideTable,
        strategy: &mut dyn CallbackStrategy,
        initial_capital: f64,
    ) -> Trajectory {
        let deadline = self.deadline();
        let mut market = MarketSnapshot::new();
        let mut portfolio = Portfolio::new(initial_capital);
        let mut trajectory = Trajectory::default();

        for step in 0..prices.num_steps() {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                trajectory.timed_out = true;
                break;
            }
            let timestamp = prices.timestamps()[step];
            market.advance(timestamp, &prices.row_quotes(step));

            portfolio.begin_step();
            let outcome = strategy.on_step(&market, &mut portfolio);
            trajectory.faults.extend(portfolio.take_faults());
            if let Err(error) = outcome {
                portfolio.rollback_step();
                trajectory.faults.push(StepFault::new(
                    timestamp,
                    FaultKind::StrategyRuntime,
                    error.to_string(),
                ));
            }

            portfolio.record_nav(timestamp, &market);
            trajectory.points.push(TrajectoryPoint {
                timestamp,
                nav: portfolio.nav(&market),
                weights: portfolio.weights(&market),
            });
        }
        trajectory
    }
}
