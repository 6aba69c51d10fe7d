//! Callback-style submissions: a per-step hook driving the portfolio directly.

use crate::domain::{MarketSnapshot, Portfolio, Spot};
use crate::error::StrategyError;
use std::collections::BTreeMap;

/// A strategy invoked once per price timestamp.
///
/// The hook observes the market and places trades through the portfolio. An
/// `Err` aborts only the current step: the driver rolls back the step's trades
/// and continues with the next timestamp.
pub trait CallbackStrategy {
    fn on_step(
        &mut self,
        market: &MarketSnapshot,
        portfolio: &mut Portfolio,
    ) -> Result<(), StrategyError>;
}

/// Entry point of a callback submission: builds the strategy instance from the
/// traded-instrument universe.
pub type StrategyFactory = Box<dyn Fn(&[String]) -> Box<dyn CallbackStrategy>>;

/// Simple moving-average crossover, the built-in demo strategy.
///
/// Splits capital equally across the universe. Goes long an instrument when
/// the fast average crosses above the slow one, flat when it crosses below.
pub struct MovingAverageCross {
    universe: Vec<String>,
    fast: usize,
    slow: usize,
    history: BTreeMap<String, Vec<f64>>,
}

impl MovingAverageCross {
    /// Windows come from user input, so degenerate values are an error, not
    /// a panic: `fast` must be non-zero and strictly shorter than `slow`.
    pub fn new(universe: Vec<String>, fast: usize, slow: usize) -> Result<Self, StrategyError> {
        if fast == 0 || fast >= slow {
            return Err(StrategyError::new(format!(
                "fast window ({fast}) must be non-zero and shorter than the slow window ({slow})"
            )));
        }
        Ok(Self {
            universe,
            fast,
            slow,
            history: BTreeMap::new(),
        })
    }

    fn mean_of_last(history: &[f64], window: usize) -> f64 {
        let tail = &history[history.len() - window..];
        tail.iter().sum::<f64>() / window as f64
    }
}

impl CallbackStrategy for MovingAverageCross {
    fn on_step(
        &mut self,
        market: &MarketSnapshot,
        portfolio: &mut Portfolio,
    ) -> Result<(), StrategyError> {
        let slot = 1.0 / self.universe.len().max(1) as f64;

        for instrument in &self.universe {
            let price = match market.price(instrument) {
                Some(p) => p,
                None => continue,
            };
            let history = self.history.entry(instrument.clone()).or_default();
            history.push(price);
            if history.len() < self.slow {
                continue;
            }

            let fast = Self::mean_of_last(history, self.fast);
            let slow = Self::mean_of_last(history, self.slow);
            let holding = portfolio.has_position(instrument);

            if fast > slow && !holding {
                let quantity = portfolio.nav(market) * slot / price;
                // A rejection (funds, leverage) is logged by the portfolio;
                // the crossover simply waits for the next signal.
                let _ = portfolio.enter(market, Box::new(Spot::new(instrument.clone())), quantity);
            } else if fast < slow && holding {
                let _ = portfolio.exit(market, instrument);
            }
        }
        Ok(())
    }
}
