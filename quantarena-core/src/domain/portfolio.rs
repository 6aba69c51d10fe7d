//! Portfolio — cash, open positions, NAV history, and the per-step journal.
//!
//! The accounting identity holds at every step:
//! `NAV == cash + Σ(position.quantity × present_value(instrument))`.
//!
//! Trades applied during a step are journaled so the driver can roll the
//! step back when the strategy's hook fails — a failed step's trades simply
//! do not happen.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::market::MarketSnapshot;
use super::position::Position;
use super::valuation::Valuation;
use super::weights::WeightVector;
use crate::engine::constraints::{LEVERAGE_EPSILON, LEVERAGE_LIMIT};
use crate::error::{FaultKind, StepFault};

/// Why a trade was refused. Non-fatal: no state change, run continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeRejection {
    #[error("no market price for '{0}'")]
    Unpriceable(String),

    #[error("insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("trade would raise gross exposure to {gross:.4}, above the 1.0 limit")]
    LeverageBreach { gross: f64 },

    #[error("no open position for '{0}'")]
    PositionNotFound(String),
}

/// One executed trade, kept for the participant-visible trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLogEntry {
    pub timestamp: NaiveDateTime,
    pub instrument: String,
    /// Signed fill quantity; exits log the full closed quantity, negated.
    pub quantity: f64,
    pub price: f64,
}

/// One point of the ordered NAV history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub timestamp: NaiveDateTime,
    pub nav: f64,
}

/// Reversible record of a trade applied within the current step.
enum Applied {
    Entered {
        instrument: String,
        quantity: f64,
        notional: f64,
        /// Cost basis before the merge; `None` when the position was new.
        prev_cost_basis: Option<f64>,
    },
    Exited {
        position: Position,
        proceeds: f64,
    },
}

/// The simulated book for callback-mode evaluation.
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    positions: BTreeMap<String, Position>,
    nav_history: Vec<NavPoint>,
    trade_log: Vec<TradeLogEntry>,
    journal: Vec<Applied>,
    faults: Vec<StepFault>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
            nav_history: Vec::new(),
            trade_log: Vec::new(),
            journal: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Net asset value: cash + Σ position mark-to-market.
    pub fn nav(&self, market: &MarketSnapshot) -> f64 {
        let positions_mtm: f64 = self
            .positions
            .values()
            .map(|p| p.mark_to_market(market))
            .sum();
        self.cash + positions_mtm
    }

    pub fn position(&self, instrument: &str) -> Option<&Position> {
        self.positions.get(instrument).filter(|p| !p.is_flat())
    }

    pub fn has_position(&self, instrument: &str) -> bool {
        self.position(instrument).is_some()
    }

    /// Current per-instrument weights: mark-to-market value over NAV.
    pub fn weights(&self, market: &MarketSnapshot) -> WeightVector {
        let nav = self.nav(market);
        if nav <= 0.0 {
            return WeightVector::new();
        }
        self.positions
            .values()
            .filter(|p| !p.is_flat())
            .map(|p| (p.instrument_id().to_string(), p.mark_to_market(market) / nav))
            .collect()
    }

    /// Gross exposure Σ|weight| at current marks.
    pub fn gross_exposure(&self, market: &MarketSnapshot) -> f64 {
        self.weights(market).gross()
    }

    /// Open a position (or add to an existing one) at fair value.
    ///
    /// Rejected — with no state change and a `ConstraintViolation` recorded —
    /// when the instrument cannot be priced, when cash cannot cover the
    /// notional, or when the trade would push gross exposure past 1.0.
    pub fn enter(
        &mut self,
        market: &MarketSnapshot,
        product: Box<dyn Valuation>,
        quantity: f64,
    ) -> Result<(), TradeRejection> {
        let instrument = product.instrument_id().to_string();
        let price = match product.present_value(market) {
            Some(p) => p,
            None => {
                return Err(self.reject(market, TradeRejection::Unpriceable(instrument)));
            }
        };
        let notional = price * quantity;

        if self.cash < notional {
            return Err(self.reject(
                market,
                TradeRejection::InsufficientFunds {
                    needed: notional,
                    available: self.cash,
                },
            ));
        }

        // Leverage check at post-trade marks. The trade swaps cash for a
        // position at fair value, so NAV itself is unchanged.
        let nav = self.nav(market);
        if nav <= 0.0 {
            return Err(self.reject(market, TradeRejection::LeverageBreach { gross: f64::INFINITY }));
        }
        let existing_qty = self.positions.get(&instrument).map_or(0.0, |p| p.quantity);
        let others: f64 = self
            .positions
            .values()
            .filter(|p| p.instrument_id() != instrument)
            .map(|p| p.mark_to_market(market).abs())
            .sum();
        let gross = (others + ((existing_qty + quantity) * price).abs()) / nav;
        if gross > LEVERAGE_LIMIT + LEVERAGE_EPSILON {
            return Err(self.reject(market, TradeRejection::LeverageBreach { gross }));
        }

        // Apply.
        self.cash -= notional;
        let prev_cost_basis = match self.positions.get_mut(&instrument) {
            Some(existing) => {
                let prev = existing.cost_basis;
                existing.rebalance(price, quantity);
                Some(prev)
            }
            None => {
                self.positions
                    .insert(instrument.clone(), Position::new(product, quantity, price));
                None
            }
        };
        self.journal.push(Applied::Entered {
            instrument: instrument.clone(),
            quantity,
            notional,
            prev_cost_basis,
        });
        self.trade_log.push(TradeLogEntry {
            timestamp: market.timestamp().unwrap_or(NaiveDateTime::MIN),
            instrument,
            quantity,
            price,
        });
        Ok(())
    }

    /// Close a position entirely at mark-to-market. Always succeeds when the
    /// position exists.
    pub fn exit(
        &mut self,
        market: &MarketSnapshot,
        instrument: &str,
    ) -> Result<(), TradeRejection> {
        let position = self
            .positions
            .remove(instrument)
            .ok_or_else(|| TradeRejection::PositionNotFound(instrument.to_string()))?;
        let proceeds = position.mark_to_market(market);
        self.cash += proceeds;
        self.trade_log.push(TradeLogEntry {
            timestamp: market.timestamp().unwrap_or(NaiveDateTime::MIN),
            instrument: instrument.to_string(),
            quantity: -position.quantity,
            price: if position.quantity.abs() > f64::EPSILON {
                proceeds / position.quantity
            } else {
                0.0
            },
        });
        self.journal.push(Applied::Exited { position, proceeds });
        Ok(())
    }

    /// Record the end-of-step NAV. Called once per step by the driver,
    /// whether or not any trade occurred or failed.
    pub(crate) fn record_nav(&mut self, timestamp: NaiveDateTime, market: &MarketSnapshot) {
        let nav = self.nav(market);
        self.nav_history.push(NavPoint { timestamp, nav });
    }

    pub fn nav_history(&self) -> &[NavPoint] {
        &self.nav_history
    }

    pub fn trade_log(&self) -> &[TradeLogEntry] {
        &self.trade_log
    }

    /// Start a fresh step: trades applied from here on can be rolled back.
    pub(crate) fn begin_step(&mut self) {
        self.journal.clear();
    }

    /// Undo every trade applied since `begin_step`, newest first.
    pub(crate) fn rollback_step(&mut self) {
        while let Some(applied) = self.journal.pop() {
            match applied {
                Applied::Entered {
                    instrument,
                    quantity,
                    notional,
                    prev_cost_basis,
                } => {
                    self.cash += notional;
                    self.trade_log.pop();
                    match prev_cost_basis {
                        Some(basis) => {
                            if let Some(pos) = self.positions.get_mut(&instrument) {
                                pos.quantity -= quantity;
                                pos.cost_basis = basis;
                            }
                        }
                        None => {
                            self.positions.remove(&instrument);
                        }
                    }
                }
                Applied::Exited { position, proceeds } => {
                    self.cash -= proceeds;
                    self.trade_log.pop();
                    self.positions
                        .insert(position.instrument_id().to_string(), position);
                }
            }
        }
    }

    /// Drain faults recorded since the last drain (rejected trades).
    pub(crate) fn take_faults(&mut self) -> Vec<StepFault> {
        std::mem::take(&mut self.faults)
    }

    fn reject(&mut self, market: &MarketSnapshot, rejection: TradeRejection) -> TradeRejection {
        self.faults.push(StepFault::new(
            market.timestamp().unwrap_or(NaiveDateTime::MIN),
            FaultKind::ConstraintViolation,
            rejection.to_string(),
        ));
        rejection
    }
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("cash", &self.cash)
            .field("positions", &self.positions)
            .field("nav_points", &self.nav_history.len())
            .finish()
    }
}
