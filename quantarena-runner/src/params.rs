//! Externally supplied evaluation parameters.

use quantarena_core::metrics::MetricParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameter file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything configurable about a run, TOML-loadable. Missing fields take
/// the platform defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    /// Starting capital of the simulated book (callback mode).
    pub initial_capital: f64,
    /// Transaction cost in basis points per unit of turnover.
    pub cost_bps: f64,
    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,
    /// Steps per year.
    pub annualization_factor: f64,
    /// Wall-clock budget per run in seconds; 0 means unbounded.
    pub timeout_seconds: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            initial_capital: 1_000_000.0,
            cost_bps: 5.0,
            risk_free_rate: 0.02,
            annualization_factor: 252.0,
            timeout_seconds: 0.0,
        }
    }
}

impl EvalParams {
    pub fn from_toml_str(raw: &str) -> Result<Self, ParamsError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ParamsError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn metric_params(&self) -> MetricParams {
        MetricParams {
            cost_bps: self.cost_bps,
            risk_free_rate: self.risk_free_rate,
            annualization: self.annualization_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_platform() {
        let p = EvalParams::default();
        assert_eq!(p.initial_capital, 1_000_000.0);
        assert_eq!(p.cost_bps, 5.0);
        assert_eq!(p.risk_free_rate, 0.02);
        assert_eq!(p.annualization_factor, 252.0);
        assert_eq!(p.timeout_seconds, 0.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let p = EvalParams::from_toml_str("cost_bps = 10.0\ntimeout_seconds = 30.0\n").unwrap();
        assert_eq!(p.cost_bps, 10.0);
        assert_eq!(p.timeout_seconds, 30.0);
        assert_eq!(p.initial_capital, 1_000_000.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(EvalParams::from_toml_str("cost_bps = \"cheap\"").is_err());
    }
}
