//! Risk-adjusted performance metrics — pure functions over a run trajectory.
//!
//! Every metric is a pure function: NAV curve and/or turnover series in,
//! scalar out. No dependencies on the driver or the data pipeline.
//!
//! The driver produces a *gross* NAV curve; transaction costs are applied
//! here. The per-step net return is
//! `r_t = NAV_t/NAV_{t−1} − 1 − turnover_t × cost_bps/10_000`,
//! and the net NAV curve — the one reported outward — compounds those net
//! returns from the initial NAV.

use serde::{Deserialize, Serialize};

/// Scoring parameters, supplied externally per run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricParams {
    /// Transaction cost in basis points per unit of turnover.
    pub cost_bps: f64,
    /// Annual risk-free rate as a fraction (0.02 = 2%).
    pub risk_free_rate: f64,
    /// Steps per year (252 for daily bars).
    pub annualization: f64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            cost_bps: 5.0,
            risk_free_rate: 0.02,
            annualization: 252.0,
        }
    }
}

/// Aggregate metrics for a single evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub sharpe: f64,
    pub total_return: f64,
    pub annual_return: f64,
    pub annual_volatility: f64,
    /// Positive fraction: 0.15 means a 15% peak-to-trough loss.
    pub max_drawdown: f64,
    pub turnover_total: f64,
    pub turnover_mean: f64,
    pub num_steps: usize,
}

impl PerformanceMetrics {
    /// Compute all metrics from a gross NAV curve and its turnover series.
    ///
    /// A curve of fewer than two points yields all-zero metrics rather than
    /// an error; a flat curve yields Sharpe 0.
    pub fn compute(gross_nav: &[f64], turnover: &[f64], params: &MetricParams) -> Self {
        let returns = net_returns(gross_nav, turnover, params.cost_bps);
        let net_curve = net_nav_curve(gross_nav, turnover, params.cost_bps);
        let total = total_return(&net_curve);
        let turnover_total: f64 = turnover.iter().sum();
        let turnover_mean = if returns.is_empty() {
            0.0
        } else {
            turnover_total / returns.len() as f64
        };

        Self {
            sharpe: sharpe_ratio(&returns, params.risk_free_rate, params.annualization),
            total_return: total,
            annual_return: annual_return(total, returns.len(), params.annualization),
            annual_volatility: annual_volatility(&returns, params.annualization),
            max_drawdown: max_drawdown(&net_curve),
            turnover_total,
            turnover_mean,
            num_steps: gross_nav.len(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Net per-step returns after transaction costs.
///
/// `turnover` is indexed like the curve; entry 0 (the free initial entry) is
/// never charged because no return exists before the first point.
pub fn net_returns(gross_nav: &[f64], turnover: &[f64], cost_bps: f64) -> Vec<f64> {
    if gross_nav.len() < 2 {
        return Vec::new();
    }
    let cost_rate = cost_bps / 10_000.0;
    (1..gross_nav.len())
        .map(|t| {
            let gross = if gross_nav[t - 1].abs() > 1e-15 {
                gross_nav[t] / gross_nav[t - 1] - 1.0
            } else {
                0.0
            };
            let charged = turnover.get(t).copied().unwrap_or(0.0);
            gross - charged * cost_rate
        })
        .collect()
}

/// Compound the net returns from the initial NAV. Same length as the input
/// curve; this is the NAV curve reported to participants.
pub fn net_nav_curve(gross_nav: &[f64], turnover: &[f64], cost_bps: f64) -> Vec<f64> {
    if gross_nav.is_empty() {
        return Vec::new();
    }
    let returns = net_returns(gross_nav, turnover, cost_bps);
    let mut curve = Vec::with_capacity(gross_nav.len());
    curve.push(gross_nav[0]);
    for r in returns {
        let prev = *curve.last().unwrap();
        curve.push(prev * (1.0 + r));
    }
    curve
}

/// Total return as a fraction: (final − initial) / initial.
pub fn total_return(curve: &[f64]) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    let initial = curve[0];
    if initial <= 0.0 {
        return 0.0;
    }
    (curve[curve.len() - 1] - initial) / initial
}

/// Geometric annualization of a total return over `steps` return steps.
pub fn annual_return(total: f64, steps: usize, annualization: f64) -> f64 {
    if steps == 0 || annualization <= 0.0 {
        return 0.0;
    }
    let base = 1.0 + total;
    if base <= 0.0 {
        return -1.0;
    }
    base.powf(annualization / steps as f64) - 1.0
}

/// Sample standard deviation of per-step returns, scaled to annual.
pub fn annual_volatility(returns: &[f64], annualization: f64) -> f64 {
    std_dev(returns) * annualization.max(0.0).sqrt()
}

/// Annualized Sharpe ratio over net per-step returns.
///
/// The per-step risk-free rate is the geometric step equivalent of the annual
/// rate: `(1 + rf)^(1/annualization) − 1`. Returns 0.0 when the excess-return
/// deviation vanishes or fewer than two returns exist.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, annualization: f64) -> f64 {
    if returns.len() < 2 || annualization <= 0.0 {
        return 0.0;
    }
    let step_rf = (1.0 + risk_free_rate).powf(1.0 / annualization) - 1.0;
    let excess: Vec<f64> = returns.iter().map(|r| r - step_rf).collect();
    let std = std_dev(&excess);
    if std < 1e-15 {
        return 0.0;
    }
    (mean_f64(&excess) / std) * annualization.sqrt()
}

/// Maximum drawdown as a positive fraction of the running peak.
///
/// Returns 0.0 for constant or monotonically rising curves.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    let mut peak = curve[0];
    let mut max_dd = 0.0_f64;
    for &nav in curve {
        if nav > peak {
            peak = nav;
        }
        if peak > 0.0 {
            let dd = (peak - nav) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N−1 in the denominator).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
