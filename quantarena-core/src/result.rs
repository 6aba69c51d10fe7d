//! Final run outcome: status, metrics, the participant-visible NAV curve.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::NavPoint;
use crate::engine::Trajectory;
use crate::error::StepFault;
use crate::metrics::{net_nav_curve, MetricParams, PerformanceMetrics};

/// Run outcome, serialized as a plain string on the wire:
/// `scored`, `rejected:<reason>`, or `timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Scored,
    Rejected(String),
    Timeout,
}

impl RunStatus {
    pub fn is_scored(&self) -> bool {
        matches!(self, RunStatus::Scored)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Scored => f.write_str("scored"),
            RunStatus::Rejected(reason) => write!(f, "rejected:{reason}"),
            RunStatus::Timeout => f.write_str("timeout"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scored" => Ok(RunStatus::Scored),
            "timeout" => Ok(RunStatus::Timeout),
            other => match other.strip_prefix("rejected:") {
                Some(reason) => Ok(RunStatus::Rejected(reason.to_string())),
                None => Err(format!("unknown run status '{other}'")),
            },
        }
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything a single evaluation produces.
///
/// Fatal outcomes carry no metrics and an empty curve; a timeout still scores
/// whatever trajectory accumulated before the deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: RunStatus,
    pub metrics: Option<PerformanceMetrics>,
    /// Net-of-cost NAV curve, one point per processed step.
    pub nav_curve: Vec<NavPoint>,
    pub faults: Vec<StepFault>,
}

impl SimulationResult {
    /// Score a completed (or deadline-truncated) trajectory.
    pub fn scored(trajectory: Trajectory, params: &MetricParams) -> Self {
        let gross = trajectory.nav_curve();
        let turnover = trajectory.turnover_series();
        let metrics = PerformanceMetrics::compute(&gross, &turnover, params);
        let net = net_nav_curve(&gross, &turnover, params.cost_bps);
        let nav_curve = trajectory
            .points
            .iter()
            .zip(net)
            .map(|(point, nav)| NavPoint {
                timestamp: point.timestamp,
                nav,
            })
            .collect();
        let status = if trajectory.timed_out {
            RunStatus::Timeout
        } else {
            RunStatus::Scored
        };

        Self {
            status,
            metrics: Some(metrics),
            nav_curve,
            faults: trajectory.faults,
        }
    }

    /// A fatal rejection: no metrics, no curve, just the reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Rejected(reason.into()),
            metrics: None,
            nav_curve: Vec::new(),
            faults: Vec::new(),
        }
    }
}
