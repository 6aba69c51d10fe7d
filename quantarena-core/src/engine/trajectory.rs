//! The normalized output of a simulation run, shared by both strategy shapes.

use crate::domain::WeightVector;
use crate::error::StepFault;
use chrono::NaiveDateTime;

/// End-of-step state: gross NAV and the weights actually held going forward.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub timestamp: NaiveDateTime,
    pub nav: f64,
    pub weights: WeightVector,
}

/// Per-step NAV/weight points in timestamp order, the ordered fault log, and
/// whether the run was cut short by the deadline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub faults: Vec<StepFault>,
    pub timed_out: bool,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gross NAV values in step order.
    pub fn nav_curve(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.nav).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Per-step turnover: distance between consecutive end-of-step weight
    /// vectors. The first step's entry is free.
    pub fn turnover_series(&self) -> Vec<f64> {
        let mut series = Vec::with_capacity(self.points.len());
        for (i, point) in self.points.iter().enumerate() {
            let turnover = match i {
                0 => 0.0,
                _ => point.weights.turnover(&self.points[i - 1].weights),
            };
            series.push(turnover);
        }
        series
    }
}
