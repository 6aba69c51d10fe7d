//! Vectorized submissions: one target weight vector per price timestamp.

use crate::domain::WeightVector;

/// Discrete stance for single-instrument signal strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Flat,
    Short,
}

impl Signal {
    pub fn weight(self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Flat => 0.0,
            Signal::Short => -1.0,
        }
    }
}

/// Target weights for every price timestamp, in timestamp order.
///
/// The weight *held* during step `t` is the target produced at `t−1`; nothing
/// is held before the first step. Rebalancing to the new target happens at the
/// step's close, so the end-of-step weight equals the target and per-step
/// turnover is the distance between consecutive targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSchedule {
    targets: Vec<WeightVector>,
}

impl TargetSchedule {
    pub fn new(targets: Vec<WeightVector>) -> Self {
        Self { targets }
    }

    /// Map a long/flat/short signal sequence onto one instrument.
    pub fn from_signals(instrument: &str, signals: &[Signal]) -> Self {
        let targets = signals
            .iter()
            .map(|s| {
                let mut w = WeightVector::new();
                w.set(instrument, s.weight());
                w
            })
            .collect();
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[WeightVector] {
        &self.targets
    }

    pub fn target(&self, step: usize) -> &WeightVector {
        &self.targets[step]
    }

    /// Weights held during `step`: the previous step's target.
    pub fn held(&self, step: usize) -> Option<&WeightVector> {
        if step == 0 {
            None
        } else {
            self.targets.get(step - 1)
        }
    }

    /// Turnover charged at `step`: distance from the previous target. The
    /// initial entry at step 0 is free.
    pub fn turnover_at(&self, step: usize) -> f64 {
        match step {
            0 => 0.0,
            s => self.targets[s].turnover(&self.targets[s - 1]),
        }
    }
}
