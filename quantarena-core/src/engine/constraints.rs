//! The no-leverage rule: Σ|w| ≤ 1.0, with a small tolerance for float noise.

use crate::domain::WeightVector;
use crate::error::ValidationError;
use chrono::NaiveDateTime;

pub const LEVERAGE_LIMIT: f64 = 1.0;
pub const LEVERAGE_EPSILON: f64 = 1e-4;

/// True when gross exposure stays within the limit.
pub fn within_leverage(gross: f64) -> bool {
    gross <= LEVERAGE_LIMIT + LEVERAGE_EPSILON
}

/// Validate every target row of a vectorized submission before simulation.
///
/// Fails fast on the first offending timestamp: any single-instrument weight
/// outside [-1, 1] or any row with gross exposure above the limit rejects the
/// whole submission.
pub fn validate_targets(
    timestamps: &[NaiveDateTime],
    targets: &[WeightVector],
) -> Result<(), ValidationError> {
    for (&timestamp, target) in timestamps.iter().zip(targets) {
        for (instrument, weight) in target.iter() {
            if weight.abs() > LEVERAGE_LIMIT + LEVERAGE_EPSILON {
                return Err(ValidationError::WeightOutOfRange {
                    timestamp,
                    instrument: instrument.to_string(),
                    value: weight,
                });
            }
        }
        let gross = target.gross();
        if !within_leverage(gross) {
            return Err(ValidationError::LeverageBreach { timestamp, gross });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn row(pairs: &[(&str, f64)]) -> WeightVector {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn accepts_fully_invested_row() {
        let targets = vec![row(&[("SPY", 0.6), ("QQQ", -0.4)])];
        assert!(validate_targets(&[ts(2)], &targets).is_ok());
    }

    #[test]
    fn tolerates_float_noise_at_the_limit() {
        let targets = vec![row(&[("SPY", 1.00005)])];
        assert!(validate_targets(&[ts(2)], &targets).is_ok());
    }

    #[test]
    fn rejects_gross_exposure_above_limit() {
        let targets = vec![
            row(&[("SPY", 0.5)]),
            row(&[("SPY", 0.6), ("QQQ", -0.5)]),
        ];
        let err = validate_targets(&[ts(2), ts(3)], &targets).unwrap_err();
        match err {
            ValidationError::LeverageBreach { timestamp, gross } => {
                assert_eq!(timestamp, ts(3));
                assert!((gross - 1.1).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_single_weight_outside_unit_range() {
        let targets = vec![row(&[("SPY", -1.2)])];
        let err = validate_targets(&[ts(2)], &targets).unwrap_err();
        assert!(matches!(err, ValidationError::WeightOutOfRange { .. }));
    }
}
