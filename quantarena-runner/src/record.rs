//! The outward-facing evaluation record handed to the persistence layer.

use chrono::{DateTime, Utc};
use quantarena_core::domain::NavPoint;
use quantarena_core::error::StepFault;
use quantarena_core::metrics::PerformanceMetrics;
use quantarena_core::result::{RunStatus, SimulationResult};
use serde::{Deserialize, Serialize};

/// Opaque identifiers supplied by the platform, never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionIds {
    pub participant_id: String,
    pub submission_id: String,
}

impl SubmissionIds {
    pub fn new(participant_id: impl Into<String>, submission_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            submission_id: submission_id.into(),
        }
    }
}

/// One completed evaluation, ready for persistence.
///
/// `record_id` is a content hash over the deterministic fields — everything
/// except the evaluation timestamp — so identical inputs always produce the
/// same id regardless of when they were scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub record_id: String,
    pub participant_id: String,
    pub submission_id: String,
    pub status: RunStatus,
    pub metrics: Option<PerformanceMetrics>,
    pub nav_curve: Vec<NavPoint>,
    pub error_log: Vec<StepFault>,
    pub evaluated_at: DateTime<Utc>,
}

/// The fields covered by the record id, in a fixed serialization order.
#[derive(Serialize)]
struct RecordCore<'a> {
    participant_id: &'a str,
    submission_id: &'a str,
    status: &'a RunStatus,
    metrics: &'a Option<PerformanceMetrics>,
    nav_curve: &'a [NavPoint],
    error_log: &'a [StepFault],
}

impl EvaluationRecord {
    pub fn new(ids: &SubmissionIds, result: SimulationResult) -> Self {
        let core = RecordCore {
            participant_id: &ids.participant_id,
            submission_id: &ids.submission_id,
            status: &result.status,
            metrics: &result.metrics,
            nav_curve: &result.nav_curve,
            error_log: &result.faults,
        };
        let json = serde_json::to_vec(&core).expect("record core serialization cannot fail");
        let record_id = blake3::hash(&json).to_hex().to_string();

        Self {
            record_id,
            participant_id: ids.participant_id.clone(),
            submission_id: ids.submission_id.clone(),
            status: result.status,
            metrics: result.metrics,
            nav_curve: result.nav_curve,
            error_log: result.faults,
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: SimulationResult) -> EvaluationRecord {
        EvaluationRecord::new(&SubmissionIds::new("p-1", "s-1"), status)
    }

    #[test]
    fn record_id_ignores_evaluation_time() {
        let a = record(SimulationResult::rejected("DataError: empty"));
        let b = record(SimulationResult::rejected("DataError: empty"));
        assert_eq!(a.record_id, b.record_id);
    }

    #[test]
    fn record_id_covers_the_ids() {
        let a = record(SimulationResult::rejected("DataError: empty"));
        let b = EvaluationRecord::new(
            &SubmissionIds::new("p-2", "s-1"),
            SimulationResult::rejected("DataError: empty"),
        );
        assert_ne!(a.record_id, b.record_id);
    }

    #[test]
    fn status_serializes_as_a_string() {
        let r = record(SimulationResult::rejected("ValidationError"));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "rejected:ValidationError");
    }
}
