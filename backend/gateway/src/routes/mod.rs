pub mod check;
pub mod image;
pub mod meta;
pub mod speech;
pub mod upload;

use medlens_core::{CheckOutcome, Claim};
use medlens_logging::{AuditEvent, AuditLogger};
use uuid::Uuid;

/// Emit the audit record for a finished pipeline run.
pub(crate) fn audit_outcome(request_id: Uuid, origin: &str, claim: &Claim, outcome: &CheckOutcome) {
    let event = match outcome {
        CheckOutcome::Completed(result) => AuditEvent::CheckCompleted {
            origin: origin.to_string(),
            verdict: result.verdict.to_string(),
            sources: result.sources.len(),
            claim_chars: claim.as_str().chars().count(),
        },
        CheckOutcome::ModelFailed { category, result } => AuditEvent::ModelFailed {
            category: category.to_string(),
            message: result.reason.clone(),
        },
    };
    AuditLogger::log_event(request_id, event);
}
