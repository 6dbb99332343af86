//! Audit Event Logger
//!
//! One structured record per notable outcome of a request, emitted under the
//! `medlens_audit` target so it can be routed separately from diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    CheckCompleted {
        /// `text`, `image`, or `batch`.
        origin: String,
        verdict: String,
        sources: usize,
        claim_chars: usize,
    },
    ModelFailed {
        category: String,
        message: String,
    },
    OcrFailed {
        category: String,
        message: String,
    },
    SpeechFailed {
        category: String,
        message: String,
    },
}

impl AuditEvent {
    fn redact(&mut self) {
        match self {
            Self::CheckCompleted { .. } => {}
            Self::ModelFailed { message, .. }
            | Self::OcrFailed { message, .. }
            | Self::SpeechFailed { message, .. } => {
                *message = redact_sensitive_data(message);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

pub struct AuditLogger;

impl AuditLogger {
    pub fn new_request_id() -> Uuid {
        Uuid::new_v4()
    }

    /// Redacts free-text fields, then emits the entry as a single JSON field.
    pub fn log_event(request_id: Uuid, mut event: AuditEvent) -> AuditEntry {
        event.redact();

        let entry = AuditEntry {
            request_id,
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "medlens_audit", %request_id, event = %json, "Audit event"),
            Err(_) => info!(target: "medlens_audit", %request_id, event = ?entry, "Audit event"),
        }
        entry
    }
}
