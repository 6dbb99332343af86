//! Telemetry and structured logging for MedLens Verify.
//!
//! Handles log redaction, JSON output, file rotation, and audit events for
//! each checked claim.

pub mod audit;
pub mod logger;
pub mod redact;

pub use audit::{AuditEntry, AuditEvent, AuditLogger};
pub use logger::{init_logger, ConsoleStream};
pub use redact::redact_sensitive_data;
