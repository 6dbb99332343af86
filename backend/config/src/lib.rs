//! `medlens-config`: runtime configuration for MedLens Verify.
//!
//! Provides:
//! - Typed `Config` built once from environment variables
//! - Config redaction for safe logging/display
//! - Validation with warnings for degraded setups

pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::ConfigError;
pub use redact::redact;
pub use schema::{Config, LoggingConfig, OpenAiConfig, SearchConfig, ServerConfig, TtsConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

impl Config {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// JSON snapshot with secrets masked.
    pub fn redacted(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(value) => redact(&value),
            Err(_) => serde_json::Value::Null,
        }
    }

    /// Log every warning and error in the validation report. Returns the report.
    pub fn validate(&self) -> ValidationReport {
        let report = validate(self);
        for warning in &report.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        report
    }
}
