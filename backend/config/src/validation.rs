//! Config validation: checks with user-friendly messages.

use crate::schema::Config;
use thiserror::Error;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &Config) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_openai(config, &mut report);
    validate_search(config, &mut report);
    validate_server(config, &mut report);
    report
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn validate_openai(config: &Config, report: &mut ValidationReport) {
    let base_url = &config.openai.base_url;
    if !is_http_url(base_url) {
        report.error("openai.base_url", format!("'{base_url}' is not an http(s) URL"));
    } else if base_url.starts_with("http://") {
        report.warn("openai.base_url", "Model provider is reached over plain HTTP");
    }
}

fn validate_search(config: &Config, report: &mut ValidationReport) {
    if !config.search_enabled() {
        report.warn(
            "search.subscription_key",
            "BING_SUBSCRIPTION_KEY not set; claims will be judged without retrieved evidence",
        );
    }
    if !is_http_url(&config.search.endpoint) {
        report.error(
            "search.endpoint",
            format!("'{}' is not an http(s) URL", config.search.endpoint),
        );
    }
}

fn validate_server(config: &Config, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.warn("server.port", "Port 0 binds an ephemeral port");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_only_warns_about_search() {
        let report = validate(&Config::with_api_key("sk-test"));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "search.subscription_key");
    }

    #[test]
    fn configured_search_is_clean() {
        let mut config = Config::with_api_key("sk-test");
        config.search.subscription_key = Some("key".into());
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn bad_urls_are_errors() {
        let mut config = Config::with_api_key("sk-test");
        config.openai.base_url = "api.openai.com".into();
        config.search.endpoint = "ftp://bing".into();
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn local_gateway_over_http_is_a_warning() {
        let mut config = Config::with_api_key("sk-test");
        config.openai.base_url = "http://localhost:11434/v1".into();
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "openai.base_url"));
    }
}
