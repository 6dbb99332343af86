//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECRET_KEYS: &[&str] = &[
    "api_key",
    "apiKey",
    "subscription_key",
    "subscriptionKey",
    "token",
    "secret",
    "password",
];

/// Values that look like provider keys regardless of the field they sit in.
static KEY_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sk-[A-Za-z0-9_\-]{8,}$").unwrap());

/// Redact a config JSON value, replacing sensitive strings with a 4-char hint + `***`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(s: &str) -> String {
    if s.chars().count() > 4 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if !s.is_empty() && (is_sensitive_key(key) || KEY_LIKE.is_match(s)) => {
            Value::String(mask(s))
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Config;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let v = json!({ "openai": { "api_key": "sk-abcdef123456" } });
        let key = &redact(&v)["openai"]["api_key"];
        assert_eq!(key, "sk-a***");
    }

    #[test]
    fn redacts_key_like_values_anywhere() {
        let v = json!({ "notes": "sk-abcdef123456" });
        assert_eq!(redact(&v)["notes"], "sk-a***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "search": { "subscription_key": null } });
        let redacted = redact(&v);
        assert_eq!(redacted["logging"]["level"], "debug");
        assert!(redacted["search"]["subscription_key"].is_null());
    }

    #[test]
    fn config_snapshot_hides_both_credentials() {
        let mut config = Config::with_api_key("sk-live-0123456789abcdef");
        config.search.subscription_key = Some("0123456789abcdef0123456789abcdef".into());
        let snapshot = config.redacted();
        let text = snapshot.to_string();
        assert!(!text.contains("0123456789abcdef"));
        assert_eq!(snapshot["openai"]["model"], "gpt-3.5-turbo-0125");
        assert_eq!(snapshot["server"]["port"], 8000);
    }
}
