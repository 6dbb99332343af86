//! Environment variable loading.
//!
//! Blank values count as unset. Numeric variables that do not parse are an
//! error rather than a silent default.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing env var \"{0}\"")]
    MissingVar(&'static str),

    #[error("Invalid value {value:?} for env var \"{name}\": {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn require(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
                value,
            }),
        }
    }
}

impl Config {
    /// Build from an arbitrary variable source (the process environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let timeout_secs = env.parse_or("MEDLENS_SEARCH_TIMEOUT_SECS", DEFAULT_SEARCH_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MEDLENS_SEARCH_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            openai: OpenAiConfig {
                api_key: env.require("OPENAI_API_KEY")?,
                model: env.get_or("OPENAI_MODEL", DEFAULT_MODEL),
                base_url: env.get_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            search: SearchConfig {
                subscription_key: env.get("BING_SUBSCRIPTION_KEY"),
                endpoint: env.get_or("BING_ENDPOINT", DEFAULT_BING_ENDPOINT),
                timeout_secs,
            },
            server: ServerConfig {
                bind: env.get_or("MEDLENS_BIND", DEFAULT_BIND),
                port: env.parse_or("MEDLENS_PORT", DEFAULT_PORT)?,
            },
            logging: LoggingConfig {
                level: env.get_or("RUST_LOG", DEFAULT_LOG_LEVEL),
                log_dir: env.get("MEDLENS_LOG_DIR").map(PathBuf::from),
            },
            tts: TtsConfig {
                model: env.get_or("MEDLENS_TTS_MODEL", DEFAULT_TTS_MODEL),
                voice: env.get_or("MEDLENS_TTS_VOICE", DEFAULT_TTS_VOICE),
            },
        })
    }
}
