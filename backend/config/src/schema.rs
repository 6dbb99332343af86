//! Typed configuration schema.

use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BING_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TTS_MODEL: &str = "tts-1";
pub const DEFAULT_TTS_VOICE: &str = "nova";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub tts: TtsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchConfig {
    /// `None` disables evidence retrieval.
    pub subscription_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsConfig {
    pub model: String,
    pub voice: String,
}

impl Config {
    /// Defaults everywhere, with the given model credential.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            openai: OpenAiConfig {
                api_key: api_key.into(),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            },
            search: SearchConfig {
                subscription_key: None,
                endpoint: DEFAULT_BING_ENDPOINT.to_string(),
                timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            },
            server: ServerConfig {
                bind: DEFAULT_BIND.to_string(),
                port: DEFAULT_PORT,
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                log_dir: None,
            },
            tts: TtsConfig {
                model: DEFAULT_TTS_MODEL.to_string(),
                voice: DEFAULT_TTS_VOICE.to_string(),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    pub fn search_enabled(&self) -> bool {
        self.search.subscription_key.is_some()
    }
}
