use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::engine::{TtsError, TtsProvider, TtsRequest};

/// Returns fixed audio bytes, or a fixed error status. Records the last request.
pub struct MockTts {
    default_voice: String,
    fail_with: Option<u16>,
    last: Mutex<Option<TtsRequest>>,
}

impl MockTts {
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            default_voice: default_voice.into(),
            fail_with: None,
            last: Mutex::new(None),
        }
    }

    pub fn failing(mut self, code: u16) -> Self {
        self.fail_with = Some(code);
        self
    }

    pub fn last_request(&self) -> Option<TtsRequest> {
        self.last.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TtsProvider for MockTts {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_voice(&self) -> &str {
        &self.default_voice
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes, TtsError> {
        if let Ok(mut last) = self.last.lock() {
            *last = Some(req);
        }
        match self.fail_with {
            Some(code) => Err(TtsError::Status {
                code,
                body: "mock failure".to_string(),
            }),
            None => Ok(Bytes::from_static(b"ID3mock-audio")),
        }
    }
}
