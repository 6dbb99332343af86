use async_trait::async_trait;
use medlens_core::{LlmProvider, LlmRequest, LlmResponse, ProviderError};

/// A mock LLM provider that returns canned responses or a canned failure.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    failure: Option<ProviderError>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.failure = Some(error);
        self
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(LlmResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
