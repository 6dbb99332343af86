use async_trait::async_trait;

use crate::error::{MedLensError, ProviderError};
use crate::types::{Claim, EvidenceItem};

/// Trait for LLM providers used by the claim evaluator.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Source of candidate evidence for a claim.
///
/// Retrieval never fails from the caller's point of view: an unconfigured or
/// unreachable backend yields an empty list.
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    fn name(&self) -> &str;

    /// At most `max` allow-listed items, in the backend's ranking order.
    async fn retrieve(&self, claim: &Claim, max: usize) -> Vec<EvidenceItem>;
}

/// Optical character recognition over an encoded image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Read all text from PNG-encoded image bytes. Finding no text is `Ok("")`.
    async fn extract(&self, png: &[u8]) -> Result<String, MedLensError>;
}
