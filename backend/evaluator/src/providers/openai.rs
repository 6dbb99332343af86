use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medlens_core::{LlmProvider, LlmRequest, LlmResponse, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions provider (also works against compatible gateways).
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn build_body(request: &LlmRequest) -> ChatRequest {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: Some(request.system_prompt.clone()),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: Some(request.user_prompt.clone()),
    });

    ChatRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else if err.is_builder() {
        ProviderError::Request(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// Extract `(content, total_tokens)` from a chat-completions body. Null content is empty.
fn parse_chat_response(body: &str) -> Result<(String, u64), ProviderError> {
    let chat_response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let content = chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    let tokens_used = chat_response
        .usage
        .and_then(|u| u.total_tokens)
        .unwrap_or(0);

    Ok((content, tokens_used))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        let start = Instant::now();
        let body = build_body(request);

        debug!(model = %request.model, "Sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        let (content, tokens_used) = parse_chat_response(&text)?;

        Ok(LlmResponse {
            content,
            provider: "openai".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;

    /// A chat-completions stub that answers every call with `status` and `body`,
    /// or 400 when the call is missing the bearer token or the user message.
    async fn stub(status: StatusCode, body: &'static str) -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .is_some_and(|v| v == "Bearer sk-test");
                if !authorized || request["messages"][1]["content"] != "Claim: x" {
                    return (StatusCode::BAD_REQUEST, "unexpected request");
                }
                (status, body)
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/v1")
    }

    fn request() -> LlmRequest {
        LlmRequest {
            model: "gpt-3.5-turbo-0125".into(),
            system_prompt: "system".into(),
            user_prompt: "Claim: x".into(),
            max_tokens: None,
            temperature: 0.0,
        }
    }

    #[test]
    fn body_has_system_then_user_and_no_max_tokens() {
        let body = serde_json::to_value(build_body(&request())).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo-0125");
        assert_eq!(body["temperature"], 0.0);
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Claim: x");
    }

    #[test]
    fn parses_content_and_usage() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"verdict\":\"true\"}"}}],"usage":{"total_tokens":42}}"#;
        let (content, tokens) = parse_chat_response(body).unwrap();
        assert_eq!(content, "{\"verdict\":\"true\"}");
        assert_eq!(tokens, 42);
    }

    #[test]
    fn null_content_becomes_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let (content, tokens) = parse_chat_response(body).unwrap();
        assert_eq!(content, "");
        assert_eq!(tokens, 0);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_chat_response("<html>502</html>").unwrap_err();
        assert_eq!(err.category(), "InvalidResponse");
    }

    #[tokio::test]
    async fn unreachable_provider_is_connection_error() {
        let provider = OpenAiProvider::new("sk-test").with_base_url("http://127.0.0.1:9/v1/");
        let err = provider.complete(&request()).await.unwrap_err();
        assert_eq!(err.category(), "ConnectionError");
    }

    #[tokio::test]
    async fn completes_against_compatible_endpoint() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"verdict\":\"true\"}"}}],"usage":{"total_tokens":7}}"#;
        let base_url = stub(StatusCode::OK, body).await;
        let provider = OpenAiProvider::new("sk-test").with_base_url(base_url);

        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content, "{\"verdict\":\"true\"}");
        assert_eq!(response.tokens_used, 7);
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
    }

    #[tokio::test]
    async fn http_status_maps_to_category() {
        for (status, category) in [
            (StatusCode::UNAUTHORIZED, "AuthenticationError"),
            (StatusCode::TOO_MANY_REQUESTS, "RateLimitError"),
            (StatusCode::SERVICE_UNAVAILABLE, "APIStatusError"),
        ] {
            let base_url = stub(status, r#"{"error":{"message":"nope"}}"#).await;
            let provider = OpenAiProvider::new("sk-test").with_base_url(base_url);
            let err = provider.complete(&request()).await.unwrap_err();
            assert_eq!(err.category(), category);
            assert!(matches!(err, ProviderError::Status { ref body, .. } if body.contains("nope")));
        }
    }

    #[tokio::test]
    async fn html_error_page_is_invalid_response() {
        let base_url = stub(StatusCode::OK, "<html>gateway</html>").await;
        let provider = OpenAiProvider::new("sk-test").with_base_url(base_url);
        let err = provider.complete(&request()).await.unwrap_err();
        assert_eq!(err.category(), "InvalidResponse");
    }
}
