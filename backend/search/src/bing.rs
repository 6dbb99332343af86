//! Bing Web Search retriever, restricted to the trusted allow-list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use medlens_core::{AllowList, Claim, EvidenceItem, EvidenceRetriever};

pub const DEFAULT_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search provider returned {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<WebPages>,
}

#[derive(Debug, Default, Deserialize)]
struct WebPages {
    #[serde(default)]
    value: Option<Vec<WebPage>>,
}

#[derive(Debug, Deserialize)]
struct WebPage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Allow-listed evidence from a Bing response, in provider order, at most `max`.
fn evidence_from_response(response: BingResponse, allow: &AllowList, max: usize) -> Vec<EvidenceItem> {
    let pages = response
        .web_pages
        .and_then(|p| p.value)
        .unwrap_or_default();

    allow.filter_evidence(
        pages.into_iter().map(|page| {
            EvidenceItem::new(page.name.unwrap_or_default(), page.url.unwrap_or_default())
        }),
        max,
    )
}

pub struct BingRetriever {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
    allow: AllowList,
}

impl BingRetriever {
    /// A retriever without a key is valid and always returns nothing.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            allow: AllowList::trusted(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_allow_list(mut self, allow: AllowList) -> Self {
        self.allow = allow;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, api_key: &str, query: &str, count: usize) -> Result<BingResponse, SearchError> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("mkt", "en-US"),
                ("responseFilter", "Webpages"),
            ])
            .header("Ocp-Apim-Subscription-Key", api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EvidenceRetriever for BingRetriever {
    fn name(&self) -> &str {
        "bing"
    }

    async fn retrieve(&self, claim: &Claim, max: usize) -> Vec<EvidenceItem> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Bing key not configured, skipping evidence retrieval");
            return Vec::new();
        };

        match self.search(api_key, claim.as_str(), max).await {
            Ok(response) => evidence_from_response(response, &self.allow, max),
            Err(e) => {
                warn!(error = %e, "Bing search failed, continuing without evidence");
                Vec::new()
            }
        }
    }
}
