use std::sync::Arc;

use tracing::{debug, info, warn};

use medlens_core::{
    CheckOutcome, CheckResult, Claim, EvidenceItem, EvidenceRetriever, LlmProvider, LlmRequest,
    ProviderError, MAX_SOURCES,
};

use crate::normalize::ResponseNormalizer;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

/// Asks the model to judge one claim against the retrieved evidence.
pub struct ClaimEvaluator {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl ClaimEvaluator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single deterministic call, no retry. Returns the trimmed raw model text.
    pub async fn evaluate(
        &self,
        claim: &Claim,
        evidence: &[EvidenceItem],
    ) -> Result<String, ProviderError> {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(claim, evidence),
            max_tokens: None,
            temperature: 0.0,
        };

        let response = self.provider.complete(&request).await?;
        debug!(
            provider = %response.provider,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "Model responded"
        );
        Ok(response.content.trim().to_string())
    }
}

/// Retrieval, evaluation, and normalization for one claim.
pub struct ClaimChecker {
    retriever: Arc<dyn EvidenceRetriever>,
    evaluator: ClaimEvaluator,
    normalizer: ResponseNormalizer,
    max_evidence: usize,
}

impl ClaimChecker {
    pub fn new(retriever: Arc<dyn EvidenceRetriever>, evaluator: ClaimEvaluator) -> Self {
        Self {
            retriever,
            evaluator,
            normalizer: ResponseNormalizer::default(),
            max_evidence: MAX_SOURCES,
        }
    }

    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn model(&self) -> &str {
        self.evaluator.model()
    }

    /// Never fails: a model error becomes an `uncertain` result carrying the
    /// evidence retrieved so far.
    pub async fn check(&self, claim: &Claim) -> CheckOutcome {
        let evidence = self.retriever.retrieve(claim, self.max_evidence).await;
        info!(
            retriever = self.retriever.name(),
            evidence = evidence.len(),
            "Evidence retrieved"
        );

        match self.evaluator.evaluate(claim, &evidence).await {
            Ok(raw) => {
                let result = self.normalizer.normalize(&raw, &evidence);
                info!(
                    verdict = %result.verdict,
                    sources = result.sources.len(),
                    "Claim checked"
                );
                CheckOutcome::Completed(result)
            }
            Err(err) => {
                let category = err.category();
                warn!(error = %err, category, "Model call failed");
                CheckOutcome::ModelFailed {
                    category,
                    result: CheckResult::uncertain(
                        format!("Model call failed: {}", category),
                        evidence,
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use medlens_core::{LlmResponse, Verdict};

    use crate::providers::mock::MockProvider;

    struct FixedRetriever(Vec<EvidenceItem>);

    #[async_trait]
    impl EvidenceRetriever for FixedRetriever {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn retrieve(&self, _claim: &Claim, max: usize) -> Vec<EvidenceItem> {
            self.0.iter().take(max).cloned().collect()
        }
    }

    /// Records the last request so prompt wiring can be asserted.
    struct RecordingProvider {
        last: Mutex<Option<LlmRequest>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(LlmResponse {
                content: "  {\"verdict\":\"uncertain\"}  ".into(),
                provider: "recording".into(),
                model: request.model.clone(),
                tokens_used: 0,
                latency_ms: 0,
            })
        }
    }

    fn evidence() -> Vec<EvidenceItem> {
        vec![EvidenceItem::new("Measles", "https://www.who.int/news-room/fact-sheets/detail/measles")]
    }

    fn checker(provider: MockProvider) -> ClaimChecker {
        ClaimChecker::new(
            Arc::new(FixedRetriever(evidence())),
            ClaimEvaluator::new(Arc::new(provider), "gpt-test"),
        )
    }

    #[tokio::test]
    async fn completed_check_uses_model_sources() {
        let provider = MockProvider::new("mock").with_response(
            r#"{"verdict":"false","reason":"Vaccines do not cause autism.","sources":[{"title":"CDC","url":"https://www.cdc.gov/vaccinesafety/"}]}"#,
        );
        let claim = Claim::new("MMR vaccine causes autism").unwrap();
        let outcome = checker(provider).check(&claim).await;

        assert!(!outcome.is_model_failure());
        let result = outcome.into_result();
        assert_eq!(result.verdict, Verdict::False);
        assert_eq!(result.sources, vec![EvidenceItem::new("CDC", "https://www.cdc.gov/vaccinesafety/")]);
    }

    #[tokio::test]
    async fn uncited_answer_falls_back_to_retrieved_evidence() {
        let provider = MockProvider::new("mock").with_response("The claim is false.");
        let claim = Claim::new("Measles is harmless").unwrap();
        let result = checker(provider).check(&claim).await.into_result();

        assert_eq!(result.verdict, Verdict::Uncertain);
        assert_eq!(result.reason, "");
        assert_eq!(result.sources, evidence());
    }

    #[tokio::test]
    async fn model_failure_keeps_evidence_and_category() {
        let provider = MockProvider::new("mock").with_error(ProviderError::Status {
            code: 429,
            body: "quota".into(),
        });
        let claim = Claim::new("Measles is harmless").unwrap();
        let outcome = checker(provider).check(&claim).await;

        match outcome {
            CheckOutcome::ModelFailed { category, result } => {
                assert_eq!(category, "RateLimitError");
                assert_eq!(result.verdict, Verdict::Uncertain);
                assert_eq!(result.reason, "Model call failed: RateLimitError");
                assert_eq!(result.sources, evidence());
            }
            other => panic!("expected model failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_allow_list_applies_to_model_sources() {
        let provider = MockProvider::new("mock").with_response(
            r#"{"verdict":"misleading","reason":"Partly.","sources":[{"title":"CDC","url":"https://www.cdc.gov/x"},{"title":"NHS","url":"https://www.nhs.uk/y"}]}"#,
        );
        let checker = checker(provider)
            .with_normalizer(ResponseNormalizer::new(medlens_core::AllowList::new(["nhs.uk"])));
        let claim = Claim::new("Antibiotics treat viral infections").unwrap();
        let result = checker.check(&claim).await.into_result();

        assert_eq!(result.verdict, Verdict::Misleading);
        assert_eq!(result.sources, vec![EvidenceItem::new("NHS", "https://www.nhs.uk/y")]);
    }

    #[tokio::test]
    async fn evaluator_sends_deterministic_prompt() {
        let provider = Arc::new(RecordingProvider { last: Mutex::new(None) });
        let evaluator = ClaimEvaluator::new(provider.clone(), "gpt-test");
        let claim = Claim::new("Zinc shortens colds").unwrap();

        let raw = evaluator.evaluate(&claim, &evidence()).await.unwrap();
        assert_eq!(raw, "{\"verdict\":\"uncertain\"}");

        let request = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-test");
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
        assert!(request.user_prompt.starts_with("Claim: Zinc shortens colds\nSOURCES:\n- Measles "));
    }
}
