//! Builds the production collaborators from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use medlens_config::Config;
use medlens_evaluator::providers::OpenAiProvider;
use medlens_evaluator::{ClaimChecker, ClaimEvaluator};
use medlens_gateway::GatewayState;
use medlens_search::BingRetriever;
use medlens_tts::OpenAiTts;
use medlens_understanding::TesseractOcr;

pub fn build_checker(config: &Config) -> ClaimChecker {
    let retriever = BingRetriever::new(config.search.subscription_key.clone())
        .with_endpoint(&config.search.endpoint)
        .with_timeout(Duration::from_secs(config.search.timeout_secs));
    if !retriever.is_enabled() {
        warn!("Evidence retrieval disabled: no Bing subscription key");
    }

    let provider = OpenAiProvider::new(&config.openai.api_key).with_base_url(&config.openai.base_url);
    let evaluator = ClaimEvaluator::new(Arc::new(provider), &config.openai.model);

    ClaimChecker::new(Arc::new(retriever), evaluator)
}

pub fn build_tts(config: &Config) -> OpenAiTts {
    OpenAiTts::new(&config.openai.api_key)
        .with_base_url(&config.openai.base_url)
        .with_model(&config.tts.model)
        .with_voice(&config.tts.voice)
}

/// Probes for Tesseract once; without it `/check_image` answers "OCR not available".
pub async fn build_state(config: &Config) -> GatewayState {
    let state = GatewayState::new(Arc::new(build_checker(config)), Arc::new(build_tts(config)));

    match TesseractOcr::detect().await {
        Some(ocr) => {
            info!("Tesseract OCR enabled");
            state.with_ocr(Arc::new(ocr))
        }
        None => {
            warn!("Tesseract not found; image checks disabled");
            state
        }
    }
}
