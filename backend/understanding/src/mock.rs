use async_trait::async_trait;

use medlens_core::{MedLensError, OcrEngine};

/// Canned OCR engine for tests and offline runs.
#[derive(Debug, Clone)]
pub struct MockOcr {
    outcome: Result<String, &'static str>,
}

impl MockOcr {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
        }
    }

    pub fn failing(category: &'static str) -> Self {
        Self {
            outcome: Err(category),
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _png: &[u8]) -> Result<String, MedLensError> {
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(category) => Err(MedLensError::OcrFailed {
                category: *category,
                message: "mock OCR failure".to_string(),
            }),
        }
    }
}
