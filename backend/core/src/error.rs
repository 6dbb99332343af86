use thiserror::Error;

/// Top-level error type for MedLens Verify.
#[derive(Debug, Error)]
pub enum MedLensError {
    #[error("invalid image data: {0}")]
    InvalidImage(String),

    #[error("OCR failed ({category}): {message}")]
    OcrFailed {
        category: &'static str,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure while invoking a language-model provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("could not build provider request: {0}")]
    Request(String),

    #[error("provider unreachable: {0}")]
    Transport(String),

    #[error("provider timed out: {0}")]
    Timeout(String),

    #[error("provider returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Short, stable name of the failure class, safe to show to clients.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Request(_) => "InvalidRequest",
            Self::Transport(_) => "ConnectionError",
            Self::Timeout(_) => "APITimeoutError",
            Self::Status { code, .. } => match code {
                401 | 403 => "AuthenticationError",
                429 => "RateLimitError",
                400 | 404 | 422 => "BadRequestError",
                _ => "APIStatusError",
            },
            Self::Decode(_) => "InvalidResponse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_categories() {
        let status = |code| ProviderError::Status { code, body: String::new() };
        assert_eq!(status(401).category(), "AuthenticationError");
        assert_eq!(status(403).category(), "AuthenticationError");
        assert_eq!(status(429).category(), "RateLimitError");
        assert_eq!(status(400).category(), "BadRequestError");
        assert_eq!(status(500).category(), "APIStatusError");
    }

    #[test]
    fn transport_and_decode_categories() {
        assert_eq!(ProviderError::Transport("refused".into()).category(), "ConnectionError");
        assert_eq!(ProviderError::Timeout("30s".into()).category(), "APITimeoutError");
        assert_eq!(ProviderError::Decode("eof".into()).category(), "InvalidResponse");
    }

    #[test]
    fn ocr_error_display_includes_category() {
        let err = MedLensError::OcrFailed {
            category: "TesseractError",
            message: "exit status 1".into(),
        };
        assert_eq!(err.to_string(), "OCR failed (TesseractError): exit status 1");
    }
}
