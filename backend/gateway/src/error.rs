use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use medlens_core::CheckResult;

pub const NO_TEXT: &str = "No text provided";

/// Every non-200 answer the API gives.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with an `uncertain` CheckResult body and no sources.
    NoText,
    /// 400 `{ error }`.
    BadRequest(&'static str),
    /// 400 `{ ok: false, error }`.
    BadBatch(&'static str),
    /// 500 `{ error }`: the server lacks a capability the route needs.
    Unavailable(&'static str),
    /// 502 `{ error }`: an upstream collaborator failed.
    Upstream(String),
    /// 502 with the model-failure CheckResult as the body.
    ModelFailure(CheckResult),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NoText => (
                StatusCode::BAD_REQUEST,
                Json(CheckResult::uncertain(NO_TEXT, Vec::new())),
            )
                .into_response(),
            Self::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
            }
            Self::BadBatch(error) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": error })),
            )
                .into_response(),
            Self::Unavailable(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": error }))).into_response()
            }
            Self::Upstream(error) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": error }))).into_response()
            }
            Self::ModelFailure(result) => (StatusCode::BAD_GATEWAY, Json(result)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::NoText.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BadBatch("x").into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unavailable("OCR not available on server").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ModelFailure(CheckResult::uncertain("Model call failed: RateLimitError", vec![]))
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
