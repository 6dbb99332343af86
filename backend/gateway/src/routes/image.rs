//! Claim checking from an image, via OCR.

use axum::{extract::State, Json};
use tracing::{info, warn};

use medlens_core::{CheckOutcome, CheckResult, Claim, MedLensError};
use medlens_logging::{AuditEvent, AuditLogger};
use medlens_understanding::{extract_text, extract_text_from_bytes};

use crate::body::ImageUpload;
use crate::error::ApiError;
use crate::routes::audit_outcome;
use crate::server::GatewayState;

/// `POST /check_image` `{ image }` with a data-URL or bare base64, or a
/// multipart upload with a `file` part.
pub async fn check_image(
    State(state): State<GatewayState>,
    upload: ImageUpload,
) -> Result<Json<CheckResult>, ApiError> {
    let ocr = state
        .ocr
        .clone()
        .ok_or(ApiError::Unavailable("OCR not available on server"))?;

    if upload.is_empty() {
        return Err(ApiError::BadRequest("No image"));
    }

    let request_id = AuditLogger::new_request_id();
    let extracted = match upload {
        ImageUpload::Encoded(payload) => extract_text(ocr.as_ref(), &payload).await,
        ImageUpload::File(bytes) => extract_text_from_bytes(ocr.as_ref(), bytes.to_vec()).await,
    };
    let text = match extracted {
        Ok(text) => text,
        Err(MedLensError::InvalidImage(reason)) => {
            warn!(%request_id, %reason, "Rejected image payload");
            return Err(ApiError::BadRequest("Invalid image data"));
        }
        Err(err) => {
            let category = match &err {
                MedLensError::OcrFailed { category, .. } => *category,
                _ => "InternalError",
            };
            AuditLogger::log_event(
                request_id,
                AuditEvent::OcrFailed {
                    category: category.to_string(),
                    message: err.to_string(),
                },
            );
            return Err(ApiError::Upstream(format!("OCR failed: {category}")));
        }
    };

    let Some(claim) = Claim::new(&text) else {
        info!(%request_id, engine = ocr.name(), "OCR found no text");
        return Ok(Json(CheckResult::uncertain("OCR found no text", Vec::new()).with_ocr_text("")));
    };

    let outcome = state.checker.check(&claim).await;
    audit_outcome(request_id, "image", &claim, &outcome);

    match outcome {
        CheckOutcome::Completed(result) => Ok(Json(result.with_ocr_text(text))),
        CheckOutcome::ModelFailed { result, .. } => {
            Err(ApiError::ModelFailure(result.with_ocr_text(text)))
        }
    }
}
