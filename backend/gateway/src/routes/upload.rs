//! Claim checking from uploaded documents.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use medlens_core::{CheckResult, Claim};
use medlens_logging::AuditLogger;
use medlens_understanding::extract_document;

use crate::body::Uploads;
use crate::error::ApiError;
use crate::routes::audit_outcome;
use crate::server::GatewayState;

/// `POST /check_file`, multipart with one or more file parts.
///
/// Each file is checked as a single claim. A file with no readable text is
/// reported as `uncertain` without a model call. Like the batch route, per-file
/// failures are inline and the response is 200.
pub async fn check_file(
    State(state): State<GatewayState>,
    Uploads(files): Uploads,
) -> Result<Json<Value>, ApiError> {
    if files.is_empty() {
        return Err(ApiError::BadBatch("No files uploaded"));
    }

    let request_id = AuditLogger::new_request_id();
    info!(%request_id, files = files.len(), "Checking uploaded files");

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let document = extract_document(state.ocr.as_deref(), &file.filename, file.bytes.to_vec()).await;

        let result = match Claim::new(&document.text) {
            Some(claim) => {
                let outcome = state.checker.check(&claim).await;
                audit_outcome(request_id, "file", &claim, &outcome);
                outcome.into_result()
            }
            None => CheckResult::uncertain(
                format!("No readable text extracted from {}.", file.filename),
                Vec::new(),
            ),
        };

        results.push(json!({
            "filename": file.filename,
            "kind": document.kind.as_str(),
            "characters": document.text.chars().count(),
            "data": result,
        }));
    }

    Ok(Json(json!({ "ok": true, "results": results })))
}
