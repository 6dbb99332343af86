//! Text claim checking, single and batched.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use medlens_core::{CheckOutcome, CheckResult, Claim};
use medlens_logging::AuditLogger;

use crate::body::LenientJson;
use crate::error::{ApiError, NO_TEXT};
use crate::routes::audit_outcome;
use crate::server::GatewayState;

pub const MAX_BATCH_ITEMS: usize = 2000;
pub const MAX_BATCH_ITEM_CHARS: usize = 1200;

/// `POST /check` `{ text }`
pub async fn check(
    State(state): State<GatewayState>,
    body: LenientJson,
) -> Result<Json<CheckResult>, ApiError> {
    let claim = Claim::new(body.str_field("text")).ok_or(ApiError::NoText)?;
    let request_id = AuditLogger::new_request_id();

    let outcome = state.checker.check(&claim).await;
    audit_outcome(request_id, "text", &claim, &outcome);

    match outcome {
        CheckOutcome::Completed(result) => Ok(Json(result)),
        CheckOutcome::ModelFailed { result, .. } => Err(ApiError::ModelFailure(result)),
    }
}

fn batch_item(value: &Value) -> Option<Claim> {
    let text = value.as_str().unwrap_or("");
    let cut: String = text.chars().take(MAX_BATCH_ITEM_CHARS).collect();
    Claim::new(cut)
}

/// `POST /check_batch` `{ texts: [...] }`
///
/// Items run sequentially. Per-item failures are reported inline, so the batch
/// itself is 200 once the envelope is valid.
pub async fn check_batch(
    State(state): State<GatewayState>,
    body: LenientJson,
) -> Result<Json<Value>, ApiError> {
    let texts = body
        .get("texts")
        .and_then(Value::as_array)
        .filter(|texts| !texts.is_empty())
        .ok_or(ApiError::BadBatch("Provide a non-empty 'texts' array"))?;

    let request_id = AuditLogger::new_request_id();
    info!(%request_id, items = texts.len().min(MAX_BATCH_ITEMS), "Checking batch");

    let mut results = Vec::with_capacity(texts.len().min(MAX_BATCH_ITEMS));
    for value in texts.iter().take(MAX_BATCH_ITEMS) {
        let Some(claim) = batch_item(value) else {
            results.push(CheckResult::uncertain(NO_TEXT, Vec::new()));
            continue;
        };
        let outcome = state.checker.check(&claim).await;
        audit_outcome(request_id, "batch", &claim, &outcome);
        results.push(outcome.into_result());
    }

    Ok(Json(json!({ "ok": true, "results": results })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_items_are_cut_then_trimmed() {
        let long = format!("{}{}", "a".repeat(MAX_BATCH_ITEM_CHARS), "tail");
        let claim = batch_item(&Value::String(long)).unwrap();
        assert_eq!(claim.as_str().chars().count(), MAX_BATCH_ITEM_CHARS);

        assert!(batch_item(&json!("   ")).is_none());
        assert!(batch_item(&json!(null)).is_none());
        assert!(batch_item(&json!(42)).is_none());
    }
}
