//! Discovery and liveness endpoints.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::server::GatewayState;

/// `GET /`
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Health Claims Checker API",
        "endpoints": {
            "GET /verify": "health check",
            "GET /health": "liveness with timestamp",
            "POST /check": "body: { text: string }",
            "POST /check_batch": "body: { texts: string[] }",
            "POST /check_image": "body: { image: dataURL or base64 } or multipart field 'file'",
            "POST /check_file": "multipart, one or more files (image, pdf, docx, txt)",
            "POST /tts": "body: { text: string, voice?: string } -> audio/mpeg",
            "GET /voices": "list available TTS voices",
        }
    }))
}

/// `GET /verify`
pub async fn verify(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({ "ok": true, "model": state.checker.model() }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "healthy",
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
