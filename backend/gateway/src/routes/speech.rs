//! Spoken verdicts.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use medlens_logging::{AuditEvent, AuditLogger};
use medlens_tts::{pick_voice, truncate_input, voice_catalog, TtsRequest, VoiceInfo};

use crate::body::LenientJson;
use crate::error::ApiError;
use crate::server::GatewayState;

/// `POST /tts` `{ text, voice? }` → `audio/mpeg`
pub async fn tts(State(state): State<GatewayState>, body: LenientJson) -> Result<Response, ApiError> {
    let text = truncate_input(body.str_field("text"));
    if text.is_empty() {
        return Err(ApiError::BadRequest("Missing 'text'"));
    }

    let requested = Some(body.str_field("voice")).filter(|v| !v.is_empty());
    let voice = pick_voice(requested, state.tts.default_voice()).to_string();
    let request = TtsRequest::new(text).with_voice(voice.clone());
    let format = request.format;

    let request_id = AuditLogger::new_request_id();
    let audio = state.tts.synthesize(request).await.map_err(|err| {
        let category = err.category();
        AuditLogger::log_event(
            request_id,
            AuditEvent::SpeechFailed {
                category: category.to_string(),
                message: err.to_string(),
            },
        );
        ApiError::Upstream(format!("TTS failed: {category}"))
    })?;
    info!(%request_id, %voice, bytes = audio.len(), "Speech synthesized");

    let voice_header = HeaderValue::from_str(&voice).unwrap_or(HeaderValue::from_static("default"));
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.mime_type())),
            (header::HeaderName::from_static("x-voice-shortname"), voice_header),
        ],
        audio,
    )
        .into_response())
}

/// `GET /voices`
pub async fn voices(State(state): State<GatewayState>) -> Json<Vec<VoiceInfo>> {
    Json(voice_catalog(state.tts.default_voice()))
}
