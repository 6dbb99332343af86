//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, instrument};

use medlens_core::OcrEngine;
use medlens_evaluator::ClaimChecker;
use medlens_tts::TtsProvider;

use crate::routes::{check, image, meta, speech, upload};

/// Request bodies up to 16 MiB, enough for a phone photo as base64.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

static PRIVATE_NETWORK: HeaderName = HeaderName::from_static("access-control-allow-private-network");
static VOICE_HEADER: HeaderName = HeaderName::from_static("x-voice-shortname");

/// Application state shared across routes. Everything in it is immutable.
#[derive(Clone)]
pub struct GatewayState {
    pub checker: Arc<ClaimChecker>,
    /// `None` when no OCR engine was found at startup.
    pub ocr: Option<Arc<dyn OcrEngine>>,
    pub tts: Arc<dyn TtsProvider>,
}

impl GatewayState {
    pub fn new(checker: Arc<ClaimChecker>, tts: Arc<dyn TtsProvider>) -> Self {
        Self {
            checker,
            ocr: None,
            tts,
        }
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([VOICE_HEADER.clone()])
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(meta::index))
        .route("/verify", get(meta::verify))
        .route("/health", get(meta::health))
        .route("/check", post(check::check))
        .route("/check_batch", post(check::check_batch))
        .route("/check_image", post(image::check_image))
        .route("/check_file", post(upload::check_file))
        .route("/tts", post(speech::tts))
        .route("/voices", get(speech::voices))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors())
        .layer(SetResponseHeaderLayer::if_not_present(
            PRIVATE_NETWORK.clone(),
            HeaderValue::from_static("true"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Starts the HTTP server and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
