//! MedLens Verify HTTP API.
//!
//! JSON in, JSON out, except `/tts` which streams back MP3 bytes.

pub mod body;
pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, MAX_BODY_BYTES};
