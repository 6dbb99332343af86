//! Request body extraction.
//!
//! A missing, malformed, or non-object JSON body is treated as `{}` so
//! handlers only deal with field-level validation. Multipart uploads are read
//! into memory, bounded by the router's body limit.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{Map, Value};

#[derive(Debug, Default)]
pub struct LenientJson(pub Map<String, Value>);

impl LenientJson {
    pub fn from_slice(raw: &[u8]) -> Self {
        match serde_json::from_slice(raw) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    /// Trimmed string field; absent, null, or non-string values read as `""`.
    pub fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[async_trait]
impl<S> FromRequest<S> for LenientJson
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self::from_slice(&raw))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// The image for `/check_image`: a multipart `file` part, or the JSON
/// `image` field holding base64 or a data-URL.
#[derive(Debug)]
pub enum ImageUpload {
    File(Bytes),
    Encoded(String),
}

impl ImageUpload {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::File(bytes) => bytes.is_empty(),
            Self::Encoded(payload) => payload.is_empty(),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let body = LenientJson::from_request(req, state).await?;
            return Ok(Self::Encoded(body.str_field("image").to_string()));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            if field.name() == Some("file") {
                let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                return Ok(Self::File(bytes));
            }
        }
        Ok(Self::File(Bytes::new()))
    }
}

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Every file part of a multipart body, in order. Plain form fields are
/// skipped and a non-multipart request carries no files.
#[derive(Debug, Default)]
pub struct Uploads(pub Vec<UploadedFile>);

#[async_trait]
impl<S> FromRequest<S> for Uploads
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            return Ok(Self::default());
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            let filename = if filename.is_empty() { "file".to_string() } else { filename };
            let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
            files.push(UploadedFile { filename, bytes });
        }
        Ok(Self(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_or_non_object_bodies_are_empty() {
        for raw in [&b""[..], b"not json", b"[1,2]", b"\"text\"", b"{\"text\": "] {
            assert!(LenientJson::from_slice(raw).0.is_empty());
        }
    }

    #[test]
    fn string_fields_are_trimmed_and_typed() {
        let body = LenientJson::from_slice(br#"{"text":"  zinc cures colds ","n":3,"z":null}"#);
        assert_eq!(body.str_field("text"), "zinc cures colds");
        assert_eq!(body.str_field("n"), "");
        assert_eq!(body.str_field("z"), "");
        assert_eq!(body.str_field("missing"), "");
    }
}
