//! Image payload decoding.
//!
//! Browsers send either a bare base64 string or a `data:image/...;base64,`
//! URL. Whitespace is ignored and padding is optional.

use std::io::Cursor;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use medlens_core::{MedLensError, OcrEngine};

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Drop a `data:image/...,` prefix if present.
pub fn strip_data_url(payload: &str) -> &str {
    let trimmed = payload.trim();
    if trimmed.starts_with("data:image/") {
        trimmed.split_once(',').map_or(trimmed, |(_, data)| data)
    } else {
        trimmed
    }
}

pub fn decode_image_payload(payload: &str) -> Result<DynamicImage, MedLensError> {
    let data: String = strip_data_url(payload)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(data.as_bytes())
        .map_err(|e| MedLensError::InvalidImage(format!("base64: {e}")))?;

    decode_image_bytes(&bytes)
}

/// Decode raw image bytes, e.g. from a multipart upload.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, MedLensError> {
    image::load_from_memory(bytes).map_err(|e| MedLensError::InvalidImage(e.to_string()))
}

fn encode_png(image: DynamicImage) -> Result<Vec<u8>, MedLensError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| MedLensError::Other(anyhow::anyhow!("PNG re-encode failed: {e}")))?;
    Ok(buffer)
}

/// Decode the payload, normalize it to RGB PNG, and run OCR.
///
/// Decoding problems are [`MedLensError::InvalidImage`]; engine problems are
/// whatever the engine reports. No text at all is `Ok("")`.
pub async fn extract_text(engine: &dyn OcrEngine, payload: &str) -> Result<String, MedLensError> {
    let payload = payload.to_string();
    recognize(engine, move || decode_image_payload(&payload)).await
}

/// Same as [`extract_text`] for image bytes that are already binary.
pub async fn extract_text_from_bytes(
    engine: &dyn OcrEngine,
    bytes: Vec<u8>,
) -> Result<String, MedLensError> {
    recognize(engine, move || decode_image_bytes(&bytes)).await
}

async fn recognize<F>(engine: &dyn OcrEngine, decode: F) -> Result<String, MedLensError>
where
    F: FnOnce() -> Result<DynamicImage, MedLensError> + Send + 'static,
{
    let png = tokio::task::spawn_blocking(move || {
        let image = decode()?;
        debug!(width = image.width(), height = image.height(), "Decoded image payload");
        encode_png(image)
    })
    .await
    .map_err(|e| MedLensError::Other(anyhow::anyhow!("image decode task failed: {e}")))??;

    let text = engine.extract(&png).await?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mock::MockOcr;
    use base64::engine::general_purpose::STANDARD;
    use image::{ImageBuffer, Rgb};

    /// A small white PNG, base64-encoded.
    pub(crate) fn white_png_base64() -> String {
        let img = ImageBuffer::from_pixel(8, 8, Rgb([255u8, 255, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(buffer)
    }

    #[test]
    fn strips_data_url_prefix() {
        assert_eq!(strip_data_url("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url("  AAAA  "), "AAAA");
        assert_eq!(strip_data_url("data:image/png;base64"), "data:image/png;base64");
        assert_eq!(strip_data_url("data:text/plain,AAAA"), "data:text/plain,AAAA");
    }

    #[test]
    fn decodes_raw_and_data_url_payloads() {
        let b64 = white_png_base64();
        assert_eq!(decode_image_payload(&b64).unwrap().width(), 8);

        let data_url = format!("data:image/png;base64,{b64}");
        assert_eq!(decode_image_payload(&data_url).unwrap().height(), 8);
    }

    #[test]
    fn tolerates_whitespace_and_missing_padding() {
        let b64 = white_png_base64();
        let unpadded = b64.trim_end_matches('=');
        let wrapped: String = unpadded
            .as_bytes()
            .chunks(20)
            .map(|c| String::from_utf8_lossy(c).to_string())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(decode_image_payload(&wrapped).is_ok());
    }

    #[test]
    fn malformed_base64_is_invalid_image() {
        let err = decode_image_payload("!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, MedLensError::InvalidImage(_)));
    }

    #[test]
    fn non_image_bytes_are_invalid_image() {
        let payload = STANDARD.encode(b"just some text, definitely not an image");
        let err = decode_image_payload(&payload).unwrap_err();
        assert!(matches!(err, MedLensError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn extract_text_trims_engine_output() {
        let ocr = MockOcr::with_text("  Drinking bleach cures COVID-19 \n");
        let text = extract_text(&ocr, &white_png_base64()).await.unwrap();
        assert_eq!(text, "Drinking bleach cures COVID-19");
    }

    #[tokio::test]
    async fn extract_text_reports_invalid_payload_before_ocr() {
        let ocr = MockOcr::failing("TesseractError");
        let err = extract_text(&ocr, "%%%").await.unwrap_err();
        assert!(matches!(err, MedLensError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn raw_bytes_go_through_the_same_pipeline() {
        let bytes = STANDARD.decode(white_png_base64()).unwrap();
        let ocr = MockOcr::with_text("Garlic lowers blood pressure\n");
        let text = extract_text_from_bytes(&ocr, bytes).await.unwrap();
        assert_eq!(text, "Garlic lowers blood pressure");

        let err = extract_text_from_bytes(&ocr, b"%PDF-1.4".to_vec()).await.unwrap_err();
        assert!(matches!(err, MedLensError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn extract_text_propagates_engine_failure() {
        let ocr = MockOcr::failing("TesseractError");
        let err = extract_text(&ocr, &white_png_base64()).await.unwrap_err();
        assert!(matches!(err, MedLensError::OcrFailed { category: "TesseractError", .. }));
    }
}
