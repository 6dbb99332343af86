//! Text extraction for claim checking: OCR on images submitted as base64,
//! data-URLs, or raw bytes, and text from uploaded documents.

pub mod documents;
pub mod mock;
pub mod ocr;
pub mod payload;

pub use documents::{extract_document, DocumentKind, ExtractedDocument};
pub use mock::MockOcr;
pub use ocr::TesseractOcr;
pub use payload::{
    decode_image_bytes, decode_image_payload, extract_text, extract_text_from_bytes, strip_data_url,
};
