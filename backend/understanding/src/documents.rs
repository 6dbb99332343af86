//! Text extraction from uploaded files.
//!
//! The file kind is chosen by extension. Images (and files with no known
//! extension) go through OCR, PDFs through their text layer, DOCX through its
//! paragraphs, and `.txt` is read as UTF-8. Extraction never fails: anything
//! unreadable yields empty text and a warning.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::{debug, warn};

use medlens_core::OcrEngine;

use crate::payload::extract_text_from_bytes;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
    Docx,
    /// Legacy Word; not parsed.
    Doc,
    /// Not parsed.
    Rtf,
    Txt,
    /// Unknown extension; tried as an image.
    Binary,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            ext if IMAGE_EXTENSIONS.contains(&ext) => Self::Image,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "rtf" => Self::Rtf,
            "txt" => Self::Txt,
            _ => Self::Binary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Rtf => "rtf",
            Self::Txt => "txt",
            Self::Binary => "binary",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    /// Trimmed; empty when nothing readable was found.
    pub text: String,
}

/// Pull the text out of one uploaded file. `ocr` is `None` when the server
/// has no OCR engine, in which case images yield no text.
pub async fn extract_document(
    ocr: Option<&dyn OcrEngine>,
    filename: &str,
    bytes: Vec<u8>,
) -> ExtractedDocument {
    let kind = DocumentKind::from_filename(filename);

    let extracted = match kind {
        DocumentKind::Image | DocumentKind::Binary => match ocr {
            Some(engine) => extract_text_from_bytes(engine, bytes)
                .await
                .map_err(|e| e.to_string()),
            None => Err("OCR not available".to_string()),
        },
        DocumentKind::Pdf => off_thread(move || pdf_text(&bytes)).await,
        DocumentKind::Docx => off_thread(move || docx_text(&bytes)).await,
        DocumentKind::Txt => Ok(utf8_text(&bytes)),
        DocumentKind::Doc | DocumentKind::Rtf => Err("format is not parsed".to_string()),
    };

    let text = match extracted {
        Ok(text) => text.trim().to_string(),
        Err(reason) => {
            warn!(filename, kind = kind.as_str(), %reason, "No text extracted from upload");
            String::new()
        }
    };
    debug!(filename, kind = kind.as_str(), chars = text.chars().count(), "Extracted upload text");

    ExtractedDocument { kind, text }
}

async fn off_thread<F>(extract: F) -> Result<String, String>
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| format!("extraction task failed: {e}"))?
}

/// Invalid sequences are dropped.
fn utf8_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "")
}

/// Selectable text only; scanned PDFs come back empty.
fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}

/// Body paragraphs joined by newlines. Tables and headers are skipped.
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| e.to_string())?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
        .flat_map(|run| run.children.iter())
        .filter_map(|child| match child {
            RunChild::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}
