//! Tesseract OCR, driven as a child process.
//!
//! The PNG is written to stdin and plain text is read back from stdout, so no
//! temporary files are involved.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use medlens_core::{MedLensError, OcrEngine};

/// Page segmentation mode 6: assume a single uniform block of text.
pub const PAGE_SEG_MODE: u8 = 6;

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    psm: u8,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            psm: PAGE_SEG_MODE,
        }
    }
}

impl TesseractOcr {
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    /// Probe the system for a working `tesseract`. `None` means OCR is disabled.
    pub async fn detect() -> Option<Self> {
        Self::default().probe().await
    }

    pub async fn probe(self) -> Option<Self> {
        let status = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(s) if s.success() => {
                info!(binary = %self.binary, "OCR engine available");
                Some(self)
            }
            Ok(s) => {
                warn!(binary = %self.binary, status = %s, "OCR engine probe failed");
                None
            }
            Err(e) => {
                warn!(binary = %self.binary, error = %e, "OCR engine not found");
                None
            }
        }
    }

    fn failed(category: &'static str, message: impl Into<String>) -> MedLensError {
        MedLensError::OcrFailed {
            category,
            message: message.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract(&self, png: &[u8]) -> Result<String, MedLensError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "--psm"])
            .arg(self.psm.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::failed("SpawnError", e.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Self::failed("IoError", "stdin not captured"))?;
        let input = png.to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Self::failed("IoError", e.to_string()))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Self::failed("IoError", e.to_string())),
            Err(e) => return Err(Self::failed("IoError", e.to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Self::failed("TesseractError", stderr));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "OCR finished");
        Ok(text)
    }
}
