//! Optical character recognition: pluggable engine behind the `OcrEngine` trait.
//!
//! Default: `TesseractOcr`, which shells out to the tesseract CLI configured in
//! `OcrConfig`. Blocking by nature; callers on an async runtime go through
//! `tokio::task::spawn_blocking`.

use std::io::Write;
use std::process::Command;

use crate::config::OcrConfig;
use crate::extraction::document::PageImage;
use crate::extraction::error::PageError;

/// Converts a page image to text. An empty string is a valid result.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &PageImage) -> Result<String, PageError>;
}

/// Tesseract CLI engine. The binary path is injected, never process-wide.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// True when the configured tesseract binary runs.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.tesseract_cmd)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &PageImage) -> Result<String, PageError> {
        let mut file = tempfile::Builder::new()
            .prefix("cv-extractor-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| PageError::Ocr(format!("failed to create temp image: {e}")))?;
        file.write_all(&image.png)
            .and_then(|_| file.flush())
            .map_err(|e| PageError::Ocr(format!("failed to write temp image: {e}")))?;

        let output = Command::new(&self.config.tesseract_cmd)
            .arg(file.path())
            .arg("stdout")
            .args(["-l", &self.config.language])
            .args(["--dpi", &image.dpi.to_string()])
            .output()
            .map_err(|e| {
                PageError::Ocr(format!("failed to run {}: {e}", self.config.tesseract_cmd))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageError::Ocr(format!(
                "{} exited with {}: {}",
                self.config.tesseract_cmd,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_binary_config() -> OcrConfig {
        OcrConfig {
            tesseract_cmd: "/nonexistent/bin/tesseract-for-tests".to_string(),
            ..OcrConfig::default()
        }
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        assert!(!TesseractOcr::new(missing_binary_config()).is_available());
    }

    #[test]
    fn test_missing_binary_is_page_error_not_panic() {
        let engine = TesseractOcr::new(missing_binary_config());
        let image = PageImage {
            png: vec![0x89, b'P', b'N', b'G'],
            dpi: 300,
        };
        let err = engine.recognize(&image).unwrap_err();
        assert!(matches!(err, PageError::Ocr(msg) if msg.contains("tesseract-for-tests")));
    }

    #[test]
    fn test_two_configs_coexist() {
        let a = TesseractOcr::new(OcrConfig::default());
        let b = TesseractOcr::new(OcrConfig {
            language: "deu".to_string(),
            ..OcrConfig::default()
        });
        assert_eq!(a.config.language, "eng");
        assert_eq!(b.config.language, "deu");
    }
}
