use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub ocr: OcrConfig,
}

/// Settings for the rasterize-and-recognize fallback.
///
/// Passed by value into the text acquirer and the OCR engine, so several
/// configurations can live side by side (tests, alternate language packs).
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Path or name of the tesseract binary.
    pub tesseract_cmd: String,
    /// Path or name of the poppler `pdftoppm` binary used to rasterize pages.
    pub pdftoppm_cmd: String,
    pub dpi: u32,
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            pdftoppm_cmd: "pdftoppm".to_string(),
            dpi: 300,
            language: "eng".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ocr_defaults = OcrConfig::default();

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            ocr: OcrConfig {
                tesseract_cmd: env_or("TESSERACT_CMD", ocr_defaults.tesseract_cmd)?,
                pdftoppm_cmd: env_or("PDFTOPPM_CMD", ocr_defaults.pdftoppm_cmd)?,
                dpi: env_or("OCR_DPI", ocr_defaults.dpi)?,
                language: env_or("OCR_LANGUAGE", ocr_defaults.language)?,
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_defaults_match_recognition_resolution() {
        let ocr = OcrConfig::default();
        assert_eq!(ocr.dpi, 300);
        assert_eq!(ocr.language, "eng");
        assert_eq!(ocr.tesseract_cmd, "tesseract");
        assert_eq!(ocr.pdftoppm_cmd, "pdftoppm");
    }

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let port: u16 = env_or("CV_EXTRACTOR_TEST_UNSET_PORT", 9090).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_env_or_parses_present_value() {
        std::env::set_var("CV_EXTRACTOR_TEST_DPI", " 150 ");
        let dpi: u32 = env_or("CV_EXTRACTOR_TEST_DPI", 300).unwrap();
        assert_eq!(dpi, 150);
    }

    #[test]
    fn test_env_or_rejects_malformed_value() {
        std::env::set_var("CV_EXTRACTOR_TEST_BAD_PORT", "eighty");
        let err = env_or::<u16>("CV_EXTRACTOR_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("CV_EXTRACTOR_TEST_BAD_PORT"));
    }
}
