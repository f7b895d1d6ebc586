//! Text acquisition: native text layer first, OCR fallback per page.
//!
//! Page failures are logged and recovered (the page contributes empty text).
//! Only a document that cannot be opened at all is an error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::extraction::document::{DocumentSource, PagedDocument, PdfDocument};
use crate::extraction::error::{ExtractionError, PageError};
use crate::extraction::ocr::OcrEngine;

/// Which pass produced a page's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTextSource {
    Native,
    Ocr,
    Failed,
}

pub struct TextAcquirer {
    ocr: Arc<dyn OcrEngine>,
    config: OcrConfig,
}

impl TextAcquirer {
    pub fn new(ocr: Arc<dyn OcrEngine>, config: OcrConfig) -> Self {
        Self { ocr, config }
    }

    /// Opens the source as a PDF and acquires its text.
    /// The document (and its staging directory) is released before returning.
    pub fn acquire(&self, source: DocumentSource) -> Result<String, ExtractionError> {
        let document = PdfDocument::open(source, &self.config)?;
        Ok(self.acquire_from(&document))
    }

    /// Page-ordered text: each page's resolved text followed by a newline.
    pub fn acquire_from(&self, document: &dyn PagedDocument) -> String {
        let mut text = String::new();

        for index in 0..document.page_count() {
            let (page_text, source) = self.page_text(document, index);
            debug!(
                page = index + 1,
                source = ?source,
                chars = page_text.len(),
                "Resolved page text"
            );
            text.push_str(&page_text);
            text.push('\n');
        }

        info!(
            pages = document.page_count(),
            chars = text.len(),
            "Text acquisition complete"
        );
        text
    }

    fn page_text(&self, document: &dyn PagedDocument, index: usize) -> (String, PageTextSource) {
        match document.native_text(index) {
            Ok(native) if !native.trim().is_empty() => return (native, PageTextSource::Native),
            Ok(_) => {}
            Err(e) => log_page_error(index, &e),
        }

        match self.recognize_page(document, index) {
            Ok(ocr_text) => (ocr_text, PageTextSource::Ocr),
            Err(e) => {
                log_page_error(index, &e);
                (String::new(), PageTextSource::Failed)
            }
        }
    }

    fn recognize_page(
        &self,
        document: &dyn PagedDocument,
        index: usize,
    ) -> Result<String, PageError> {
        let image = document.rasterize(index, self.config.dpi)?;
        self.ocr.recognize(&image)
    }
}

fn log_page_error(index: usize, error: &PageError) {
    warn!(page = index + 1, stage = error.stage(), "Page text recovery: {error}");
}
