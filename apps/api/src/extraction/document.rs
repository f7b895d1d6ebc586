//! Paged documents: the unit the text acquirer walks page by page.
//!
//! `PdfDocument` reads the native text layer with `lopdf` and rasterizes
//! pages with poppler's `pdftoppm` for the OCR fallback. Its staging directory
//! is a `TempDir`, so it is removed on every exit path when the document drops.

use std::path::PathBuf;
use std::process::Command;

use lopdf::Document;
use tempfile::TempDir;

use crate::config::OcrConfig;
use crate::extraction::error::{ExtractionError, PageError};

/// Where a document comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Local file. The HTTP surface only uploads bytes.
    #[allow(dead_code)]
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl DocumentSource {
    fn read(self) -> Result<Vec<u8>, ExtractionError> {
        match self {
            DocumentSource::Bytes(data) => Ok(data),
            DocumentSource::Path(path) => std::fs::read(&path).map_err(|e| {
                ExtractionError::DocumentRead(format!("{}: {e}", path.display()))
            }),
        }
    }
}

/// A rasterized page, PNG-encoded.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub png: Vec<u8>,
    pub dpi: u32,
}

/// A multi-page source. Page indices are 0-based and follow document order.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Text from the page's embedded text layer. May be empty for scanned pages.
    fn native_text(&self, index: usize) -> Result<String, PageError>;

    /// Renders the page to an image at the given resolution.
    fn rasterize(&self, index: usize, dpi: u32) -> Result<PageImage, PageError>;
}

/// A PDF held in memory and staged on disk for the rasterizer.
pub struct PdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
    staging: TempDir,
    pdftoppm_cmd: String,
}

impl PdfDocument {
    /// Opens a PDF. A missing file or corrupt structure is a `DocumentRead` error.
    pub fn open(source: DocumentSource, ocr: &OcrConfig) -> Result<Self, ExtractionError> {
        let data = source.read()?;
        let doc = Document::load_mem(&data)
            .map_err(|e| ExtractionError::DocumentRead(format!("invalid PDF: {e}")))?;

        // BTreeMap keys: page numbers in ascending (document) order.
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let staging = tempfile::Builder::new()
            .prefix("cv-extractor-")
            .tempdir()
            .map_err(|e| ExtractionError::DocumentRead(format!("failed to stage document: {e}")))?;
        std::fs::write(staging.path().join("input.pdf"), &data)
            .map_err(|e| ExtractionError::DocumentRead(format!("failed to stage document: {e}")))?;

        Ok(Self {
            doc,
            page_numbers,
            staging,
            pdftoppm_cmd: ocr.pdftoppm_cmd.clone(),
        })
    }

    /// True when the configured rasterizer can be spawned.
    /// Older poppler builds exit non-zero on `-v`, so only the spawn is checked.
    pub fn rasterizer_available(ocr: &OcrConfig) -> bool {
        Command::new(&ocr.pdftoppm_cmd).arg("-v").output().is_ok()
    }

    fn page_number(&self, index: usize) -> Result<u32, PageError> {
        self.page_numbers
            .get(index)
            .copied()
            .ok_or_else(|| PageError::Native(format!("page index {index} out of range")))
    }
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn native_text(&self, index: usize) -> Result<String, PageError> {
        let page = self.page_number(index)?;
        self.doc
            .extract_text(&[page])
            .map_err(|e| PageError::Native(e.to_string()))
    }

    fn rasterize(&self, index: usize, dpi: u32) -> Result<PageImage, PageError> {
        let page = self
            .page_number(index)
            .map_err(|e| PageError::Rasterize(e.to_string()))?
            .to_string();
        let input = self.staging.path().join("input.pdf");
        let prefix = self.staging.path().join(format!("page-{page}"));

        let output = Command::new(&self.pdftoppm_cmd)
            .arg("-png")
            .arg("-singlefile")
            .args(["-r", &dpi.to_string(), "-f", &page, "-l", &page])
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| PageError::Rasterize(format!("failed to run {}: {e}", self.pdftoppm_cmd)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageError::Rasterize(format!(
                "{} exited with {}: {}",
                self.pdftoppm_cmd,
                output.status,
                stderr.trim()
            )));
        }

        let image_path = prefix.with_extension("png");
        let png = std::fs::read(&image_path)
            .map_err(|e| PageError::Rasterize(format!("missing rendered page: {e}")))?;
        std::fs::remove_file(&image_path).ok();

        Ok(PageImage { png, dpi })
    }
}
