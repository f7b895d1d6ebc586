use thiserror::Error;

/// Conditions that end a pipeline run for one document. No partial record is produced.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Document could not be read: {0}")]
    DocumentRead(String),

    #[error("No text extracted from document")]
    NoTextExtracted,
}

/// Failure of a single page's native or optical pass.
/// Recovered inside the text acquirer; the page contributes empty text.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("native text extraction failed: {0}")]
    Native(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("optical recognition failed: {0}")]
    Ocr(String),
}

impl PageError {
    /// Pipeline stage the failure belongs to, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            PageError::Native(_) => "native",
            PageError::Rasterize(_) | PageError::Ocr(_) => "ocr",
        }
    }
}

/// Failure to derive a year count from the service duration field.
/// Recovered inside the field extractor; `years_of_service` stays unset.
#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("expected exactly two date tokens, found {0}")]
    TokenCount(usize),

    #[error("unparseable date token '{0}'")]
    Unparseable(String),
}
