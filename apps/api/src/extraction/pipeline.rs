//! CV pipeline: TextAcquirer → {FieldExtractor, SectionSegmenter} → SkillExtractor.
//!
//! Synchronous and stateless between runs: every call is a pure function of its
//! input document. Async callers must go through `tokio::task::spawn_blocking`
//! because OCR runs external processes.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::extraction::acquire::TextAcquirer;
use crate::extraction::document::{DocumentSource, PagedDocument};
use crate::extraction::error::ExtractionError;
use crate::extraction::fields::FieldExtractor;
use crate::extraction::ocr::OcrEngine;
use crate::extraction::sections::SectionSegmenter;
use crate::extraction::skills::SkillExtractor;
use crate::models::cv::CvRecord;

const PREVIEW_CHARS: usize = 500;

pub struct CvPipeline {
    acquirer: TextAcquirer,
    fields: FieldExtractor,
    sections: SectionSegmenter,
    skills: SkillExtractor,
}

impl CvPipeline {
    /// Pipeline with the built-in rule tables and the given OCR engine.
    pub fn new(ocr: Arc<dyn OcrEngine>, config: OcrConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            acquirer: TextAcquirer::new(ocr, config),
            fields: FieldExtractor::standard()?,
            sections: SectionSegmenter::standard()?,
            skills: SkillExtractor::standard()?,
        })
    }

    /// Runs the full pipeline on a PDF.
    pub fn extract(&self, source: DocumentSource) -> Result<CvRecord, ExtractionError> {
        let text = self.acquirer.acquire(source)?;
        self.extract_text(&text)
    }

    /// Runs the full pipeline on an already-opened document.
    #[allow(dead_code)]
    pub fn extract_document(
        &self,
        document: &dyn PagedDocument,
    ) -> Result<CvRecord, ExtractionError> {
        let text = self.acquirer.acquire_from(document);
        self.extract_text(&text)
    }

    /// Runs the three extractors over acquired text.
    pub fn extract_text(&self, text: &str) -> Result<CvRecord, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoTextExtracted);
        }
        debug!(preview = %preview(text), "Extracted text preview");

        let fields = self.fields.extract(text);
        let sections = self.sections.segment(text);
        let skills_list = self.skills.extract(&sections, text);

        info!(
            chars = text.len(),
            fields = fields.found_count(),
            sections = sections.found_count(),
            skills = skills_list.len(),
            "CV extraction complete"
        );

        Ok(CvRecord {
            fields,
            sections,
            skills_list,
        })
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
