use std::sync::Arc;

use crate::config::Config;
use crate::extraction::pipeline::CvPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled rule tables and the OCR engine; shared read-only across requests.
    pub pipeline: Arc<CvPipeline>,
}
