mod config;
mod errors;
mod extraction;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::document::PdfDocument;
use crate::extraction::ocr::TesseractOcr;
use crate::extraction::pipeline::CvPipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV extractor v{}", env!("CARGO_PKG_VERSION"));

    // OCR fallback: scanned pages stay empty if either binary is missing
    let ocr = TesseractOcr::new(config.ocr.clone());
    if !ocr.is_available() {
        warn!(
            cmd = %config.ocr.tesseract_cmd,
            "tesseract not runnable; OCR fallback will yield empty pages"
        );
    }
    if !PdfDocument::rasterizer_available(&config.ocr) {
        warn!(
            cmd = %config.ocr.pdftoppm_cmd,
            "pdftoppm not runnable; scanned pages cannot be rasterized"
        );
    }
    info!(
        "OCR fallback: {} at {} dpi ({})",
        config.ocr.tesseract_cmd, config.ocr.dpi, config.ocr.language
    );

    let pipeline = CvPipeline::new(Arc::new(ocr), config.ocr.clone())
        .context("failed to compile extraction rule tables")?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
