use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::document::DocumentSource;
use crate::extraction::fields::{FieldRule, FIELD_RULES};
use crate::extraction::sections::{SectionRule, SECTION_RULES};
use crate::extraction::skills::SKILL_VOCABULARY;
use crate::models::cv::CvRecord;
use crate::state::AppState;

/// Multipart part carrying the PDF.
const UPLOAD_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub raw_text: String,
}

#[derive(Serialize)]
pub struct RulesResponse {
    pub fields: &'static [FieldRule],
    pub sections: &'static [SectionRule],
    pub skill_vocabulary: &'static [&'static str],
}

/// POST /api/v1/cv/extract
/// Accepts `multipart/form-data` with the PDF in the `file` part.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CvRecord>, AppError> {
    let data = read_upload(&mut multipart).await?;
    tracing::info!(bytes = data.len(), "Received CV upload");

    // OCR shells out to external processes; keep it off the async workers.
    let pipeline = state.pipeline.clone();
    let record = tokio::task::spawn_blocking(move || pipeline.extract(DocumentSource::Bytes(data)))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    Ok(Json(record))
}

/// POST /api/v1/cv/parse-text
/// Runs field, section and skill extraction over already-acquired text.
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<CvRecord>, AppError> {
    let record = state.pipeline.extract_text(&req.raw_text)?;
    Ok(Json(record))
}

/// GET /api/v1/cv/rules
pub async fn handle_rules() -> Json<RulesResponse> {
    Json(RulesResponse {
        fields: FIELD_RULES,
        sections: SECTION_RULES,
        skill_vocabulary: SKILL_VOCABULARY,
    })
}

async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok(data.to_vec());
    }

    Err(AppError::Validation(format!(
        "Missing multipart field `{UPLOAD_FIELD}`"
    )))
}
