//! `POST /analyze` - multipart form in, JSON analysis out.

use axum::{
    extract::{Multipart, State},
    Json,
};
use narr_core::input::{self, UploadedFile};
use narr_core::AnalysisMetadata;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of a successful analysis.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub structure: String,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<String>,
    pub summary: String,
    pub metadata: AnalysisMetadata,
}

/// Fields collected from the form.
#[derive(Default)]
struct AnalyzeForm {
    text: Option<String>,
    file: Option<UploadedFile>,
    structure: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, ApiError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => form.text = Some(field.text().await?),
            "structure" => form.structure = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile {
                    name: file_name,
                    bytes: bytes.to_vec(),
                });
            }
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let form = read_form(multipart).await?;

    let structure = input::parse_structure_choice(form.structure.as_deref())?;
    let extracted = input::extract_text(
        form.text.as_deref(),
        form.file.as_ref(),
        &state.settings.limits,
    )?;
    debug!(source = ?extracted.source, bytes = extracted.text.len(), "Extracted input text");

    let result = state.analyzer.analyze(&extracted.text, structure)?;
    info!(
        id = %result.metadata.id,
        structure = %result.structure_type,
        auto_detected = result.metadata.auto_detected,
        "Served analysis"
    );

    Ok(Json(AnalyzeResponse {
        structure: result.structure,
        analysis: result.analysis,
        visualization: Some(result.visualization).filter(|v| !v.is_empty()),
        summary: result.summary,
        metadata: result.metadata,
    }))
}
