//! Structure catalogue route handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use narr_core::{StructureInfo, StructureType};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PromptResponse {
    pub structure: StructureType,
    pub display_name: String,
    pub prompt: String,
}

/// GET /api/structures
pub async fn list_structures(State(state): State<AppState>) -> Json<Vec<StructureInfo>> {
    Json(state.analyzer.registry().list())
}

/// GET /api/structures/{slug}/prompt
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PromptResponse>, ApiError> {
    let unknown = || ApiError::not_found(format!("Unknown structure: {}", slug));

    let structure_type: StructureType = slug.parse().map_err(|_| unknown())?;
    let structure = state.analyzer.registry().get(structure_type).ok_or_else(unknown)?;

    Ok(Json(PromptResponse {
        structure: structure_type,
        display_name: structure.display_name().to_string(),
        prompt: structure.prompt(),
    }))
}
