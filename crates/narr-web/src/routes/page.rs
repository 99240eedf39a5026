//! Upload page route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use narr_core::input::ACCEPTED_EXTENSIONS;
use narr_core::{NarrError, StructureInfo};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    structures: Vec<StructureInfo>,
    accept: String,
}

/// GET / - Render the upload form.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let template = IndexTemplate {
        structures: state.analyzer.registry().list(),
        accept,
    };

    let html = template
        .render()
        .map_err(|e| NarrError::Template(e.to_string()))?;
    Ok(Html(html))
}
