//! Handlers for the upload → analysis → job search pages.

use axum::{
    extract::{Multipart, State},
    response::Html,
    Form,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::render;
use crate::state::AppState;
use crate::workflow::TracingProgress;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct JobsForm {
    pub summary: String,
}

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render::index_page())
}

/// POST /analyze
///
/// Extracts the uploaded resume and renders the three analysis panels.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut document: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(RESUME_FIELD) {
            info!(file_name = ?field.file_name(), "Resume upload received");
            document = Some(field.bytes().await?);
        }
    }
    let document =
        document.ok_or_else(|| AppError::Validation("No resume file was uploaded".to_string()))?;

    let report = state
        .advisor
        .analyze(document, &TracingProgress::new())
        .await?;

    Ok(Html(render::analysis_page(&report)))
}

/// POST /jobs
///
/// Derives keywords from the summary and renders both job boards' results.
pub async fn handle_jobs(
    State(state): State<AppState>,
    Form(form): Form<JobsForm>,
) -> Result<Html<String>, AppError> {
    if form.summary.trim().is_empty() {
        return Err(AppError::Validation("summary cannot be empty".to_string()));
    }

    let report = state
        .advisor
        .find_jobs(&form.summary, &TracingProgress::new())
        .await?;

    Ok(Html(render::jobs_page(&report)))
}

pub async fn handle_not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}
