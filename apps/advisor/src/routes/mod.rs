pub mod health;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(pages::handle_index))
        .route("/analyze", post(pages::handle_analyze))
        .route("/jobs", post(pages::handle_jobs))
        .fallback(pages::handle_not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
