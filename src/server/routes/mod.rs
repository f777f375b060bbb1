//! Route definitions.

mod extract;
mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub use extract::*;
pub use health::*;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let limit = state.server.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_check))
        .route("/extract/pdf", post(extract::extract_pdf))
        .route("/extract/image", post(extract::extract_image))
        .route("/extract/docx", post(extract::extract_docx))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
