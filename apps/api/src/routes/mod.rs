pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/screenings",
            get(handlers::handle_list_screenings).post(handlers::handle_create_screening),
        )
        .route("/api/v1/files", get(handlers::handle_download_file))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
