pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analyzer page
        .route("/", get(handlers::handle_index))
        .route("/analyze", post(handlers::handle_analyze_form))
        // JSON API
        .route("/api/v1/analyze", post(handlers::handle_analyze_json))
        .with_state(state)
}
