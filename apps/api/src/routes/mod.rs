pub mod health;
pub mod home;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::create_session))
        .route("/api/v1/sessions/:id", delete(session::end_session))
        .route("/api/v1/sessions/:id/credential", put(session::set_credential))
        .route("/api/v1/sessions/:id/document", put(session::upload_document))
        // Evaluation views
        .route("/api/v1/sessions/:id/views/:view", get(evaluation::handle_view))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
