use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions/start", post(handlers::start_session))
        .route(
            "/sessions/:session_id/questions/start",
            post(handlers::start_question),
        )
        .route(
            "/sessions/:session_id/questions/end",
            post(handlers::end_question),
        )
        .route("/sessions/:session_id/audio", post(handlers::push_audio))
        .route("/sessions/:session_id/finish", post(handlers::finish_session))
        .route("/sessions/:session_id/abort", post(handlers::abort_session))
        // Session queries
        .route(
            "/sessions/:session_id/status",
            get(handlers::get_session_status),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // The recording controller runs in a browser
        .layer(CorsLayer::permissive())
        .with_state(state)
}
