pub mod error;
mod handlers;
pub mod middleware;
pub mod response;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::Database;
use middleware::SecurityConfig;

pub fn create_router(db: Database, security: SecurityConfig) -> Router {
    let api = Router::new()
        // Dictation
        .route(
            "/dictation/config",
            get(handlers::get_config).put(handlers::update_config),
        )
        .route("/dictation/task/create", post(handlers::create_task))
        // Feedback
        .route("/feedback/create", post(handlers::create_feedback))
        .route("/feedback/list", get(handlers::list_feedback))
        .route("/feedback/{id}/detail", get(handlers::get_feedback_detail))
        .route_layer(from_fn_with_state(
            security.clone(),
            middleware::require_api_key,
        ))
        // Health stays reachable without the API key
        .route("/health", get(handlers::health));

    Router::new().nest("/api", api).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(security.cors_layer()),
    )
    .with_state(db)
}
