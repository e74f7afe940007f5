use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::llm::ChatService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/provider", get(handlers::provider_info))
        .route("/chat", post(handlers::chat))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
        .layer(CorsLayer::permissive())
}
