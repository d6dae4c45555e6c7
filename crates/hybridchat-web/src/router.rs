//! Axum router — maps URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::config::ServerConfig;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    chat::chat_submit,
    health::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/health",   get(health))
        .route("/api/chat", post(chat_submit))

        // Middleware
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(cors_layer(server.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        tracing::warn!("No CORS origin configured, allowing any origin");
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(origin, "Unusable CORS origin, allowing any origin");
            CorsLayer::permissive()
        }
    }
}
