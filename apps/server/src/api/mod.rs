//! API layer - routes, handlers, and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    let admin_router = routes::admin::admin_routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        crate::admin_auth::admin_middleware,
    ));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/", get(root))
        .route("/favicon.ico", get(favicon))
        .merge(routes::metrics::metrics_routes())
        .merge(routes::directory::directory_routes())
        .nest("/api", routes::stats::stats_routes())
        .nest("/admin", admin_router)
        .with_state(state)
        // Applied in reverse order
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "roster"
    }))
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "backend": state.store.backend() })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "backend": state.store.backend() })),
            )
        }
    }
}

async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "server": "Roster member directory",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.store.backend(),
        "pageSize": state.config.directory.page_size,
        "status": "running"
    }))
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
