//! Metrics endpoint handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::state::AppState;

/// Prometheus text exposition of the registry plus the service gauges.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let custom_metrics = state
        .metrics_service
        .collect_custom_metrics(env!("CARGO_PKG_VERSION"))
        .await;

    let mut buffer = vec![];
    match TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        Ok(_) => {
            buffer.extend_from_slice(custom_metrics.as_bytes());
            (
                StatusCode::OK,
                [("Content-Type", "text/plain; version=0.0.4; charset=utf-8")],
                buffer,
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("Content-Type", "text/plain")],
                b"Failed to encode metrics".to_vec(),
            )
        }
    }
}
