//! Metrics middleware - tracks HTTP request metrics

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

fn content_length(headers: &axum::http::HeaderMap) -> Option<f64> {
    headers
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = crate::metrics::sanitize_path(req.uri().path());

    crate::metrics::HTTP_REQUESTS_IN_FLIGHT
        .with_label_values(&[&method, &path])
        .inc();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    crate::metrics::HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    crate::metrics::HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(start.elapsed().as_secs_f64());

    if let Some(size) = content_length(response.headers()) {
        crate::metrics::HTTP_RESPONSE_SIZE_BYTES
            .with_label_values(&[&method, &path, &status])
            .observe(size);
    }

    crate::metrics::HTTP_REQUESTS_IN_FLIGHT
        .with_label_values(&[&method, &path])
        .dec();

    response
}
