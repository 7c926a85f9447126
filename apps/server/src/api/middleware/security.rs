//! Security headers middleware

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

const BASELINE_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", "default-src 'none'"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-site"),
];

fn is_https(req: &Request) -> bool {
    let forwarded = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("https"));
    forwarded
        || req
            .uri()
            .scheme_str()
            .is_some_and(|s| s.eq_ignore_ascii_case("https"))
}

/// Adds baseline hardening headers; HSTS only behind HTTPS.
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let https = is_https(&req);

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in BASELINE_HEADERS {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    if https {
        headers.insert(
            "strict-transport-security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
