//! Prometheus metrics for the directory server

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGauge, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "roster_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "roster_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "roster_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "roster_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Directory Metrics

    /// Directory searches by active filter combination
    pub static ref DIRECTORY_SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "roster_directory_search_total",
        "Total number of directory searches",
        &["text", "under_represented", "senior"]
    )
    .expect("Failed to register DIRECTORY_SEARCH_TOTAL");

    /// Matches per directory search, before pagination
    pub static ref DIRECTORY_SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "roster_directory_search_results",
        "Number of profiles matched by a directory search",
        &["backend"],
        vec![0.0, 1.0, 5.0, 20.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]
    )
    .expect("Failed to register DIRECTORY_SEARCH_RESULTS");

    pub static ref PROFILE_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "roster_profile_writes_total",
        "Profile create/update/delete operations",
        &["operation", "status"]
    )
    .expect("Failed to register PROFILE_WRITES_TOTAL");

    // Database Metrics

    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "roster_db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("Failed to register DB_QUERY_DURATION_SECONDS");

    pub static ref DB_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "roster_db_connections_active",
        "Number of active database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_ACTIVE");

    pub static ref DB_CONNECTIONS_IDLE: IntGauge = register_int_gauge!(
        "roster_db_connections_idle",
        "Number of idle database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_IDLE");

    /// Public profiles currently listed, refreshed on scrape
    pub static ref PUBLIC_PROFILES: IntGauge = register_int_gauge!(
        "roster_public_profiles",
        "Number of public profiles in the directory"
    )
    .expect("Failed to register PUBLIC_PROFILES");
}

/// Collapse numeric ids and country codes so label cardinality stays bounded.
///
/// `/list/42` becomes `/list/{id}`, `/admin/countries/FRA` becomes
/// `/admin/countries/{code}`.
pub fn sanitize_path(path: &str) -> String {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    if segments.len() <= 1 {
        return "/".to_string();
    }

    let mut out = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let previous = if i > 0 { segments[i - 1] } else { "" };
        let replaced = if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
            "{id}"
        } else if previous == "countries" && i == segments.len() - 1 && segments.len() > 3 {
            "{code}"
        } else {
            segment
        };
        out.push(replaced);
    }
    out.join("/")
}

/// Coarse area of the HTTP surface a path belongs to.
pub fn route_area(path: &str) -> &'static str {
    let first = path.trim_start_matches('/').split('/').next().unwrap_or("");
    match first {
        "list" | "countries-autocomplete" => "directory",
        "api" => "stats",
        "admin" => "admin",
        "health" | "ready" | "metrics" | "" => "system",
        _ => "other",
    }
}

/// Record one directory search.
pub fn record_search(has_text: bool, under_represented: bool, senior: bool, backend: &str, matched: usize) {
    DIRECTORY_SEARCH_TOTAL
        .with_label_values(&[flag(has_text), flag(under_represented), flag(senior)])
        .inc();
    DIRECTORY_SEARCH_RESULTS
        .with_label_values(&[backend])
        .observe(matched as f64);
}

fn flag(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
