use anyhow::Context as _;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

pub fn json_body(body: &Bytes) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("response body is JSON")
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, body: &Bytes) {
    assert_eq!(
        actual,
        expected,
        "unexpected status; body: {}",
        String::from_utf8_lossy(body)
    );
}

/// Ids of the `results` array of a search page, in order.
pub fn result_ids(page: &Value) -> anyhow::Result<Vec<i64>> {
    page.get("results")
        .and_then(|v| v.as_array())
        .context("page.results is array")?
        .iter()
        .map(|r| r.get("id").and_then(|v| v.as_i64()).context("result.id"))
        .collect()
}

/// Assert the standard error envelope and return its `code`.
pub fn assert_error(value: &Value, status: StatusCode) -> anyhow::Result<String> {
    let error = value.get("error").context("error envelope")?;
    assert_eq!(
        error.get("status").and_then(|v| v.as_u64()),
        Some(u64::from(status.as_u16())),
        "error.status"
    );
    Ok(error
        .get("code")
        .and_then(|v| v.as_str())
        .context("error.code")?
        .to_string())
}

/// Field names listed in an error envelope's `fields`.
pub fn error_fields(value: &Value) -> Vec<String> {
    value
        .pointer("/error/fields")
        .and_then(|v| v.as_array())
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.get("field").and_then(|v| v.as_str()).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
