//! Per-request context injected by middleware.

/// Inserted into request extensions by the request id middleware.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: String,
}
