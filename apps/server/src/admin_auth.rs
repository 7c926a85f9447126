//! Static bearer token guarding the admin routes.
//!
//! The configured token is kept only as a SHA-256 digest; presented tokens
//! are hashed and compared digest to digest.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

use crate::{request_context::RequestContext, state::AppState, Error};

#[derive(Clone)]
pub struct AdminToken {
    digest: [u8; 32],
}

impl AdminToken {
    /// `None` for an absent or blank token.
    pub fn from_config(token: Option<&str>) -> Option<Self> {
        let token = token.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self {
            digest: digest(token),
        })
    }

    pub fn verify(&self, presented: &str) -> bool {
        let presented = digest(presented);
        presented
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let authz = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Missing bearer token".to_string()))?
        .to_str()
        .map_err(|_| Error::Unauthorized("Invalid Authorization header".to_string()))?;

    authz
        .strip_prefix("Bearer ")
        .or_else(|| authz.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| {
            Error::Unauthorized("Authorization header must be 'Bearer <token>'".to_string())
        })
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let Some(expected) = state.admin_token.as_ref() else {
        tracing::warn!(request_id = %request_id, "Admin request rejected: no admin token configured");
        return Error::Forbidden("Admin API is disabled".to_string()).into_response();
    };

    match bearer_token(req.headers()) {
        Ok(token) if expected.verify(token) => next.run(req).await,
        Ok(_) => {
            tracing::warn!(request_id = %request_id, "Admin request rejected: invalid token");
            Error::Unauthorized("Invalid admin token".to_string()).into_response()
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "Admin request rejected");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn blank_token_disables_admin() {
        assert!(AdminToken::from_config(None).is_none());
        assert!(AdminToken::from_config(Some("  ")).is_none());
    }

    #[test]
    fn verifies_only_the_configured_token() {
        let token = AdminToken::from_config(Some("s3cret")).unwrap();
        assert!(token.verify("s3cret"));
        assert!(!token.verify("s3cret "));
        assert!(!token.verify(""));
    }

    #[test]
    fn parses_bearer_scheme_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(Error::Unauthorized(_))));
    }
}
