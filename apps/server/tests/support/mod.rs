#![allow(dead_code)]

pub mod assertions;
pub mod builders;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use roster::{
    api::create_router,
    config::StorageBackend,
    db::{InMemoryProfileStore, ProfileStore},
    AppState, Config,
};
use roster_models::{Country, Profile};
use tower::ServiceExt as _;

pub use assertions::*;
pub use builders::*;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryProfileStore>,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::new_with_config(|_| {}).await
    }

    pub async fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.admin.token = Some(ADMIN_TOKEN.to_string());
        configure(&mut config);

        let store = Arc::new(InMemoryProfileStore::new());
        let state = AppState::from_store(config, store.clone() as Arc<dyn ProfileStore>)
            .context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self {
            router,
            state,
            store,
        })
    }

    pub async fn country(&self, code: &str, name: &str, under_represented: bool) -> anyhow::Result<Country> {
        self.store
            .upsert_country(code, name, under_represented)
            .await
            .context("insert country")
    }

    /// Insert a profile directly, bypassing the admin API.
    pub async fn profile(&self, builder: ProfileBuilder) -> anyhow::Result<Profile> {
        let (draft, country_code) = builder.into_parts();
        let country_id = match country_code {
            Some(code) => Some(
                self.store
                    .get_country_by_code(&code)
                    .await?
                    .with_context(|| format!("country {code} not seeded"))?
                    .id,
            ),
            None => None,
        };
        self.store
            .create_profile(draft, country_id)
            .await
            .context("insert profile")
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request(Method::GET, path_and_query, None).await
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn admin_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let bearer = format!("Bearer {ADMIN_TOKEN}");
        self.request_with_extra_headers(method, path, body, &[("authorization", &bearer)])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}
