//! Admin write handlers (token-guarded)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use roster_models::{Country, Profile, ProfileDraft};
use serde::Deserialize;

use crate::api::extractors::ApiJson;
use crate::request_context::RequestContext;
use crate::state::AppState;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct CountryBody {
    pub name: String,
    #[serde(default)]
    pub is_under_represented: bool,
}

pub async fn create_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    ApiJson(draft): ApiJson<ProfileDraft>,
) -> Result<(StatusCode, Json<Profile>)> {
    let profile = state.directory_service.upsert_profile(None, draft).await?;
    tracing::info!(request_id = %ctx.request_id, profile_id = profile.id, "Admin created profile");
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
    ApiJson(draft): ApiJson<ProfileDraft>,
) -> Result<Json<Profile>> {
    let profile = state
        .directory_service
        .upsert_profile(Some(id), draft)
        .await?;
    tracing::info!(request_id = %ctx.request_id, profile_id = id, "Admin updated profile");
    Ok(Json(profile))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.directory_service.delete_profile(id).await?;
    tracing::info!(request_id = %ctx.request_id, profile_id = id, "Admin deleted profile");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(body): ApiJson<CountryBody>,
) -> Result<Json<Country>> {
    let country = state
        .directory_service
        .upsert_country(&code, &body.name, body.is_under_represented)
        .await?;
    Ok(Json(country))
}
