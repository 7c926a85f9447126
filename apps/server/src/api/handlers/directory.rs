//! Public directory handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use roster_models::{Country, Enumerations};

use crate::api::extractors::{AutocompleteParams, ListParams};
use crate::services::{ProfileDetail, SearchPage};
use crate::state::AppState;
use crate::Result;

/// `GET /list`
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<SearchPage>> {
    let query = params.query();
    let page = state
        .directory_service
        .search(&query, params.page.as_deref())
        .await?;
    Ok(Json(page))
}

/// `GET /list/:id`
pub async fn profile_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProfileDetail>> {
    Ok(Json(state.directory_service.get_public(id).await?))
}

/// `GET /countries-autocomplete?q=`
pub async fn countries_autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<Vec<Country>>> {
    let countries = state
        .directory_service
        .countries_autocomplete(&params.q)
        .await?;
    Ok(Json(countries))
}

/// `GET /api/enumerations`
pub async fn enumerations(State(state): State<AppState>) -> Json<Enumerations> {
    Json(state.directory_service.enumerations().clone())
}
