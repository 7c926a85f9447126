//! Statistics handlers

use axum::{extract::State, Json};

use crate::db::CountryCount;
use crate::services::PositionStat;
use crate::state::AppState;
use crate::Result;

pub async fn represented_countries(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryCount>>> {
    Ok(Json(state.stats_service.represented_countries().await?))
}

pub async fn top_positions(State(state): State<AppState>) -> Result<Json<Vec<PositionStat>>> {
    Ok(Json(state.stats_service.top_positions().await?))
}
