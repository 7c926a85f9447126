//! Read-only statistics routes, nested under `/api`

use crate::api::handlers::{directory, stats};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(stats::represented_countries))
        .route("/positions", get(stats::top_positions))
        .route("/enumerations", get(directory::enumerations))
}
