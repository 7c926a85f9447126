//! Public directory routes

use crate::api::handlers::directory;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(directory::list_profiles))
        .route("/list/", get(directory::list_profiles))
        .route("/list/:id", get(directory::profile_detail))
        .route("/countries-autocomplete", get(directory::countries_autocomplete))
}
