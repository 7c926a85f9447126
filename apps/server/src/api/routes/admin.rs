//! Admin routes; the caller wraps these in the admin token middleware.

use crate::api::handlers::admin;
use crate::state::AppState;
use axum::{
    routing::{post, put},
    Router,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", post(admin::create_profile))
        .route(
            "/profiles/:id",
            put(admin::update_profile).delete(admin::delete_profile),
        )
        .route("/countries/:code", put(admin::upsert_country))
}
