//! Roster - member directory server
//!
//! Serves a searchable directory of member profiles:
//! - Filtered, paginated listing with under-represented and senior toggles
//! - Public profile detail and country autocomplete
//! - Read-only statistics by country and position
//! - Token-guarded admin writes
//! - PostgreSQL or in-memory storage

#![allow(
    clippy::too_many_arguments,      // Store writes take the full draft plus keys
    clippy::large_enum_variant,      // Error variants carry rich context
)]

pub mod admin_auth;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
