//! Storage seam for the directory

use crate::Result;
use async_trait::async_trait;
use roster_models::{Country, Profile, ProfileDraft, User};
use roster_search::Predicate;
use serde::Serialize;

/// Public profile count for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub id: i64,
    pub name: String,
    pub profiles_count: i64,
}

/// Public profile count for one stored position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionCount {
    pub position: String,
    pub profiles_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
}

/// Storage operations behind the directory services.
///
/// Implementations must evaluate a [`Predicate`] exactly as
/// [`Predicate::matches`] does, so a search returns the same profiles
/// whichever backend is configured.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Short backend name used in logs and metric labels.
    fn backend(&self) -> &'static str;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;

    /// Profiles satisfying `predicate`, most recently published first.
    /// Profiles published at the same instant come back in id order.
    async fn find_profiles(&self, predicate: &Predicate) -> Result<Vec<Profile>>;

    /// Any profile by id, public or not.
    async fn get_profile(&self, id: i64) -> Result<Option<Profile>>;

    /// Insert a profile. `publish_date` defaults to now.
    async fn create_profile(&self, draft: ProfileDraft, country_id: Option<i64>) -> Result<Profile>;

    /// Replace a profile's writable fields.
    ///
    /// # Errors
    /// * `NotFound` - no profile with `id`
    async fn update_profile(
        &self,
        id: i64,
        draft: ProfileDraft,
        country_id: Option<i64>,
    ) -> Result<Profile>;

    /// Returns `false` when nothing was deleted.
    async fn delete_profile(&self, id: i64) -> Result<bool>;

    /// All countries, sorted by name.
    async fn list_countries(&self) -> Result<Vec<Country>>;

    async fn get_country_by_code(&self, code: &str) -> Result<Option<Country>>;

    /// Insert a country or update the one with the same code.
    async fn upsert_country(
        &self,
        code: &str,
        name: &str,
        is_under_represented: bool,
    ) -> Result<Country>;

    /// Countries with at least one public profile, sorted by name.
    async fn count_public_by_country(&self) -> Result<Vec<CountryCount>>;

    /// Public profiles grouped by stored position, largest group first,
    /// ties by position.
    async fn count_public_by_position(&self) -> Result<Vec<PositionCount>>;

    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Remove every profile, user and country.
    async fn clear_directory(&self) -> Result<()>;
}
