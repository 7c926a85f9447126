//! In-process store for tests and single-node demos.

use super::traits::{CountryCount, NewUser, PositionCount, ProfileStore};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use roster_models::{Country, Profile, ProfileDraft, User};
use roster_search::{order_by_publish_date, Predicate};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    countries: Vec<Country>,
    profiles: Vec<Profile>,
    users: Vec<User>,
    next_country_id: i64,
    next_profile_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn country(&self, id: Option<i64>) -> Result<Option<Country>> {
        match id {
            None => Ok(None),
            Some(id) => self
                .countries
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .map(Some)
                .ok_or_else(|| Error::Validation(format!("Unknown country id {id}"))),
        }
    }

    /// A user owns at most one profile; `owner` is the profile being written.
    fn check_user_free(&self, user_id: Option<i64>, owner: Option<i64>) -> Result<()> {
        let Some(user_id) = user_id else {
            return Ok(());
        };
        if self
            .profiles
            .iter()
            .any(|p| p.user_id == Some(user_id) && Some(p.id) != owner)
        {
            return Err(Error::Conflict(format!("User {user_id} already has a profile")));
        }
        Ok(())
    }
}

/// Tables behind a single `RwLock`. Rows keep insertion (id) order.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    tables: RwLock<Tables>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_profiles(&self, predicate: &Predicate) -> Result<Vec<Profile>> {
        let tables = self.tables.read().await;
        let mut matched: Vec<Profile> = tables
            .profiles
            .iter()
            .filter(|p| predicate.matches(p))
            .cloned()
            .collect();
        order_by_publish_date(&mut matched);
        Ok(matched)
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn create_profile(&self, draft: ProfileDraft, country_id: Option<i64>) -> Result<Profile> {
        let mut tables = self.tables.write().await;
        let country = tables.country(country_id)?;
        tables.check_user_free(draft.user_id, None)?;

        tables.next_profile_id += 1;
        let profile = Profile::from_draft(tables.next_profile_id, draft, country, Utc::now());
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: i64,
        draft: ProfileDraft,
        country_id: Option<i64>,
    ) -> Result<Profile> {
        let mut tables = self.tables.write().await;
        let country = tables.country(country_id)?;
        if !tables.profiles.iter().any(|p| p.id == id) {
            return Err(Error::NotFound(format!("Profile {id}")));
        }
        tables.check_user_free(draft.user_id, Some(id))?;

        let slot = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Profile {id}")))?;

        let publish_date = draft.publish_date.unwrap_or(slot.publish_date);
        let mut updated = Profile::from_draft(id, draft, country, Utc::now());
        updated.publish_date = publish_date;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_profile(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        Ok(tables.profiles.len() != before)
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        let tables = self.tables.read().await;
        let mut countries = tables.countries.clone();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(countries)
    }

    async fn get_country_by_code(&self, code: &str) -> Result<Option<Country>> {
        let tables = self.tables.read().await;
        Ok(tables.countries.iter().find(|c| c.code == code).cloned())
    }

    async fn upsert_country(
        &self,
        code: &str,
        name: &str,
        is_under_represented: bool,
    ) -> Result<Country> {
        let mut tables = self.tables.write().await;

        let country = if let Some(existing) = tables.countries.iter_mut().find(|c| c.code == code) {
            existing.name = name.to_string();
            existing.is_under_represented = is_under_represented;
            existing.clone()
        } else {
            tables.next_country_id += 1;
            let country = Country::new(tables.next_country_id, code, name, is_under_represented);
            tables.countries.push(country.clone());
            country
        };

        // Profiles embed their country; keep the copies in step.
        for profile in tables.profiles.iter_mut() {
            if profile.country.as_ref().is_some_and(|c| c.id == country.id) {
                profile.country = Some(country.clone());
            }
        }

        Ok(country)
    }

    async fn count_public_by_country(&self) -> Result<Vec<CountryCount>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for country in tables
            .profiles
            .iter()
            .filter(|p| p.is_public)
            .filter_map(|p| p.country.as_ref())
        {
            *counts.entry(country.id).or_default() += 1;
        }

        let mut rows: Vec<CountryCount> = tables
            .countries
            .iter()
            .filter_map(|c| {
                counts.get(&c.id).map(|&n| CountryCount {
                    id: c.id,
                    name: c.name.clone(),
                    profiles_count: n,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn count_public_by_position(&self) -> Result<Vec<PositionCount>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for profile in tables.profiles.iter().filter(|p| p.is_public) {
            *counts.entry(profile.position.as_str()).or_default() += 1;
        }

        let mut rows: Vec<PositionCount> = counts
            .into_iter()
            .map(|(position, n)| PositionCount {
                position: position.to_string(),
                profiles_count: n,
            })
            .collect();
        // BTreeMap yields positions in byte order; a stable sort keeps that for ties.
        rows.sort_by(|a, b| b.profiles_count.cmp(&a.profiles_count));
        Ok(rows)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(Error::Conflict(format!("User {} already exists", user.username)));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: user.username,
            name: user.name,
            email: user.email,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn clear_directory(&self) -> Result<()> {
        let mut tables = self.tables.write().await;
        *tables = Tables::default();
        Ok(())
    }
}
