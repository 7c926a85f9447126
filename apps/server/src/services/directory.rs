//! Directory service
//!
//! Public listing and detail views over the profile store, plus the admin
//! write path. Searching compiles the query once with the shared engine and
//! lets the store evaluate it; pagination happens here.

use crate::db::ProfileStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use roster_models::{Country, Enumerations, FieldError, Profile, ProfileDraft};
use roster_search::{match_countries, ProfileSearchEngine, SearchQuery};
use serde::Serialize;
use std::sync::Arc;

/// Listing entry: what a search result card shows.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
    pub position: String,
    pub country: Option<String>,
    pub methods: Vec<String>,
    pub applications: Vec<String>,
    pub keywords: Vec<String>,
    pub publish_date: DateTime<Utc>,
}

impl ProfileSummary {
    pub fn new(profile: &Profile, enums: &Enumerations) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            institution: profile.institution.clone(),
            position: profile.position_label(enums).to_string(),
            country: profile.country.as_ref().map(|c| c.name.clone()),
            methods: profile.methods_labels(enums),
            applications: profile.applications_labels(enums),
            keywords: profile.keyword_terms().into_iter().map(String::from).collect(),
            publish_date: profile.publish_date,
        }
    }
}

/// Public detail view: stored codes alongside their labels.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: Profile,
    pub position_label: String,
    pub methods_labels: Vec<String>,
    pub applications_labels: Vec<String>,
    pub grad_month_label: Option<String>,
}

impl ProfileDetail {
    pub fn new(profile: Profile, enums: &Enumerations) -> Self {
        Self {
            position_label: profile.position_label(enums).to_string(),
            methods_labels: profile.methods_labels(enums),
            applications_labels: profile.applications_labels(enums),
            grad_month_label: profile.grad_month_label(enums).map(String::from),
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<ProfileSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub num_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Resolve a raw 1-based `page` parameter against the page count.
///
/// Absent means 1; `last` means the final page. Anything else must be an
/// integer in `1..=num_pages`.
pub fn resolve_page(raw: Option<&str>, num_pages: usize) -> Result<usize> {
    let invalid = || Error::NotFound("Invalid page".to_string());
    let page = match raw.map(str::trim) {
        None | Some("") => 1,
        Some("last") => num_pages,
        Some(value) => value.parse::<usize>().map_err(|_| invalid())?,
    };
    if page == 0 || page > num_pages {
        return Err(invalid());
    }
    Ok(page)
}

pub struct DirectoryService {
    store: Arc<dyn ProfileStore>,
    engine: Arc<ProfileSearchEngine>,
    page_size: usize,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn ProfileStore>, engine: Arc<ProfileSearchEngine>, page_size: usize) -> Self {
        Self {
            store,
            engine,
            page_size: page_size.max(1),
        }
    }

    pub fn enumerations(&self) -> &Enumerations {
        self.engine.enumerations()
    }

    /// Every public profile matching `query`, newest first.
    pub async fn search_all(&self, query: &SearchQuery) -> Result<Vec<Profile>> {
        let predicate = self.engine.compile(query);
        tracing::debug!(predicate = %predicate, "Directory search compiled");

        let matched = self.store.find_profiles(&predicate).await?;
        crate::metrics::record_search(
            !query.tokens().is_empty(),
            query.under_represented_only,
            query.senior_only,
            self.store.backend(),
            matched.len(),
        );
        Ok(matched)
    }

    /// One page of search results.
    pub async fn search(&self, query: &SearchQuery, page: Option<&str>) -> Result<SearchPage> {
        let matched = self.search_all(query).await?;

        let total = matched.len();
        let num_pages = total.div_ceil(self.page_size).max(1);
        let page = resolve_page(page, num_pages)?;

        let enums = self.enumerations();
        let results = matched
            .iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .map(|p| ProfileSummary::new(p, enums))
            .collect();

        Ok(SearchPage {
            results,
            page,
            page_size: self.page_size,
            total,
            num_pages,
            has_next: page < num_pages,
            has_previous: page > 1,
        })
    }

    /// A public profile; private and missing profiles are both not found.
    pub async fn get_public(&self, id: i64) -> Result<ProfileDetail> {
        match self.store.get_profile(id).await? {
            Some(profile) if profile.is_public => Ok(ProfileDetail::new(profile, self.enumerations())),
            _ => Err(Error::NotFound(format!("Profile {id}"))),
        }
    }

    pub async fn countries_autocomplete(&self, q: &str) -> Result<Vec<Country>> {
        let countries = self.store.list_countries().await?;
        Ok(match_countries(q, &countries).into_iter().cloned().collect())
    }

    /// Create (`id = None`) or replace a profile after validation.
    pub async fn upsert_profile(&self, id: Option<i64>, draft: ProfileDraft) -> Result<Profile> {
        let operation = if id.is_some() { "update" } else { "create" };
        let result = self.write_profile(id, draft).await;

        let status = match &result {
            Ok(_) => "success",
            Err(e) if e.status().is_client_error() => "client_error",
            Err(_) => "server_error",
        };
        crate::metrics::PROFILE_WRITES_TOTAL
            .with_label_values(&[operation, status])
            .inc();

        result
    }

    async fn write_profile(&self, id: Option<i64>, draft: ProfileDraft) -> Result<Profile> {
        draft.validate(self.enumerations())?;

        let country_id = match draft.country_code.as_deref() {
            None => None,
            Some(code) => {
                let country = self.store.get_country_by_code(code).await?.ok_or_else(|| {
                    Error::InvalidFields(vec![FieldError::new(
                        "country_code",
                        format!("'{code}' is not a known country"),
                    )])
                })?;
                Some(country.id)
            }
        };

        let profile = match id {
            Some(id) => self.store.update_profile(id, draft, country_id).await?,
            None => self.store.create_profile(draft, country_id).await?,
        };

        tracing::info!(
            profile_id = profile.id,
            is_public = profile.is_public,
            "Profile saved"
        );
        Ok(profile)
    }

    pub async fn delete_profile(&self, id: i64) -> Result<()> {
        let deleted = self.store.delete_profile(id).await?;
        crate::metrics::PROFILE_WRITES_TOTAL
            .with_label_values(&["delete", if deleted { "success" } else { "client_error" }])
            .inc();

        if !deleted {
            return Err(Error::NotFound(format!("Profile {id}")));
        }
        tracing::info!(profile_id = id, "Profile deleted");
        Ok(())
    }

    pub async fn upsert_country(
        &self,
        code: &str,
        name: &str,
        is_under_represented: bool,
    ) -> Result<Country> {
        let mut errors = Vec::new();
        let code_len = code.chars().count();
        if code.trim().is_empty() || code_len > Country::MAX_CODE_LEN {
            errors.push(FieldError::new(
                "code",
                format!("must be 1 to {} characters", Country::MAX_CODE_LEN),
            ));
        }
        if name.trim().is_empty() || name.chars().count() > Country::MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must be 1 to {} characters", Country::MAX_NAME_LEN),
            ));
        }
        if !errors.is_empty() {
            return Err(Error::InvalidFields(errors));
        }

        self.store
            .upsert_country(code, name.trim(), is_under_represented)
            .await
    }
}
