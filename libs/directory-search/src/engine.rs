use roster_models::{Enumerations, Profile};
use std::borrow::Borrow;
use std::sync::Arc;

use crate::compile::{compile, SearchOptions};
use crate::predicate::Predicate;
use crate::query::SearchQuery;

/// Stateless profile filter bound to a set of enumeration tables.
///
/// Cheap to share: the tables sit behind an `Arc` and searching never
/// mutates the engine.
#[derive(Debug, Clone)]
pub struct ProfileSearchEngine {
    enumerations: Arc<Enumerations>,
    options: SearchOptions,
}

impl ProfileSearchEngine {
    pub fn new(enumerations: Arc<Enumerations>) -> Self {
        Self::with_options(enumerations, SearchOptions::default())
    }

    pub fn with_options(enumerations: Arc<Enumerations>, options: SearchOptions) -> Self {
        Self {
            enumerations,
            options,
        }
    }

    pub fn enumerations(&self) -> &Enumerations {
        &self.enumerations
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Compile a query into the predicate every backend evaluates.
    pub fn compile(&self, query: &SearchQuery) -> Predicate {
        compile(query, &self.enumerations, &self.options)
    }

    /// Filter `candidates` and order the matches by publish date, newest
    /// first. Matches with equal publish dates keep their input order.
    pub fn search<'a, I>(&self, query: &SearchQuery, candidates: I) -> Vec<&'a Profile>
    where
        I: IntoIterator<Item = &'a Profile>,
    {
        let predicate = self.compile(query);
        let mut matched: Vec<&Profile> = candidates
            .into_iter()
            .filter(|p| predicate.matches(p))
            .collect();
        order_by_publish_date(&mut matched);

        tracing::debug!(
            tokens = query.tokens().len(),
            under_represented_only = query.under_represented_only,
            senior_only = query.senior_only,
            matched = matched.len(),
            "directory search evaluated"
        );

        matched
    }

    /// Owned variant of [`search`](Self::search).
    pub fn search_owned(&self, query: &SearchQuery, candidates: Vec<Profile>) -> Vec<Profile> {
        let predicate = self.compile(query);
        let mut matched: Vec<Profile> = candidates
            .into_iter()
            .filter(|p| predicate.matches(p))
            .collect();
        order_by_publish_date(&mut matched);
        matched
    }
}

/// Stable sort, most recently published first.
pub fn order_by_publish_date<P: Borrow<Profile>>(profiles: &mut [P]) {
    profiles.sort_by(|a, b| b.borrow().publish_date.cmp(&a.borrow().publish_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use roster_models::ProfileDraft;

    fn profile(id: i64, days: i64, is_public: bool) -> Profile {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Profile::from_draft(
            id,
            ProfileDraft {
                is_public,
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
                institution: "Inst".into(),
                publish_date: Some(base + Duration::days(days)),
                ..Default::default()
            },
            None,
            base,
        )
    }

    #[test]
    fn ties_keep_input_order() {
        let profiles = vec![profile(1, 0, true), profile(2, 5, true), profile(3, 0, true)];
        let engine = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
        let ids: Vec<i64> = engine
            .search(&SearchQuery::default(), &profiles)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn owned_and_borrowed_searches_agree() {
        let profiles = vec![profile(1, 3, true), profile(2, 1, false), profile(3, 2, true)];
        let engine = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
        let query = SearchQuery::new("last");

        let borrowed: Vec<i64> = engine.search(&query, &profiles).iter().map(|p| p.id).collect();
        let owned: Vec<i64> = engine
            .search_owned(&query, profiles.clone())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(borrowed, vec![1, 3]);
        assert_eq!(borrowed, owned);
    }
}
