//! Directory search
//!
//! Filters a snapshot of profiles by free text and two toggles
//! (under-represented country, senior position) and orders the survivors by
//! publish date, most recent first.
//!
//! A [`SearchQuery`] is compiled once into a [`Predicate`]: a conjunction of
//! clauses, each clause a disjunction of conditions. The predicate is plain
//! data, so the same compiled query can be evaluated in memory
//! ([`Predicate::matches`]) or translated by a storage backend into its own
//! query language.
//!
//! ```
//! use roster_models::Enumerations;
//! use roster_search::{ProfileSearchEngine, SearchQuery};
//! use std::sync::Arc;
//!
//! let engine = ProfileSearchEngine::new(Arc::new(Enumerations::default()));
//! let query = SearchQuery::from_params(Some("deep learning"), Some("on"), None);
//! let predicate = engine.compile(&query);
//! assert_eq!(predicate.clauses().len(), 4);
//! ```

#![forbid(unsafe_code)]

mod compile;
mod countries;
mod engine;
mod predicate;
mod query;
mod text;

pub use compile::{LabelMatch, SearchOptions, DEFAULT_SENIOR_MARKERS};
pub use countries::match_countries;
pub use engine::{order_by_publish_date, ProfileSearchEngine};
pub use predicate::{Clause, Condition, Predicate, TextField};
pub use query::SearchQuery;
