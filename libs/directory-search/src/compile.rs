//! Query compilation
//!
//! Turns a [`SearchQuery`] into a [`Predicate`] against a given set of
//! enumeration tables:
//! - `is_public` is always required
//! - the under-represented toggle adds a country clause
//! - the senior toggle adds a clause over positions whose label carries a
//!   senior marker
//! - every search token adds one clause; within it any text field, the
//!   position label, or a method/application label may match

use regex::RegexBuilder;
use roster_models::{Enumerations, LabelTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::predicate::{Clause, Condition, Predicate, TextField};
use crate::query::SearchQuery;
use crate::text::{casefold, contains_folded};

/// Substrings of a position label that mark a senior career stage.
pub const DEFAULT_SENIOR_MARKERS: [&str; 4] = ["Senior", "Lecturer", "Professor", "Director"];

/// How a search token is matched against method/application labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatch {
    /// Case-insensitive literal substring, like every other field.
    #[default]
    Literal,
    /// The whole label must match `.*<token>.*` with the token read as a
    /// case-insensitive regular expression. Tokens that do not parse as a
    /// pattern match no label.
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub senior_markers: Vec<String>,
    pub label_match: LabelMatch,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            senior_markers: DEFAULT_SENIOR_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            label_match: LabelMatch::default(),
        }
    }
}

pub(crate) fn compile(
    query: &SearchQuery,
    enums: &Enumerations,
    options: &SearchOptions,
) -> Predicate {
    let mut predicate = Predicate::default().and(Clause::single(Condition::IsPublic));

    if query.under_represented_only {
        predicate = predicate.and(Clause::single(Condition::CountryUnderRepresented));
    }

    if query.senior_only {
        let markers: Vec<String> = options.senior_markers.iter().map(|m| casefold(m)).collect();
        let codes = enums
            .positions
            .codes_where(|label| markers.iter().any(|m| contains_folded(label, m)));
        predicate = predicate.and(Clause::single(Condition::PositionIn(codes)));
    }

    for token in query.tokens() {
        predicate = predicate.and(token_clause(token, enums, options.label_match));
    }

    predicate
}

fn token_clause(token: &str, enums: &Enumerations, label_match: LabelMatch) -> Clause {
    let needle = casefold(token);

    let mut any_of: Vec<Condition> = TextField::ALL
        .iter()
        .map(|&field| Condition::TextContains {
            field,
            needle: needle.clone(),
        })
        .collect();

    let positions = enums
        .positions
        .codes_where(|label| contains_folded(label, &needle));
    if !positions.is_empty() {
        any_of.push(Condition::PositionIn(positions));
    }

    let methods = matching_labels(&enums.methods, token, label_match);
    if !methods.is_empty() {
        any_of.push(Condition::MethodsAny(methods));
    }

    let applications = matching_labels(&enums.applications, token, label_match);
    if !applications.is_empty() {
        any_of.push(Condition::ApplicationsAny(applications));
    }

    Clause::new(any_of)
}

fn matching_labels(table: &LabelTable, token: &str, label_match: LabelMatch) -> BTreeSet<String> {
    match label_match {
        LabelMatch::Literal => {
            let needle = casefold(token);
            table.codes_where(|label| contains_folded(label, &needle))
        }
        LabelMatch::Pattern => {
            let pattern = format!("^.*{token}.*$");
            match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                Ok(re) => table.codes_where(|label| re.is_match(label)),
                Err(e) => {
                    tracing::debug!(token, error = %e, "search token is not a valid label pattern");
                    BTreeSet::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unfiltered_query_only_requires_public() {
        let predicate = compile(
            &SearchQuery::default(),
            &Enumerations::default(),
            &SearchOptions::default(),
        );
        assert_eq!(predicate.to_string(), "is_public");
    }

    #[test]
    fn senior_toggle_resolves_marker_positions() {
        let predicate = compile(
            &SearchQuery::default().senior(true),
            &Enumerations::default(),
            &SearchOptions::default(),
        );
        let clause = &predicate.clauses()[1];
        assert_eq!(
            clause.conditions(),
            &[Condition::PositionIn(codes(&[
                "Assistant Professor",
                "Associate Professor",
                "Director/founder/advisor",
                "Lecturer",
                "Professor",
                "Senior data scientist/engineer",
                "Senior research scientist/engineer",
            ]))]
        );
    }

    #[test]
    fn token_without_label_hits_has_only_text_disjuncts() {
        let predicate = compile(
            &SearchQuery::new("zzz"),
            &Enumerations::default(),
            &SearchOptions::default(),
        );
        assert_eq!(predicate.clauses().len(), 2);
        assert_eq!(predicate.clauses()[1].conditions().len(), TextField::ALL.len());
    }

    #[test]
    fn token_collects_method_and_application_codes() {
        let predicate = compile(
            &SearchQuery::new("learning"),
            &Enumerations::default(),
            &SearchOptions::default(),
        );
        let conditions = predicate.clauses()[1].conditions();
        assert!(conditions.contains(&Condition::MethodsAny(codes(&[
            "ALG", "DL", "LT", "REL", "RL", "SL", "UL"
        ]))));
        assert!(!conditions
            .iter()
            .any(|c| matches!(c, Condition::ApplicationsAny(_))));
    }

    #[test]
    fn pattern_mode_reads_token_as_regex() {
        let options = SearchOptions {
            label_match: LabelMatch::Pattern,
            ..Default::default()
        };
        let predicate = compile(
            &SearchQuery::new("deep.learn"),
            &Enumerations::default(),
            &options,
        );
        assert!(predicate.clauses()[1]
            .conditions()
            .contains(&Condition::MethodsAny(codes(&["DL"]))));

        let literal = compile(
            &SearchQuery::new("deep.learn"),
            &Enumerations::default(),
            &SearchOptions::default(),
        );
        assert!(!literal.clauses()[1]
            .conditions()
            .iter()
            .any(|c| matches!(c, Condition::MethodsAny(_))));
    }

    #[test]
    fn invalid_pattern_contributes_no_label_disjunct() {
        let options = SearchOptions {
            label_match: LabelMatch::Pattern,
            ..Default::default()
        };
        let predicate = compile(
            &SearchQuery::new("(unclosed"),
            &Enumerations::default(),
            &options,
        );
        assert_eq!(predicate.clauses()[1].conditions().len(), TextField::ALL.len());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: SearchOptions = serde_json::from_str(r#"{ "label_match": "pattern" }"#).unwrap();
        assert_eq!(options.label_match, LabelMatch::Pattern);
        assert_eq!(options.senior_markers.len(), 4);
    }
}
