//! SQL generation for directory searches.
//!
//! Translates a [`Predicate`] into a `WHERE` clause over
//! `profiles p LEFT JOIN countries c`, with every user-supplied value passed
//! as a bind parameter.

use roster_search::{Clause, Condition, Predicate, TextField};
use std::collections::{BTreeSet, HashMap};

/// Columns selected for a profile row, including its joined country.
pub(crate) const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.is_public, p.first_name, p.last_name, \
     p.contact_email, p.webpage, p.institution, p.position, p.grad_month, p.grad_year, \
     p.methods, p.applications, p.keywords, p.publish_date, p.last_updated, \
     c.id AS country_id, c.code AS country_code, c.name AS country_name, \
     c.is_under_represented AS country_is_under_represented";

pub(crate) const PROFILE_FROM: &str = "profiles p LEFT JOIN countries c ON c.id = p.country_id";

// Name and position orderings use byte order, matching the in-memory store.
pub(crate) const LIST_COUNTRIES_SQL: &str =
    r#"SELECT id, code, name, is_under_represented FROM countries ORDER BY name COLLATE "C" ASC"#;

pub(crate) const PUBLIC_BY_COUNTRY_SQL: &str = r#"
    SELECT c.id, c.name, COUNT(p.id)
    FROM countries c
    JOIN profiles p ON p.country_id = c.id AND p.is_public
    GROUP BY c.id, c.name
    ORDER BY c.name COLLATE "C" ASC
"#;

pub(crate) const PUBLIC_BY_POSITION_SQL: &str = r#"
    SELECT position, COUNT(id)
    FROM profiles
    WHERE is_public
    GROUP BY position
    ORDER BY COUNT(id) DESC, position COLLATE "C" ASC
"#;

/// Parameters collected while rendering a predicate.
///
/// Every bound value is a `text[]`. Search patterns share a single array
/// parameter addressed by subscript, and identical code sets share one
/// parameter, so the number of binds does not grow with the number of
/// search terms.
#[derive(Debug, Default)]
pub(crate) struct SqlParams {
    values: Vec<Vec<String>>,
    patterns_param: Option<usize>,
    patterns: Vec<String>,
    pattern_slots: HashMap<String, usize>,
    code_set_params: HashMap<Vec<String>, usize>,
}

impl SqlParams {
    /// `ILIKE` operand for `needle`: `($n::text[])[k]`.
    fn pattern(&mut self, needle: &str) -> String {
        let param = match self.patterns_param {
            Some(param) => param,
            None => {
                self.values.push(Vec::new());
                self.patterns_param = Some(self.values.len());
                self.values.len()
            }
        };
        let slot = match self.pattern_slots.get(needle) {
            Some(&slot) => slot,
            None => {
                self.patterns
                    .push(format!("%{}%", escape_like_pattern(needle)));
                self.pattern_slots
                    .insert(needle.to_string(), self.patterns.len());
                self.patterns.len()
            }
        };
        format!("(${param}::text[])[{slot}]")
    }

    /// Parameter number holding `codes`.
    fn code_set(&mut self, codes: &BTreeSet<String>) -> usize {
        let codes: Vec<String> = codes.iter().cloned().collect();
        if let Some(&param) = self.code_set_params.get(&codes) {
            return param;
        }
        self.values.push(codes.clone());
        self.code_set_params.insert(codes, self.values.len());
        self.values.len()
    }

    pub(crate) fn into_values(mut self) -> Vec<Vec<String>> {
        if let Some(param) = self.patterns_param {
            self.values[param - 1] = self.patterns;
        }
        self.values
    }
}

/// Escape SQL LIKE meta-characters so user input is treated literally.
pub(crate) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn text_column(field: TextField) -> &'static str {
    match field {
        TextField::FirstName => "p.first_name",
        TextField::LastName => "p.last_name",
        TextField::Institution => "p.institution",
        TextField::CountryName => "c.name",
        TextField::Keywords => "p.keywords",
    }
}

fn condition_sql(condition: &Condition, params: &mut SqlParams) -> String {
    match condition {
        Condition::IsPublic => "p.is_public".to_string(),
        Condition::CountryUnderRepresented => "COALESCE(c.is_under_represented, FALSE)".to_string(),
        Condition::TextContains { field, needle } => {
            let pattern = params.pattern(needle);
            format!("{} ILIKE {} ESCAPE E'\\\\'", text_column(*field), pattern)
        }
        Condition::PositionIn(codes) if codes.is_empty() => "FALSE".to_string(),
        Condition::PositionIn(codes) => {
            let idx = params.code_set(codes);
            format!("p.position = ANY(${idx}::text[])")
        }
        Condition::MethodsAny(codes) if codes.is_empty() => "FALSE".to_string(),
        Condition::MethodsAny(codes) => {
            let idx = params.code_set(codes);
            format!("p.methods && ${idx}::text[]")
        }
        Condition::ApplicationsAny(codes) if codes.is_empty() => "FALSE".to_string(),
        Condition::ApplicationsAny(codes) => {
            let idx = params.code_set(codes);
            format!("p.applications && ${idx}::text[]")
        }
    }
}

fn clause_sql(clause: &Clause, params: &mut SqlParams) -> String {
    match clause.conditions() {
        [] => "FALSE".to_string(),
        [single] => condition_sql(single, params),
        many => {
            let parts: Vec<String> = many.iter().map(|c| condition_sql(c, params)).collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

/// `WHERE` body for `predicate`; `TRUE` when it has no clauses.
pub(crate) fn where_sql(predicate: &Predicate, params: &mut SqlParams) -> String {
    if predicate.clauses().is_empty() {
        return "TRUE".to_string();
    }
    predicate
        .clauses()
        .iter()
        .map(|clause| clause_sql(clause, params))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Full search statement: matching profiles, newest first, ties by id.
pub(crate) fn build_search_sql(predicate: &Predicate) -> (String, Vec<Vec<String>>) {
    let mut params = SqlParams::default();
    let filter = where_sql(predicate, &mut params);
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM {PROFILE_FROM} WHERE {filter} ORDER BY p.publish_date DESC, p.id ASC"
    );
    (sql, params.into_values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_models::Enumerations;
    use roster_search::{ProfileSearchEngine, SearchQuery};
    use std::sync::Arc;

    fn engine() -> ProfileSearchEngine {
        ProfileSearchEngine::new(Arc::new(Enumerations::default()))
    }

    #[test]
    fn unfiltered_search_only_requires_public() {
        let (sql, binds) = build_search_sql(&engine().compile(&SearchQuery::default()));
        assert!(sql.ends_with("WHERE p.is_public ORDER BY p.publish_date DESC, p.id ASC"));
        assert!(binds.is_empty());
    }

    #[test]
    fn token_pattern_is_escaped_and_shared_across_fields() {
        let query = SearchQuery::new("100%_a\\b");
        let (sql, binds) = build_search_sql(&engine().compile(&query));

        assert!(sql.contains("p.first_name ILIKE ($1::text[])[1] ESCAPE E'\\\\'"));
        assert!(sql.contains("c.name ILIKE ($1::text[])[1] ESCAPE E'\\\\'"));
        assert_eq!(binds, vec![vec!["%100\\%\\_a\\\\b%".to_string()]]);
    }

    #[test]
    fn each_token_gets_its_own_slot() {
        let (sql, binds) = build_search_sql(&engine().compile(&SearchQuery::new("paris zzz")));
        assert!(sql.contains("p.last_name ILIKE ($1::text[])[1]"));
        assert!(sql.contains("p.last_name ILIKE ($1::text[])[2]"));
        assert_eq!(binds, vec![vec!["%paris%".to_string(), "%zzz%".to_string()]]);
    }

    #[test]
    fn many_terms_keep_bind_count_flat() {
        let distinct: Vec<String> = (0..20_000).map(|i| format!("t{i}")).collect();
        let mut text = distinct.join(" ");
        text.push(' ');
        text.push_str(&vec!["learning"; 5_000].join(" "));

        let (_, binds) = build_search_sql(&engine().compile(&SearchQuery::new(text)));

        // One pattern array plus the method code set for "learning".
        assert_eq!(binds.len(), 2);
        assert_eq!(binds[0].len(), 20_001);
        assert!(binds.len() <= u16::MAX as usize);
    }

    #[test]
    fn toggles_become_their_own_conjuncts() {
        let query = SearchQuery::default().under_represented(true).senior(true);
        let (sql, binds) = build_search_sql(&engine().compile(&query));

        assert!(sql.contains(
            "WHERE p.is_public AND COALESCE(c.is_under_represented, FALSE) AND p.position = ANY($1::text[])"
        ));
        assert!(binds[0].contains(&"Professor".to_string()));
    }

    #[test]
    fn label_hits_add_array_overlap() {
        let (sql, binds) = build_search_sql(&engine().compile(&SearchQuery::new("vision")));
        assert!(sql.contains("p.applications && $2::text[]"));
        assert_eq!(binds[1], vec!["CV".to_string()]);
        assert!(!sql.contains("p.methods &&"));
    }

    #[test]
    fn identical_code_sets_share_a_parameter() {
        let codes: BTreeSet<String> = ["DL".to_string()].into_iter().collect();
        let predicate = Predicate::default()
            .and(Clause::single(Condition::MethodsAny(codes.clone())))
            .and(Clause::single(Condition::MethodsAny(codes)));
        let mut params = SqlParams::default();
        assert_eq!(
            where_sql(&predicate, &mut params),
            "p.methods && $1::text[] AND p.methods && $1::text[]"
        );
        assert_eq!(params.into_values().len(), 1);
    }

    #[test]
    fn tie_breaks_use_byte_order() {
        for sql in [LIST_COUNTRIES_SQL, PUBLIC_BY_COUNTRY_SQL, PUBLIC_BY_POSITION_SQL] {
            assert!(sql.contains(r#"COLLATE "C" ASC"#), "{sql}");
        }
    }

    #[test]
    fn empty_code_sets_match_nothing() {
        let predicate = Predicate::default()
            .and(Clause::single(Condition::PositionIn(BTreeSet::new())))
            .and(Clause::default());
        let mut params = SqlParams::default();
        assert_eq!(where_sql(&predicate, &mut params), "FALSE AND FALSE");
        assert!(params.into_values().is_empty());
    }
}
