use roster_models::Country;

use crate::text::{casefold, contains_folded};

/// Countries whose name contains every whitespace-separated term of `query`,
/// sorted by name. A blank query returns every country.
pub fn match_countries<'a, I>(query: &str, countries: I) -> Vec<&'a Country>
where
    I: IntoIterator<Item = &'a Country>,
{
    let terms: Vec<String> = query.split_whitespace().map(casefold).collect();
    let mut matched: Vec<&Country> = countries
        .into_iter()
        .filter(|c| terms.iter().all(|t| contains_folded(&c.name, t)))
        .collect();
    matched.sort_by(|a, b| a.name.cmp(&b.name));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<Country> {
        vec![
            Country::new(1, "USA", "United States", false),
            Country::new(2, "GBR", "United Kingdom", false),
            Country::new(3, "ARE", "United Arab Emirates", true),
            Country::new(4, "KEN", "Kenya", true),
        ]
    }

    #[test]
    fn every_term_must_match() {
        let all = countries();
        let names: Vec<&str> = match_countries("united  king", &all)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["United Kingdom"]);
    }

    #[test]
    fn blank_query_returns_all_sorted() {
        let all = countries();
        let names: Vec<&str> = match_countries(" ", &all)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Kenya", "United Arab Emirates", "United Kingdom", "United States"]
        );
    }
}
