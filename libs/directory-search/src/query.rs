use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::text::casefold;

/// Raw value of a toggle parameter that switches it on.
const TOGGLE_ON: &str = "on";

/// A directory query as typed by a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Space-separated search terms. `None` and blank text mean "no text filter".
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub under_represented_only: bool,
    #[serde(default)]
    pub senior_only: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Build a query from the raw `s`, `ur` and `senior` request parameters.
    /// A toggle is on only when its raw value is exactly `"on"`.
    pub fn from_params(s: Option<&str>, ur: Option<&str>, senior: Option<&str>) -> Self {
        Self {
            text: s.map(str::to_string),
            under_represented_only: ur == Some(TOGGLE_ON),
            senior_only: senior == Some(TOGGLE_ON),
        }
    }

    pub fn under_represented(mut self, on: bool) -> Self {
        self.under_represented_only = on;
        self
    }

    pub fn senior(mut self, on: bool) -> Self {
        self.senior_only = on;
        self
    }

    /// Search terms: text split on whitespace, empties dropped. A term that
    /// repeats an earlier one (ignoring case) is dropped too; matching is
    /// case-insensitive, so it could not narrow the result.
    pub fn tokens(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.text
            .as_deref()
            .map(|t| {
                t.split_whitespace()
                    .filter(|token| seen.insert(casefold(token)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_unfiltered(&self) -> bool {
        !self.under_represented_only && !self.senior_only && self.tokens().is_empty()
    }
}
