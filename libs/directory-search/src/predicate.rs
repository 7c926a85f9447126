//! Compiled filter: a conjunction of clauses, each clause a disjunction of
//! conditions.

use roster_models::Profile;
use std::collections::BTreeSet;
use std::fmt;

use crate::text::contains_folded;

/// Free-text profile fields a token is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    Institution,
    CountryName,
    Keywords,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::FirstName,
        TextField::LastName,
        TextField::Institution,
        TextField::CountryName,
        TextField::Keywords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextField::FirstName => "first_name",
            TextField::LastName => "last_name",
            TextField::Institution => "institution",
            TextField::CountryName => "country.name",
            TextField::Keywords => "keywords",
        }
    }

    fn value(self, profile: &Profile) -> Option<&str> {
        match self {
            TextField::FirstName => Some(&profile.first_name),
            TextField::LastName => Some(&profile.last_name),
            TextField::Institution => Some(&profile.institution),
            TextField::CountryName => profile.country.as_ref().map(|c| c.name.as_str()),
            TextField::Keywords => Some(&profile.keywords),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    IsPublic,
    CountryUnderRepresented,
    /// Case-insensitive literal substring; `needle` is stored case-folded.
    TextContains { field: TextField, needle: String },
    /// Stored position is one of these codes.
    PositionIn(BTreeSet<String>),
    /// At least one stored method is one of these codes.
    MethodsAny(BTreeSet<String>),
    /// At least one stored application is one of these codes.
    ApplicationsAny(BTreeSet<String>),
}

impl Condition {
    pub fn matches(&self, profile: &Profile) -> bool {
        match self {
            Condition::IsPublic => profile.is_public,
            Condition::CountryUnderRepresented => profile
                .country
                .as_ref()
                .is_some_and(|c| c.is_under_represented),
            Condition::TextContains { field, needle } => field
                .value(profile)
                .is_some_and(|value| contains_folded(value, needle)),
            Condition::PositionIn(codes) => codes.contains(&profile.position),
            Condition::MethodsAny(codes) => !profile.methods.is_disjoint(codes),
            Condition::ApplicationsAny(codes) => !profile.applications.is_disjoint(codes),
        }
    }
}

/// Disjunction of conditions. An empty clause matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    any_of: Vec<Condition>,
}

impl Clause {
    pub fn new(any_of: Vec<Condition>) -> Self {
        Self { any_of }
    }

    pub fn single(condition: Condition) -> Self {
        Self {
            any_of: vec![condition],
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.any_of
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        self.any_of.iter().any(|c| c.matches(profile))
    }
}

/// Conjunction of clauses. An empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        self.clauses.iter().all(|c| c.matches(profile))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::IsPublic => f.write_str("is_public"),
            Condition::CountryUnderRepresented => f.write_str("country.is_under_represented"),
            Condition::TextContains { field, needle } => {
                write!(f, "{} ~ {:?}", field.name(), needle)
            }
            Condition::PositionIn(codes) => write!(f, "position in {codes:?}"),
            Condition::MethodsAny(codes) => write!(f, "methods any {codes:?}"),
            Condition::ApplicationsAny(codes) => write!(f, "applications any {codes:?}"),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.any_of.is_empty() {
            return f.write_str("false");
        }
        let parts: Vec<String> = self.any_of.iter().map(ToString::to_string).collect();
        if parts.len() == 1 {
            f.write_str(&parts[0])
        } else {
            write!(f, "({})", parts.join(" OR "))
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("true");
        }
        let parts: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" AND "))
    }
}
