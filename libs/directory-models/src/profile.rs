//! Directory profiles
//!
//! A [`Profile`] is the public entry for one person. [`ProfileDraft`] is the
//! writable part of a profile as submitted by its owner (or an operator);
//! drafts are validated against the enumeration tables before they are
//! stored, so stored codes are always resolvable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{ValidateEmail, ValidateUrl};

use crate::country::Country;
use crate::enumerations::Enumerations;
use crate::error::{Error, FieldError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: Option<i64>,
    pub is_public: bool,
    pub first_name: String,
    pub last_name: String,
    pub contact_email: String,
    pub webpage: String,
    pub institution: String,
    pub country: Option<Country>,
    /// Empty, or a code from the positions table.
    pub position: String,
    pub grad_month: String,
    pub grad_year: String,
    pub methods: BTreeSet<String>,
    pub applications: BTreeSet<String>,
    /// Free text, comma-separated terms.
    pub keywords: String,
    pub publish_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Profile {
    /// Materialize a stored profile from a validated draft.
    pub fn from_draft(
        id: i64,
        draft: ProfileDraft,
        country: Option<Country>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            is_public: draft.is_public,
            first_name: draft.first_name,
            last_name: draft.last_name,
            contact_email: draft.contact_email,
            webpage: draft.webpage,
            institution: draft.institution,
            country,
            position: draft.position,
            grad_month: draft.grad_month,
            grad_year: draft.grad_year,
            methods: draft.methods,
            applications: draft.applications,
            keywords: draft.keywords,
            publish_date: draft.publish_date.unwrap_or(now),
            last_updated: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn position_label<'a>(&'a self, enums: &'a Enumerations) -> &'a str {
        enums.positions.label_or_code(&self.position)
    }

    pub fn methods_labels(&self, enums: &Enumerations) -> Vec<String> {
        self.methods
            .iter()
            .map(|code| enums.methods.label_or_code(code).to_string())
            .collect()
    }

    pub fn applications_labels(&self, enums: &Enumerations) -> Vec<String> {
        self.applications
            .iter()
            .map(|code| enums.applications.label_or_code(code).to_string())
            .collect()
    }

    pub fn grad_month_label<'a>(&'a self, enums: &'a Enumerations) -> Option<&'a str> {
        if self.grad_month.is_empty() {
            return None;
        }
        enums.months.label(&self.grad_month)
    }

    /// Keyword terms, trimmed, without empties.
    pub fn keyword_terms(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

fn default_true() -> bool {
    true
}

/// Writable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub webpage: String,
    pub institution: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub grad_month: String,
    #[serde(default)]
    pub grad_year: String,
    #[serde(default)]
    pub methods: BTreeSet<String>,
    #[serde(default)]
    pub applications: BTreeSet<String>,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

impl ProfileDraft {
    pub const MAX_NAME_LEN: usize = 100;
    pub const MAX_INSTITUTION_LEN: usize = 100;
    pub const MAX_POSITION_LEN: usize = 50;
    pub const MAX_KEYWORDS_LEN: usize = 250;

    /// Check every field; all problems are reported together.
    pub fn validate(&self, enums: &Enumerations) -> Result<()> {
        let mut errors = Vec::new();

        required_text(&mut errors, "first_name", &self.first_name, Self::MAX_NAME_LEN);
        required_text(&mut errors, "last_name", &self.last_name, Self::MAX_NAME_LEN);
        required_text(
            &mut errors,
            "institution",
            &self.institution,
            Self::MAX_INSTITUTION_LEN,
        );

        if self.keywords.chars().count() > Self::MAX_KEYWORDS_LEN {
            errors.push(FieldError::new(
                "keywords",
                format!("must be at most {} characters", Self::MAX_KEYWORDS_LEN),
            ));
        }

        if !self.position.is_empty() {
            if self.position.chars().count() > Self::MAX_POSITION_LEN {
                errors.push(FieldError::new(
                    "position",
                    format!("must be at most {} characters", Self::MAX_POSITION_LEN),
                ));
            } else if !enums.positions.contains_code(&self.position) {
                errors.push(FieldError::new(
                    "position",
                    format!("'{}' is not a known position", self.position),
                ));
            }
        }

        for code in &self.methods {
            if !enums.methods.contains_code(code) {
                errors.push(FieldError::new(
                    "methods",
                    format!("'{code}' is not a known method"),
                ));
            }
        }
        for code in &self.applications {
            if !enums.applications.contains_code(code) {
                errors.push(FieldError::new(
                    "applications",
                    format!("'{code}' is not a known application"),
                ));
            }
        }

        if !self.grad_month.is_empty() && !enums.months.contains_code(&self.grad_month) {
            errors.push(FieldError::new(
                "grad_month",
                format!("'{}' is not a month code", self.grad_month),
            ));
        }
        if !self.grad_year.is_empty()
            && !(self.grad_year.len() == 4 && self.grad_year.bytes().all(|b| b.is_ascii_digit()))
        {
            errors.push(FieldError::new("grad_year", "must be a four digit year"));
        }

        if !self.contact_email.is_empty() && !self.contact_email.validate_email() {
            errors.push(FieldError::new("contact_email", "must be a valid email address"));
        }
        if !self.webpage.is_empty()
            && !(self.webpage.validate_url()
                && (self.webpage.starts_with("http://") || self.webpage.starts_with("https://")))
        {
            errors.push(FieldError::new("webpage", "must be an http(s) URL"));
        }

        if let Some(code) = &self.country_code {
            if code.trim().is_empty() || code.chars().count() > Country::MAX_CODE_LEN {
                errors.push(FieldError::new(
                    "country_code",
                    format!("must be 1 to {} characters", Country::MAX_CODE_LEN),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Invalid(errors))
        }
    }
}

fn required_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            is_public: true,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            institution: "Analytical Engines".into(),
            position: "Professor".into(),
            ..Default::default()
        }
    }

    #[test]
    fn keyword_terms_split_on_commas() {
        let profile = Profile::from_draft(
            1,
            ProfileDraft {
                keywords: "graphs, ,  causality,".into(),
                ..draft()
            },
            None,
            Utc::now(),
        );
        assert_eq!(profile.keyword_terms(), vec!["graphs", "causality"]);
    }

    #[test]
    fn from_draft_defaults_publish_date_to_now() {
        let now = Utc::now();
        let profile = Profile::from_draft(7, draft(), None, now);
        assert_eq!(profile.publish_date, now);
        assert_eq!(profile.last_updated, now);
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }

    #[test]
    fn grad_month_label_resolves_code() {
        let enums = Enumerations::default();
        let profile = Profile::from_draft(
            1,
            ProfileDraft {
                grad_month: "03".into(),
                ..draft()
            },
            None,
            Utc::now(),
        );
        assert_eq!(profile.grad_month_label(&enums), Some("March"));
    }

    #[test]
    fn validation_accepts_minimal_draft() {
        assert!(draft().validate(&Enumerations::default()).is_ok());
    }
}
