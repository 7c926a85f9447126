#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use roster_models::{Country, Profile, ProfileDraft};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
}

pub fn country(code: &str, name: &str, under_represented: bool) -> Country {
    Country::new(code.len() as i64, code, name, under_represented)
}

/// Fluent builder for test profiles.
pub struct ProfileBuilder {
    id: i64,
    draft: ProfileDraft,
    country: Option<Country>,
    published_days_ago: i64,
}

impl ProfileBuilder {
    pub fn new(id: i64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            draft: ProfileDraft {
                is_public: true,
                first_name: first_name.into(),
                last_name: last_name.into(),
                institution: "Unaffiliated".into(),
                ..Default::default()
            },
            country: None,
            published_days_ago: 0,
        }
    }

    pub fn institution(mut self, institution: &str) -> Self {
        self.draft.institution = institution.into();
        self
    }

    pub fn position(mut self, position: &str) -> Self {
        self.draft.position = position.into();
        self
    }

    pub fn country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.draft.keywords = keywords.into();
        self
    }

    pub fn methods(mut self, codes: &[&str]) -> Self {
        self.draft.methods = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn applications(mut self, codes: &[&str]) -> Self {
        self.draft.applications = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn private(mut self) -> Self {
        self.draft.is_public = false;
        self
    }

    pub fn published_days_ago(mut self, days: i64) -> Self {
        self.published_days_ago = days;
        self
    }

    pub fn build(self) -> Profile {
        let now = epoch();
        let draft = ProfileDraft {
            publish_date: Some(now - Duration::days(self.published_days_ago)),
            ..self.draft
        };
        Profile::from_draft(self.id, draft, self.country, now)
    }
}

/// Ada (Professor, UK) and Grace (PhD student, USA).
pub fn ada_and_grace() -> Vec<Profile> {
    vec![
        ProfileBuilder::new(1, "Ada", "Lovelace")
            .institution("Analytical Engines")
            .position("Professor")
            .country(country("UK", "UK", false))
            .published_days_ago(2)
            .build(),
        ProfileBuilder::new(2, "Grace", "Hopper")
            .institution("Navy")
            .position("PhD student")
            .country(country("USA", "USA", false))
            .published_days_ago(1)
            .build(),
    ]
}

pub fn ids(profiles: &[&Profile]) -> Vec<i64> {
    profiles.iter().map(|p| p.id).collect()
}
