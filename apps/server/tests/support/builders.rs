use axum::body::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use roster_models::ProfileDraft;

/// Converts a JSON value to request body bytes
pub fn to_json_body(value: &serde_json::Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Builder for directory profiles
pub struct ProfileBuilder {
    draft: ProfileDraft,
    country_code: Option<String>,
}

impl ProfileBuilder {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            draft: ProfileDraft {
                is_public: true,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                institution: "Unaffiliated".to_string(),
                publish_date: Some(epoch()),
                ..Default::default()
            },
            country_code: None,
        }
    }

    pub fn institution(mut self, institution: &str) -> Self {
        self.draft.institution = institution.to_string();
        self
    }

    pub fn position(mut self, position: &str) -> Self {
        self.draft.position = position.to_string();
        self
    }

    pub fn country(mut self, code: &str) -> Self {
        self.country_code = Some(code.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &str) -> Self {
        self.draft.keywords = keywords.to_string();
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

    /// Publish date relative to the fixed test epoch.
    pub fn published_days_ago(mut self, days: i64) -> Self {
        self.draft.publish_date = Some(epoch() - Duration::days(days));
        self
    }

    pub fn into_parts(self) -> (ProfileDraft, Option<String>) {
        (self.draft, self.country_code)
    }
}
