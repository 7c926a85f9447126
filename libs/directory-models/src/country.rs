use serde::{Deserialize, Serialize};

/// Reference data for a profile's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    /// Unique short identifier (ISO-style, at most 3 characters).
    pub code: String,
    pub name: String,
    /// Flags countries for the diversity-focused directory filter.
    pub is_under_represented: bool,
}

impl Country {
    pub const MAX_CODE_LEN: usize = 3;
    pub const MAX_NAME_LEN: usize = 60;

    pub fn new(
        id: i64,
        code: impl Into<String>,
        name: impl Into<String>,
        is_under_represented: bool,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            is_under_represented,
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
