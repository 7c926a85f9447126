//! Enumeration tables
//!
//! Profiles store short codes; people search by labels. Each table pairs the
//! two. The built-in tables are the directory's reference taxonomy; a
//! deployment may replace any of them from a JSON file so the tables can be
//! versioned independently of the binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Error, Result};

/// Career stages. The code is the label, so stored positions read naturally.
pub const POSITIONS: &[(&str, &str)] = &[
    ("Undergraduate student", "Undergraduate student"),
    ("Masters student", "Masters student"),
    (
        "Predoc/postbac fellow/resident",
        "Predoc/postbac fellow/resident",
    ),
    ("PhD student", "PhD student"),
    ("Post-doctoral researcher", "Post-doctoral researcher"),
    ("Research scientist/engineer", "Research scientist/engineer"),
    (
        "Senior research scientist/engineer",
        "Senior research scientist/engineer",
    ),
    ("Data scientist/engineer", "Data scientist/engineer"),
    (
        "Senior data scientist/engineer",
        "Senior data scientist/engineer",
    ),
    ("Software engineer", "Software engineer"),
    ("Lecturer", "Lecturer"),
    ("Assistant Professor", "Assistant Professor"),
    ("Associate Professor", "Associate Professor"),
    ("Professor", "Professor"),
    ("Program/product manager", "Program/product manager"),
    ("Director/founder/advisor", "Director/founder/advisor"),
];

pub const METHODS: &[(&str, &str)] = &[
    ("SL", "Supervised learning"),
    ("UL", "Unsupervised learning"),
    ("ALG", "Algorithms: active, online, multi-task learning, etc."),
    ("DL", "Deep learning"),
    ("RL", "Reinforcement learning and planning"),
    ("REL", "Representation learning"),
    ("PR", "Probabilistic methods"),
    ("OPT", "Optimization methods"),
    ("LT", "Learning theory"),
    ("TR", "Trustworthy ML"),
    ("HAI", "Humans and AI"),
];

pub const APPLICATIONS: &[(&str, &str)] = &[
    ("AUD", "Audio and Speech Processing"),
    ("CV", "Computer Vision"),
    ("NLP", "Natural Language Processing (NLP)"),
    ("TS", "Time Series Analysis"),
    ("ROB", "Robotics"),
    ("CB", "Computational biology"),
    ("NS", "Neuroscience"),
    ("PS", "Physical sciences"),
    ("HC", "Healthcare"),
    ("SG", "Social good"),
    ("CS", "Climate science"),
    ("DEP", "Deployment of AI/ML systems"),
];

pub const MONTHS: &[(&str, &str)] = &[
    ("01", "January"),
    ("02", "February"),
    ("03", "March"),
    ("04", "April"),
    ("05", "May"),
    ("06", "June"),
    ("07", "July"),
    ("08", "August"),
    ("09", "September"),
    ("10", "October"),
    ("11", "November"),
    ("12", "December"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub code: String,
    pub label: String,
}

/// Ordered `(code, label)` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
}

impl LabelTable {
    pub fn new<I, C, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, label)| LabelEntry {
                    code: code.into(),
                    label: label.into(),
                })
                .collect(),
        }
    }

    fn from_static(entries: &[(&str, &str)]) -> Self {
        Self::new(entries.iter().copied())
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for a code, if the code is part of the table.
    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    /// Label for a code, falling back to the code itself for unknown values.
    pub fn label_or_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.label(code).unwrap_or(code)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// Codes whose label satisfies `pred`.
    pub fn codes_where<F>(&self, mut pred: F) -> BTreeSet<String>
    where
        F: FnMut(&str) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| pred(&e.label))
            .map(|e| e.code.clone())
            .collect()
    }
}

/// The label tables a directory deployment searches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enumerations {
    pub positions: LabelTable,
    pub methods: LabelTable,
    pub applications: LabelTable,
    pub months: LabelTable,
}

impl Default for Enumerations {
    fn default() -> Self {
        Self {
            positions: LabelTable::from_static(POSITIONS),
            methods: LabelTable::from_static(METHODS),
            applications: LabelTable::from_static(APPLICATIONS),
            months: LabelTable::from_static(MONTHS),
        }
    }
}

impl Enumerations {
    /// Load tables from a JSON document. Tables missing from the document keep
    /// their built-in values.
    ///
    /// ```json
    /// { "methods": [{ "code": "SL", "label": "Supervised learning" }] }
    /// ```
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::EnumerationFile {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw).map_err(|e| Error::EnumerationFile {
            path: display,
            message: e.to_string(),
        })
    }
}
