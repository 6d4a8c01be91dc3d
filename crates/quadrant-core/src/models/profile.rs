//! Per-user auxiliary records read by the classifier.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::dates::deserialize_optional_date;

/// A free-text item with an optional date, such as an exam or assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatedNote {
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<Date>,
}

/// What the classifier should know about the user's situation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentContext {
    /// Upcoming exams
    pub exams: Vec<DatedNote>,
    /// Assignments with deadlines
    pub assignments: Vec<DatedNote>,
    /// Longer-term goals
    pub goals: String,
    /// Current mood, also used for mood suggestions
    pub mood: String,
    /// Anything else worth knowing
    pub notes: String,
}

impl StudentContext {
    /// True when nothing has been filled in.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// User preferences, including the AI credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// API key for the AI provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Whether manual quadrant moves ask for a coaching insight
    pub coaching_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            coaching_enabled: true,
        }
    }
}

impl AppSettings {
    /// The configured API key, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
