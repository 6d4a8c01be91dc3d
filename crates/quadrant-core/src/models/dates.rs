//! Lenient calendar-date deserialization.
//!
//! Stored documents and AI replies sometimes carry `""` or `"null"` where a
//! date is absent. Those read as `None`; anything else must be a valid
//! `YYYY-MM-DD` date.

use jiff::civil::Date;
use serde::{de::Error as _, Deserialize, Deserializer};

/// Deserializes an optional `YYYY-MM-DD` date, treating blanks as absent.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(text) => parse_date(text).map(Some).map_err(D::Error::custom),
    }
}

/// Parses a calendar date, accepting a trailing time component.
///
/// AI replies occasionally return `2024-03-01T00:00:00`; only the date part
/// is kept.
pub fn parse_date(text: &str) -> Result<Date, String> {
    let date_part = text.get(..10).unwrap_or(text);
    date_part
        .parse::<Date>()
        .map_err(|e| format!("Invalid date '{text}': {e}"))
}
