//! Typed parsing of raw AI replies.
//!
//! Models often wrap JSON in a fenced code block. The fence is stripped before
//! parsing, and the result is an explicit [`AiReply`]: either the parsed
//! structure or the raw text that failed to parse.

use jiff::civil::Date;
use serde::{de::DeserializeOwned, Deserialize};

use super::truncate;
use crate::models::{dates::deserialize_optional_date, AssignedQuadrant};

/// How much of a malformed reply is kept in diagnostics.
const RAW_EXCERPT_CHARS: usize = 100;

/// Outcome of parsing one reply.
#[derive(Debug, Clone, PartialEq)]
pub enum AiReply<T> {
    Parsed(T),
    Malformed { raw: String, reason: String },
}

impl<T: DeserializeOwned> AiReply<T> {
    /// Strips any code fence and parses the remainder as `T`.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<T>(strip_code_fence(raw)) {
            Ok(parsed) => AiReply::Parsed(parsed),
            Err(e) => AiReply::Malformed {
                raw: raw.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

impl<T> AiReply<T> {
    /// Converts to a `Result` whose error is a short diagnostic including the
    /// start of the raw reply.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            AiReply::Parsed(parsed) => Ok(parsed),
            AiReply::Malformed { raw, reason } => Err(format!(
                "unreadable reply ({reason}): {}",
                truncate(raw.trim(), RAW_EXCERPT_CHARS)
            )),
        }
    }
}

/// Returns the content of a fenced code block, or the trimmed input when there
/// is no fence.
///
/// # Examples
///
/// ```rust
/// use quadrant_core::ai::reply::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
/// ```
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = &trimmed[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the fence line.
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Reply to a classification request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReply {
    pub quadrant: AssignedQuadrant,
    pub reasoning: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub suggested_date: Option<Date>,
    #[serde(default)]
    pub date_reasoning: Option<String>,
    #[serde(default)]
    pub scheduling_hint: Option<String>,
}

/// Reply to a breakdown request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BreakdownReply {
    pub subtasks: Vec<String>,
}

/// Reply to a coaching request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CoachingReply {
    pub insight: String,
}

/// Reply to a mood suggestion request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MoodReply {
    pub suggestion: String,
}
