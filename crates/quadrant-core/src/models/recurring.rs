//! Recurrence descriptors attached to tasks.

use std::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize};

/// Unit of a recurrence interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
        }
    }
}

/// How often a task repeats, e.g. every 2 weeks.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub interval: NonZeroU32,
}

impl Recurrence {
    /// Builds a descriptor; an interval of zero is raised to one.
    pub fn new(kind: RecurrenceKind, interval: u32) -> Self {
        Self {
            kind,
            interval: NonZeroU32::new(interval).unwrap_or(NonZeroU32::MIN),
        }
    }

    /// Parses the CLI/user form `"<type>"` or `"<type>:<interval>"`.
    ///
    /// `"none"` yields `Ok(None)`.
    pub fn parse(text: &str) -> Result<Option<Self>, String> {
        let (kind, interval) = match text.split_once(':') {
            Some((kind, interval)) => (kind, Some(interval.trim())),
            None => (text, None),
        };
        let kind = match kind.trim().to_lowercase().as_str() {
            "none" => return Ok(None),
            "daily" => RecurrenceKind::Daily,
            "weekly" => RecurrenceKind::Weekly,
            "monthly" => RecurrenceKind::Monthly,
            other => return Err(format!("Invalid recurrence type: {other}")),
        };
        let interval = match interval {
            Some(interval) => interval
                .parse::<u32>()
                .map_err(|_| format!("Invalid recurrence interval: {interval}"))?,
            None => 1,
        };
        if interval == 0 {
            return Err("Recurrence interval must be a positive integer".to_string());
        }
        Ok(Some(Self::new(kind, interval)))
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.interval.get()) {
            (kind, 1) => write!(f, "{}", kind.as_str()),
            (RecurrenceKind::Daily, n) => write!(f, "every {n} days"),
            (RecurrenceKind::Weekly, n) => write!(f, "every {n} weeks"),
            (RecurrenceKind::Monthly, n) => write!(f, "every {n} months"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoredKind {
    None,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Deserialize)]
struct StoredRecurrence {
    #[serde(rename = "type")]
    kind: StoredKind,
    #[serde(default = "default_interval")]
    interval: u32,
}

fn default_interval() -> u32 {
    1
}

/// Deserializes an optional recurrence, mapping `{"type": "none"}` to `None`.
///
/// Use with `#[serde(default, deserialize_with = "...")]` on
/// `Option<Recurrence>` fields.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Recurrence>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredRecurrence>::deserialize(deserializer)?;
    Ok(stored.and_then(|stored| {
        let kind = match stored.kind {
            StoredKind::None => return None,
            StoredKind::Daily => RecurrenceKind::Daily,
            StoredKind::Weekly => RecurrenceKind::Weekly,
            StoredKind::Monthly => RecurrenceKind::Monthly,
        };
        Some(Recurrence::new(kind, stored.interval))
    }))
}
