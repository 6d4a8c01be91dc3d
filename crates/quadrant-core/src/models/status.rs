//! Status and quadrant enumerations for tasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of task statuses.
///
/// Completion and trashing are soft, reversible states; only a permanent
/// delete removes a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is open and shown on the board
    #[default]
    Active,

    /// Task has been done
    Completed,

    /// Task was moved to the trash and can still be recovered
    Trashed,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TaskStatus::Active),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "trashed" | "trash" => Ok(TaskStatus::Trashed),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Convert to the persisted string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
            TaskStatus::Trashed => "trashed",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadrant_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(TaskStatus::Active.with_icon(), "○ Active");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Active => "○ Active",
            TaskStatus::Completed => "✓ Completed",
            TaskStatus::Trashed => "✗ Trashed",
        }
    }
}

/// The Eisenhower matrix quadrants plus the pre-classification placeholder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// Urgent and important
    Do,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    /// Neither urgent nor important
    Delete,
    /// Not yet classified
    #[default]
    Unclassified,
}

impl Quadrant {
    /// The four classified quadrants in board order.
    pub const MATRIX: [Quadrant; 4] = [
        Quadrant::Do,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Delete,
    ];

    /// Convert to the persisted string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Do => "do",
            Quadrant::Schedule => "schedule",
            Quadrant::Delegate => "delegate",
            Quadrant::Delete => "delete",
            Quadrant::Unclassified => "unclassified",
        }
    }

    /// Human-facing heading used on the board and in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::Do => "Do First (urgent & important)",
            Quadrant::Schedule => "Schedule (important, not urgent)",
            Quadrant::Delegate => "Delegate (urgent, not important)",
            Quadrant::Delete => "Eliminate (neither urgent nor important)",
            Quadrant::Unclassified => "Unclassified",
        }
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "do" => Ok(Quadrant::Do),
            "schedule" => Ok(Quadrant::Schedule),
            "delegate" => Ok(Quadrant::Delegate),
            "delete" => Ok(Quadrant::Delete),
            "unclassified" => Ok(Quadrant::Unclassified),
            _ => Err(format!("Invalid quadrant: {s}")),
        }
    }
}

/// A quadrant the classifier is allowed to assign.
///
/// Deserialization rejects anything other than the four matrix quadrants, so a
/// reply carrying `"unclassified"` or an invented label fails to parse instead
/// of being coerced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignedQuadrant {
    Do,
    Schedule,
    Delegate,
    Delete,
}

impl From<AssignedQuadrant> for Quadrant {
    fn from(value: AssignedQuadrant) -> Self {
        match value {
            AssignedQuadrant::Do => Quadrant::Do,
            AssignedQuadrant::Schedule => Quadrant::Schedule,
            AssignedQuadrant::Delegate => Quadrant::Delegate,
            AssignedQuadrant::Delete => Quadrant::Delete,
        }
    }
}
