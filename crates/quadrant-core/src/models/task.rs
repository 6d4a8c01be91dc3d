//! Task model definition and related functionality.

use std::fmt;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{
    dates::deserialize_optional_date,
    recurring::{self, Recurrence},
    Quadrant, TaskStatus,
};

/// Opaque, client-generated task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh identifier.
    ///
    /// Ids are random (v4) UUID strings, so any short prefix is as likely
    /// to be unique as any other. Collisions are not checked for.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to address a task from the CLI.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single task or sub-task on the matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, immutable once created
    pub id: TaskId,

    /// Display name, never blank
    pub name: String,

    /// Optional calendar due date
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due_date: Option<Date>,

    /// Matrix quadrant the task is filed under
    #[serde(default)]
    pub quadrant: Quadrant,

    /// Classifier (or manual move) justification for the quadrant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Classifier justification for a suggested due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_reasoning: Option<String>,

    /// Classifier hint on when to work on the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling_hint: Option<String>,

    /// Creation time, used to order siblings
    pub created_at: Timestamp,

    /// Lifecycle status
    #[serde(default)]
    pub status: TaskStatus,

    /// Recurrence descriptor; `{"type": "none"}` reads as absent
    #[serde(default, deserialize_with = "recurring::deserialize_optional")]
    pub recurring: Option<Recurrence>,

    /// Owning task for sub-tasks
    #[serde(default)]
    pub parent_id: Option<TaskId>,
}

impl Task {
    /// Creates a fresh top-level task awaiting classification.
    pub fn new(name: impl Into<String>, due_date: Option<Date>) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.into(),
            due_date,
            quadrant: Quadrant::Unclassified,
            reasoning: None,
            date_reasoning: None,
            scheduling_hint: None,
            created_at: Timestamp::now(),
            status: TaskStatus::Active,
            recurring: None,
            parent_id: None,
        }
    }

    /// Creates a sub-task filed under the parent's quadrant.
    pub fn subtask_of(parent: &Task, name: impl Into<String>) -> Self {
        Self {
            quadrant: parent.quadrant,
            parent_id: Some(parent.id.clone()),
            ..Self::new(name, None)
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_trashed(&self) -> bool {
        self.status == TaskStatus::Trashed
    }

    /// True for active, top-level tasks the classifier has not filed yet.
    pub fn awaits_classification(&self) -> bool {
        self.is_active() && self.is_top_level() && self.quadrant == Quadrant::Unclassified
    }
}
