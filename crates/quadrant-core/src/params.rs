//! Parameter structures for quadrant operations
//!
//! These structures are shared by every front end (the CLI today) and carry no
//! framework-specific derives. Front ends define their own argument types and
//! convert into these with `From` impls:
//!
//! ```ignore
//! #[derive(Args)]
//! pub struct AddArgs {
//!     pub name: String,
//!     #[arg(long)]
//!     pub due: Option<jiff::civil::Date>,
//! }
//!
//! impl From<AddArgs> for AddTask {
//!     fn from(args: AddArgs) -> Self {
//!         AddTask { name: args.name, due_date: args.due }
//!     }
//! }
//! ```
//!
//! Task ids are accepted as strings; session operations resolve them against
//! the current snapshot (full id or unambiguous prefix).

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    error::{QuadrantError, Result},
    models::{
        dates::deserialize_optional_date,
        recurring::{self, Recurrence},
        AppSettings, DatedNote, Quadrant, StudentContext, TaskStatus,
    },
};

/// Generic parameters for operations requiring just a task id.
///
/// Used for recover, permanent delete, reclassify and breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// Full id or unambiguous prefix of the task
    pub id: String,
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

/// Parameters for adding a top-level task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTask {
    /// Name of the task (required, not blank)
    pub name: String,
    /// Optional due date
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due_date: Option<Date>,
}

/// Parameters for adding sub-tasks under an existing task.
///
/// Blank names are skipped; every other name becomes one sub-task filed
/// under the parent's quadrant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubtasks {
    /// Id of the owning task
    pub parent_id: String,
    /// Names of the sub-tasks, in order
    #[serde(default)]
    pub names: Vec<String>,
}

/// Parameters for changing the lifecycle status of a task and its sub-tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatus {
    /// Task whose subtree changes status
    pub id: String,
    /// Target status
    pub status: TaskStatus,
}

/// Parameters for editing the user-editable fields of a task.
///
/// All three fields are overwritten; pass the current values to keep them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetails {
    /// Task to edit
    pub id: String,
    /// New name (required, not blank)
    pub name: String,
    /// New due date, `None` clears it
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due_date: Option<Date>,
    /// New recurrence, `None` stops the task from recurring
    #[serde(default, deserialize_with = "recurring::deserialize_optional")]
    pub recurring: Option<Recurrence>,
}

impl UpdateDetails {
    /// Returns the trimmed name.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - When the name is blank
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadrant_core::params::UpdateDetails;
    ///
    /// let params = UpdateDetails {
    ///     id: "0192".to_string(),
    ///     name: "  Essay draft ".to_string(),
    ///     ..UpdateDetails::default()
    /// };
    /// assert_eq!(params.validate()?, "Essay draft");
    ///
    /// let blank = UpdateDetails::default();
    /// assert!(blank.validate().is_err());
    /// # Ok::<(), quadrant_core::QuadrantError>(())
    /// ```
    pub fn validate(&self) -> Result<&str> {
        validate_name(&self.name)
    }
}

/// Parameters for a manual move between quadrants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveQuadrant {
    /// Task being moved
    pub id: String,
    /// Quadrant the task was in when the move started
    pub from: Quadrant,
    /// Destination quadrant
    pub to: Quadrant,
}

/// Parameters for editing the student context.
///
/// `None` fields are left as they are; new exams and assignments are appended
/// after `clear_deadlines` has been applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContext {
    pub goals: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
    /// Exam to append
    pub exam: Option<DatedNote>,
    /// Assignment to append
    pub assignment: Option<DatedNote>,
    /// Drop every recorded exam and assignment first
    #[serde(default)]
    pub clear_deadlines: bool,
}

impl UpdateContext {
    /// Applies the changes to a copy of `current`.
    pub fn apply(&self, current: &StudentContext) -> StudentContext {
        let mut next = current.clone();
        if self.clear_deadlines {
            next.exams.clear();
            next.assignments.clear();
        }
        if let Some(goals) = &self.goals {
            next.goals.clone_from(goals);
        }
        if let Some(mood) = &self.mood {
            next.mood.clone_from(mood);
        }
        if let Some(notes) = &self.notes {
            next.notes.clone_from(notes);
        }
        next.exams.extend(self.exam.clone());
        next.assignments.extend(self.assignment.clone());
        next
    }
}

/// Parameters for editing application settings.
///
/// An empty `api_key` removes the stored key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub api_key: Option<String>,
    pub coaching_enabled: Option<bool>,
}

impl UpdateSettings {
    /// Applies the changes to a copy of `current`.
    pub fn apply(&self, current: &AppSettings) -> AppSettings {
        let mut next = current.clone();
        if let Some(key) = &self.api_key {
            let key = key.trim();
            next.api_key = (!key.is_empty()).then(|| key.to_string());
        }
        if let Some(enabled) = self.coaching_enabled {
            next.coaching_enabled = enabled;
        }
        next
    }
}

/// Rejects blank task names and returns the trimmed name.
pub(crate) fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(QuadrantError::invalid_input("name").with_reason("Task name cannot be empty"));
    }
    Ok(trimmed)
}
