//! Export and import of a user's whole state as one JSON document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{QuadrantError, Result},
    models::{AppSettings, StudentContext, TaskCollection},
};

const REQUIRED_KEYS: [&str; 3] = ["tasks", "studentContext", "settings"];

/// `{tasks, studentContext, settings}`, the export file format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub tasks: TaskCollection,
    pub student_context: StudentContext,
    pub settings: AppSettings,
}

impl ExportBundle {
    /// Pretty-printed JSON for an export file.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates and parses an import file.
    ///
    /// The shape is checked first (an object with all three keys, `tasks`
    /// an array), then the whole bundle is deserialized. Nothing is returned
    /// unless every part is readable, so callers never write a partial
    /// import.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::InvalidImport` naming the first problem found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadrant_core::transfer::ExportBundle;
    ///
    /// let bundle = ExportBundle::from_json(
    ///     r#"{"tasks": [], "studentContext": {}, "settings": {"coachingEnabled": false}}"#,
    /// )?;
    /// assert!(bundle.tasks.is_empty());
    /// assert!(!bundle.settings.coaching_enabled);
    ///
    /// assert!(ExportBundle::from_json(r#"{"tasks": {}}"#).is_err());
    /// # Ok::<(), quadrant_core::QuadrantError>(())
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| QuadrantError::invalid_import(format!("not valid JSON: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(QuadrantError::invalid_import("expected a JSON object"));
        };
        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
            return Err(QuadrantError::invalid_import(format!("missing '{missing}'")));
        }
        if !object["tasks"].is_array() {
            return Err(QuadrantError::invalid_import("'tasks' must be an array"));
        }

        serde_json::from_value(value)
            .map_err(|e| QuadrantError::invalid_import(format!("unreadable content: {e}")))
    }
}
