//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    classify::BatchReport,
    models::{Task, TaskId},
    service::StatusChange,
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use quadrant_core::{display::CreateResult, models::Task};
///
/// let task = Task::new("Read chapter 4", None);
/// let output = CreateResult::new(task.clone()).to_string();
/// assert!(output.starts_with(&format!("Created task with ID: {}", task.id)));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Vec<Task>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.len() {
            0 => return writeln!(f, "No sub-tasks created."),
            1 => writeln!(f, "Created 1 sub-task:")?,
            n => writeln!(f, "Created {n} sub-tasks:")?,
        }
        writeln!(f)?;
        for task in &self.resource {
            task.fmt_line(f, 0)?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated task with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<StatusChange> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.updated.len() {
            0 => writeln!(f, "No tasks changed.")?,
            1 => writeln!(f, "Updated 1 task.")?,
            n => writeln!(f, "Updated {n} tasks (including sub-tasks).")?,
        }
        if let Some(successor) = &self.resource.successor {
            writeln!(f)?;
            write!(f, "Next occurrence scheduled:")?;
            match successor.due_date {
                Some(due) => writeln!(f, " `{}` due {due}", successor.id.short())?,
                None => writeln!(f, " `{}`", successor.id.short())?,
            }
        }
        Ok(())
    }
}

/// Wrapper type for displaying removals: deletes, trash recovery and
/// emptying the trash all report the ids they touched.
pub struct DeleteResult<'a> {
    pub action: &'a str,
    pub ids: Vec<TaskId>,
}

impl<'a> DeleteResult<'a> {
    pub fn new(action: &'a str, ids: Vec<TaskId>) -> Self {
        Self { action, ids }
    }
}

impl fmt::Display for DeleteResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ids.len() {
            0 => writeln!(f, "Nothing to do."),
            1 => writeln!(f, "{} 1 task.", self.action),
            n => writeln!(f, "{} {n} tasks.", self.action),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nothing_to_do() {
            return writeln!(f, "Nothing to classify.");
        }
        writeln!(
            f,
            "Classified {} of {} task(s).",
            self.classified, self.requested
        )?;
        if self.failed > 0 {
            writeln!(
                f,
                "{} task(s) stayed unclassified; see their notes and run `quadrant classify` again.",
                self.failed
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_subtask_creation_counts() {
        let parent = Task::new("Essay", None);
        let children = vec![
            Task::subtask_of(&parent, "Outline"),
            Task::subtask_of(&parent, "Draft"),
        ];

        let output = CreateResult::new(children).to_string();
        assert!(output.starts_with("Created 2 sub-tasks:"));
        assert!(output.contains("Outline"));
        assert_eq!(
            CreateResult::new(Vec::<Task>::new()).to_string(),
            "No sub-tasks created.\n"
        );
    }

    #[test]
    fn test_update_lists_changes() {
        let task = Task::new("Essay", None);
        let output =
            UpdateResult::with_changes(task, vec!["Renamed to 'Essay'".to_string()]).to_string();
        assert!(output.contains("Changes made:\n- Renamed to 'Essay'"));
    }

    #[test]
    fn test_status_change_mentions_successor() {
        let task = Task::new("Gym", Some(date(2024, 3, 8)));
        let change = StatusChange {
            updated: vec![task.id.clone()],
            successor: Some(task),
        };

        let output = UpdateResult::new(change).to_string();
        assert!(output.starts_with("Updated 1 task."));
        assert!(output.contains("Next occurrence scheduled:"));
        assert!(output.contains("due 2024-03-08"));
    }

    #[test]
    fn test_delete_result_counts() {
        assert_eq!(DeleteResult::new("Deleted", vec![]).to_string(), "Nothing to do.\n");
        assert_eq!(
            DeleteResult::new("Recovered", vec![TaskId::generate(), TaskId::generate()])
                .to_string(),
            "Recovered 2 tasks.\n"
        );
    }

    #[test]
    fn test_batch_report() {
        assert_eq!(BatchReport::default().to_string(), "Nothing to classify.\n");

        let report = BatchReport {
            requested: 3,
            classified: 2,
            failed: 1,
        };
        let output = report.to_string();
        assert!(output.starts_with("Classified 2 of 3 task(s)."));
        assert!(output.contains("1 task(s) stayed unclassified"));
    }
}
