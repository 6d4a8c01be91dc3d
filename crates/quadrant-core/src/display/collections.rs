//! Views over the task collection: the quadrant board, subtrees and plain
//! lists.

use std::{collections::HashSet, fmt};

use crate::models::{Quadrant, Task, TaskCollection, TaskId, TaskStatus};

/// The Eisenhower board: active top-level tasks per quadrant, each with its
/// sub-tasks nested below.
///
/// # Examples
///
/// ```rust
/// use quadrant_core::{display::Board, models::{Quadrant, Task, TaskCollection}};
///
/// let mut task = Task::new("File taxes", None);
/// task.quadrant = Quadrant::Do;
/// let tasks = TaskCollection::new(vec![task, Task::new("New idea", None)]);
///
/// let output = Board(&tasks).to_string();
/// assert!(output.contains("## Do First (urgent & important)"));
/// assert!(output.contains("File taxes"));
/// assert!(output.contains("## Unclassified"));
/// ```
pub struct Board<'a>(pub &'a TaskCollection);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = 0;
        for quadrant in Quadrant::MATRIX {
            let column = self.0.board_column(quadrant);
            writeln!(f, "## {} ({})", quadrant.label(), column.len())?;
            writeln!(f)?;
            if column.is_empty() {
                writeln!(f, "_Nothing here._")?;
            }
            for task in column {
                fmt_subtree(f, self.0, task, 0, &mut HashSet::new())?;
                shown += 1;
            }
            writeln!(f)?;
        }

        let waiting = self.0.board_column(Quadrant::Unclassified);
        if !waiting.is_empty() {
            writeln!(f, "## {} ({})", Quadrant::Unclassified.label(), waiting.len())?;
            writeln!(f)?;
            for task in &waiting {
                task.fmt_line(f, 0)?;
            }
            writeln!(f)?;
            writeln!(f, "Run `quadrant classify` to sort these into the matrix.")?;
            shown += waiting.len();
        }

        if shown == 0 {
            writeln!(f, "No active tasks. Add one with `quadrant add <NAME>`.")?;
        }
        Ok(())
    }
}

/// A task followed by its whole subtree, as shown by `quadrant show`.
pub struct TaskTree<'a> {
    pub tasks: &'a TaskCollection,
    pub root: &'a Task,
}

impl fmt::Display for TaskTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        let children = self.tasks.children_of(&self.root.id);
        if !children.is_empty() {
            writeln!(f, "#### Sub-tasks")?;
            writeln!(f)?;
            let mut visited = HashSet::from([&self.root.id]);
            for child in children {
                fmt_subtree(f, self.tasks, child, 0, &mut visited)?;
            }
        }
        Ok(())
    }
}

fn fmt_subtree<'a>(
    f: &mut fmt::Formatter<'_>,
    tasks: &'a TaskCollection,
    task: &'a Task,
    depth: usize,
    visited: &mut HashSet<&'a TaskId>,
) -> fmt::Result {
    if !visited.insert(&task.id) {
        return Ok(());
    }
    task.fmt_line(f, depth * 2)?;
    for child in tasks.children_of(&task.id) {
        fmt_subtree(f, tasks, child, depth + 1, visited)?;
    }
    Ok(())
}

/// Top-level tasks with one status, e.g. the trash.
pub struct StatusList<'a> {
    pub tasks: &'a TaskCollection,
    pub status: TaskStatus,
}

impl fmt::Display for StatusList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listed = self.tasks.top_level_with_status(self.status);
        if listed.is_empty() {
            return writeln!(f, "No {} tasks.", self.status);
        }
        for task in listed {
            fmt_subtree(f, self.tasks, task, 0, &mut HashSet::new())?;
        }
        Ok(())
    }
}

/// Numbered sub-task suggestions from a breakdown.
pub struct Suggestions<'a>(pub &'a [String]);

impl fmt::Display for Suggestions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No suggestions.");
        }
        for (number, name) in self.0.iter().enumerate() {
            writeln!(f, "{}. {name}", number + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TaskCollection, Task) {
        let mut parent = Task::new("Plan trip", None);
        parent.quadrant = Quadrant::Schedule;
        let child = Task::subtask_of(&parent, "Book flights");
        let grandchild = Task::subtask_of(&child, "Compare prices");
        let mut trashed = Task::new("Old idea", None);
        trashed.status = TaskStatus::Trashed;
        let tasks = TaskCollection::new(vec![parent.clone(), child, grandchild, trashed]);
        (tasks, parent)
    }

    #[test]
    fn test_board_nests_subtasks() {
        let (tasks, _) = sample();
        let output = Board(&tasks).to_string();

        assert!(output.contains("## Schedule (important, not urgent) (1)"));
        assert!(output.contains("\n  - `"));
        assert!(output.contains("Book flights"));
        assert!(output.contains("    - `"));
        assert!(!output.contains("Old idea"));
        assert!(!output.contains("## Unclassified"));
    }

    #[test]
    fn test_empty_board() {
        let output = Board(&TaskCollection::default()).to_string();
        assert!(output.contains("No active tasks."));
    }

    #[test]
    fn test_task_tree_lists_descendants() {
        let (tasks, parent) = sample();
        let output = TaskTree {
            tasks: &tasks,
            root: &parent,
        }
        .to_string();

        assert!(output.contains("#### Sub-tasks"));
        assert!(output.contains("Compare prices"));
    }

    #[test]
    fn test_status_list() {
        let (tasks, _) = sample();
        let trash = StatusList {
            tasks: &tasks,
            status: TaskStatus::Trashed,
        }
        .to_string();
        assert!(trash.contains("Old idea"));
        assert!(trash.contains("✗ Trashed"));

        let done = StatusList {
            tasks: &tasks,
            status: TaskStatus::Completed,
        }
        .to_string();
        assert_eq!(done, "No completed tasks.\n");
    }

    #[test]
    fn test_suggestions_are_numbered() {
        let names = vec!["Outline".to_string(), "Draft".to_string()];
        assert_eq!(Suggestions(&names).to_string(), "1. Outline\n2. Draft\n");
    }
}
