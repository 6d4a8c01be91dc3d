//! The flat, ordered task collection.

use serde::{Deserialize, Serialize};

use super::{Quadrant, Task, TaskId, TaskStatus};
use crate::error::{QuadrantError, Result};

/// Every task of one user, in insertion order.
///
/// The hierarchy is encoded through [`Task::parent_id`]; see
/// [`crate::descendants`] for walks over it. Snapshots handed out by the
/// mutation service are immutable; only the service builds new ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Task> {
        self.tasks.iter_mut()
    }

    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Task) -> bool,
    {
        self.tasks.retain(keep);
    }

    /// Looks a task up by full id or by an unambiguous id prefix.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - no task matches
    /// * `QuadrantError::InvalidInput` - the prefix matches several tasks
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Task> {
        let wanted = id_or_prefix.trim();
        if let Some(task) = self.tasks.iter().find(|task| task.id.as_str() == wanted) {
            return Ok(task);
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|task| !wanted.is_empty() && task.id.as_str().starts_with(wanted));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task),
            (Some(_), Some(_)) => Err(QuadrantError::invalid_input("id")
                .with_reason(format!("'{wanted}' matches more than one task"))),
            _ => Err(QuadrantError::TaskNotFound {
                id: TaskId::from(wanted),
            }),
        }
    }

    /// Active, top-level, unclassified tasks: the input of a classification
    /// batch.
    pub fn awaiting_classification(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.awaits_classification())
            .cloned()
            .collect()
    }

    /// Active top-level tasks of a quadrant, oldest first.
    pub fn board_column(&self, quadrant: Quadrant) -> Vec<&Task> {
        let mut column: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.is_active() && task.is_top_level() && task.quadrant == quadrant)
            .collect();
        column.sort_by_key(|task| task.created_at);
        column
    }

    /// Direct children of a task, oldest first.
    pub fn children_of(&self, id: &TaskId) -> Vec<&Task> {
        let mut children: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.parent_id.as_ref() == Some(id))
            .collect();
        children.sort_by_key(|task| task.created_at);
        children
    }

    /// Top-level tasks with the given status, oldest first.
    pub fn top_level_with_status(&self, status: TaskStatus) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.is_top_level() && task.status == status)
            .collect();
        tasks.sort_by_key(|task| task.created_at);
        tasks
    }
}

impl FromIterator<Task> for TaskCollection {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
