//! Pure snapshot transforms behind every task mutation.
//!
//! Each function takes the current collection and returns the next one plus
//! whatever the caller reports back. None of them touch the clock; "today"
//! and "now" are passed in.

use std::collections::HashSet;

use jiff::{civil::Date, Timestamp};

use super::{ClassificationOutcome, StatusChange};
use crate::{
    descendants::{subtree_of, ChildIndex},
    error::{QuadrantError, Result},
    models::{Quadrant, Recurrence, Task, TaskCollection, TaskId, TaskStatus},
    recurrence::spawn_successor,
};

pub(crate) fn append(tasks: &TaskCollection, new_tasks: &[Task]) -> TaskCollection {
    let mut next = tasks.clone();
    for task in new_tasks {
        next.push(task.clone());
    }
    next
}

/// Builds one sub-task per non-blank name under `parent_id`.
pub(crate) fn add_subtasks(
    tasks: &TaskCollection,
    parent_id: &TaskId,
    names: &[String],
) -> Result<(TaskCollection, Vec<Task>)> {
    let parent = tasks.get(parent_id).ok_or_else(|| QuadrantError::TaskNotFound {
        id: parent_id.clone(),
    })?;
    let created: Vec<Task> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| Task::subtask_of(parent, name))
        .collect();
    Ok((append(tasks, &created), created))
}

/// Sets `status` on a task and its whole subtree; completing a recurring task
/// appends its successor.
///
/// An unknown id leaves the collection as it is.
pub(crate) fn change_status(
    tasks: &TaskCollection,
    id: &TaskId,
    status: TaskStatus,
    today: Date,
    now: Timestamp,
) -> (TaskCollection, StatusChange) {
    let Some(task) = tasks.get(id) else {
        log::debug!("Status change for unknown task {id} ignored");
        return (tasks.clone(), StatusChange::default());
    };

    let (mut next, updated) = set_subtree_status(tasks, id, status);

    // A completion event is a transition into `completed`.
    let successor = if status == TaskStatus::Completed && !task.is_completed() {
        spawn_successor(task, today, now)
    } else {
        None
    };
    if let Some(successor) = &successor {
        next.push(successor.clone());
    }

    (next, StatusChange { updated, successor })
}

fn set_subtree_status(
    tasks: &TaskCollection,
    id: &TaskId,
    status: TaskStatus,
) -> (TaskCollection, Vec<TaskId>) {
    let subtree = subtree_of(id, tasks);
    let mut next = tasks.clone();
    let mut updated = Vec::with_capacity(subtree.len());
    for task in next.iter_mut().filter(|task| subtree.contains(&task.id)) {
        task.status = status;
        updated.push(task.id.clone());
    }
    (next, updated)
}

/// Puts a task and its whole subtree back to `active`.
pub(crate) fn recover(tasks: &TaskCollection, id: &TaskId) -> (TaskCollection, Vec<TaskId>) {
    if !tasks.contains(id) {
        return (tasks.clone(), Vec::new());
    }
    set_subtree_status(tasks, id, TaskStatus::Active)
}

/// Removes a task and its whole subtree.
pub(crate) fn remove_subtree(tasks: &TaskCollection, id: &TaskId) -> (TaskCollection, Vec<TaskId>) {
    if !tasks.contains(id) {
        return (tasks.clone(), Vec::new());
    }
    remove_ids(tasks, &subtree_of(id, tasks))
}

/// Removes every trashed task together with everything below it.
pub(crate) fn empty_trash(tasks: &TaskCollection) -> (TaskCollection, Vec<TaskId>) {
    let index = ChildIndex::build(tasks);
    let mut doomed = HashSet::new();
    for task in tasks.iter().filter(|task| task.is_trashed()) {
        doomed.insert(task.id.clone());
        doomed.extend(index.descendants(&task.id));
    }
    remove_ids(tasks, &doomed)
}

fn remove_ids(tasks: &TaskCollection, doomed: &HashSet<TaskId>) -> (TaskCollection, Vec<TaskId>) {
    let removed: Vec<TaskId> = tasks
        .iter()
        .filter(|task| doomed.contains(&task.id))
        .map(|task| task.id.clone())
        .collect();
    let mut next = tasks.clone();
    next.retain(|task| !doomed.contains(&task.id));
    (next, removed)
}

/// Overwrites name, due date and recurrence of one task.
pub(crate) fn update_details(
    tasks: &TaskCollection,
    id: &TaskId,
    name: &str,
    due_date: Option<Date>,
    recurring: Option<Recurrence>,
) -> Result<(TaskCollection, Task)> {
    let mut next = tasks.clone();
    let task = next
        .get_mut(id)
        .ok_or_else(|| QuadrantError::TaskNotFound { id: id.clone() })?;
    task.name = name.to_string();
    task.due_date = due_date;
    task.recurring = recurring;
    let updated = task.clone();
    Ok((next, updated))
}

/// Note left in `reasoning` after a manual move.
pub fn manual_move_note(from: Quadrant, to: Quadrant) -> String {
    format!("Manually moved from {} to {}", from.as_str(), to.as_str())
}

/// Files a task under `to`, replacing its reasoning with a manual-move note.
pub(crate) fn move_quadrant(
    tasks: &TaskCollection,
    id: &TaskId,
    from: Quadrant,
    to: Quadrant,
) -> Result<(TaskCollection, Task)> {
    let mut next = tasks.clone();
    let task = next
        .get_mut(id)
        .ok_or_else(|| QuadrantError::TaskNotFound { id: id.clone() })?;
    task.quadrant = to;
    task.reasoning = Some(manual_move_note(from, to));
    let moved = task.clone();
    Ok((next, moved))
}

/// Merges classifier outcomes into the tasks that still exist.
///
/// Returns the ids that were found and updated; outcomes for tasks removed
/// in the meantime are dropped.
pub(crate) fn apply_classifications(
    tasks: &TaskCollection,
    outcomes: &[ClassificationOutcome],
) -> (TaskCollection, Vec<TaskId>) {
    let mut next = tasks.clone();
    let mut applied = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        let Some(task) = next.get_mut(outcome.id()) else {
            log::debug!("Dropping classification for vanished task {}", outcome.id());
            continue;
        };
        match outcome {
            ClassificationOutcome::Classified { reply, .. } => {
                task.quadrant = reply.quadrant.into();
                task.reasoning = Some(reply.reasoning.clone());
                task.date_reasoning.clone_from(&reply.date_reasoning);
                task.scheduling_hint.clone_from(&reply.scheduling_hint);
                if let Some(date) = reply.suggested_date {
                    task.due_date = Some(date);
                }
            }
            ClassificationOutcome::Failed { diagnostic, .. } => {
                task.reasoning = Some(diagnostic.clone());
            }
        }
        applied.push(task.id.clone());
    }

    (next, applied)
}
