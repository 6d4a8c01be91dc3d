//! The single writer of task and profile state.
//!
//! [`TaskService`] owns the local task document. Every operation computes the
//! next collection from the current snapshot with a pure transform (see
//! [`transforms`]), commits it locally and then persists the whole
//! collection:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────┐   ┌─────────┐
//! │   Session    │──▶│ TaskService  │──▶│ LocalDocument │──▶│  store  │
//! │ (id resolve) │   │ (transforms) │   │ (commit+echo) │   │ (write) │
//! └──────────────┘   └──────────────┘   └───────────────┘   └─────────┘
//! ```
//!
//! A failed write surfaces as `QuadrantError::Persistence`; the local commit
//! is kept. Readers only ever see `Arc` snapshots.
//!
//! [`ProfileService`] does the same for the student context and settings
//! documents.

pub mod transforms;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use jiff::{civil::Date, Timestamp, Zoned};
use tokio::sync::watch;

use crate::{
    ai::ClassificationReply,
    error::Result,
    models::{
        AppSettings, Quadrant, Recurrence, StudentContext, Task, TaskCollection, TaskId,
        TaskStatus,
    },
    params::{validate_name, UpdateContext, UpdateSettings},
    sync::LocalDocument,
};

/// What a status change touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusChange {
    /// The task and every descendant whose status was set
    pub updated: Vec<TaskId>,
    /// Successor spawned by completing a recurring task
    pub successor: Option<Task>,
}

/// Result of classifying one task.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified {
        id: TaskId,
        reply: ClassificationReply,
    },
    /// Non-fatal failure; the diagnostic replaces the task's reasoning
    Failed { id: TaskId, diagnostic: String },
}

impl ClassificationOutcome {
    pub fn id(&self) -> &TaskId {
        match self {
            Self::Classified { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Classified { .. })
    }
}

/// Owner of the task collection.
#[derive(Clone)]
pub struct TaskService {
    document: Arc<LocalDocument<TaskCollection>>,
}

impl TaskService {
    pub fn new(document: Arc<LocalDocument<TaskCollection>>) -> Self {
        Self { document }
    }

    /// Current immutable snapshot of the collection.
    pub fn snapshot(&self) -> Arc<TaskCollection> {
        self.document.snapshot()
    }

    /// Receiver notified after every local or remote change.
    pub fn watch(&self) -> watch::Receiver<Arc<TaskCollection>> {
        self.document.watch()
    }

    /// Adds a new top-level task awaiting classification.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - When the name is blank (nothing is
    ///   committed)
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn add_task(&self, name: &str, due_date: Option<Date>) -> Result<Task> {
        let task = Task::new(validate_name(name)?, due_date);
        log::debug!("Adding task {}", task.id);
        self.document
            .commit(|tasks| (transforms::append(tasks, &[task.clone()]), task.clone()))
            .await
    }

    /// Adds one sub-task per non-blank name under `parent_id`.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - When the parent does not exist
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn add_subtasks(&self, parent_id: &TaskId, names: &[String]) -> Result<Vec<Task>> {
        self.document
            .try_commit(|tasks| transforms::add_subtasks(tasks, parent_id, names))
            .await
    }

    /// Sets the status of a task and its descendants.
    ///
    /// Completing a recurring task appends its successor. An unknown id
    /// changes nothing but the collection is still written.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn change_status(&self, id: &TaskId, status: TaskStatus) -> Result<StatusChange> {
        let (today, now) = clock();
        let change = self
            .document
            .commit(|tasks| transforms::change_status(tasks, id, status, today, now))
            .await?;
        if let Some(successor) = &change.successor {
            log::info!("Spawned recurring successor {} of {id}", successor.id);
        }
        Ok(change)
    }

    /// Restores a task and all of its descendants to `active`.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn recover_from_trash(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.document
            .commit(|tasks| transforms::recover(tasks, id))
            .await
    }

    /// Removes a task and all of its descendants for good.
    ///
    /// The caller is expected to have asked for confirmation.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn permanently_delete(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.document
            .commit(|tasks| transforms::remove_subtree(tasks, id))
            .await
    }

    /// Removes every trashed task together with its descendants.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn empty_trash(&self) -> Result<Vec<TaskId>> {
        let removed = self.document.commit(transforms::empty_trash).await?;
        log::info!("Emptied trash: {} task(s) removed", removed.len());
        Ok(removed)
    }

    /// Overwrites name, due date and recurrence of a task.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - When the name is blank
    /// * `QuadrantError::TaskNotFound` - When the task does not exist
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn update_details(
        &self,
        id: &TaskId,
        name: &str,
        due_date: Option<Date>,
        recurring: Option<Recurrence>,
    ) -> Result<Task> {
        let name = validate_name(name)?;
        self.document
            .try_commit(|tasks| transforms::update_details(tasks, id, name, due_date, recurring))
            .await
    }

    /// Files a task under another quadrant by hand.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - When the task does not exist
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn move_quadrant(&self, id: &TaskId, from: Quadrant, to: Quadrant) -> Result<Task> {
        self.document
            .try_commit(|tasks| transforms::move_quadrant(tasks, id, from, to))
            .await
    }

    /// Merges a batch of classifier outcomes in one commit.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn apply_classifications(
        &self,
        outcomes: &[ClassificationOutcome],
    ) -> Result<Vec<TaskId>> {
        self.document
            .commit(|tasks| transforms::apply_classifications(tasks, outcomes))
            .await
    }

    /// Replaces the whole collection, as an import does.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn replace_all(&self, collection: TaskCollection) -> Result<()> {
        self.document.commit(|_| (collection, ())).await
    }
}

fn clock() -> (Date, Timestamp) {
    let now = Zoned::now();
    (now.date(), now.timestamp())
}

/// Owner of the student context and settings documents.
#[derive(Clone)]
pub struct ProfileService {
    context: Arc<LocalDocument<StudentContext>>,
    settings: Arc<LocalDocument<AppSettings>>,
}

impl ProfileService {
    pub fn new(
        context: Arc<LocalDocument<StudentContext>>,
        settings: Arc<LocalDocument<AppSettings>>,
    ) -> Self {
        Self { context, settings }
    }

    pub fn context(&self) -> Arc<StudentContext> {
        self.context.snapshot()
    }

    pub fn settings(&self) -> Arc<AppSettings> {
        self.settings.snapshot()
    }

    /// Applies a context edit and persists the record.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn update_context(&self, params: &UpdateContext) -> Result<StudentContext> {
        self.context
            .commit(|current| {
                let next = params.apply(current);
                (next.clone(), next)
            })
            .await
    }

    /// Applies a settings edit and persists the record.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn update_settings(&self, params: &UpdateSettings) -> Result<AppSettings> {
        self.settings
            .commit(|current| {
                let next = params.apply(current);
                (next.clone(), next)
            })
            .await
    }

    /// Replaces the context record wholesale.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn replace_context(&self, context: StudentContext) -> Result<()> {
        self.context.commit(|_| (context, ())).await
    }

    /// Replaces the settings record wholesale.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - When the store write fails
    pub async fn replace_settings(&self, settings: AppSettings) -> Result<()> {
        self.settings.commit(|_| (settings, ())).await
    }
}
