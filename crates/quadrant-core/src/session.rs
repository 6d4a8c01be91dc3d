//! Per-user entry point tying state, sync and AI together.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    ai::{AiBoundary, AiConfig, GeminiClient},
    classify::{BatchReport, Classifier},
    error::{QuadrantError, Result},
    models::{AppSettings, StudentContext, Task, TaskCollection, TaskId},
    params::{
        AddSubtasks, AddTask, ChangeStatus, Id, MoveQuadrant, UpdateContext, UpdateDetails,
        UpdateSettings,
    },
    service::{ProfileService, StatusChange, TaskService},
    store::{DocumentStore, Slot, SqliteStore},
    sync::{LocalDocument, RemoteMirror, RemoteSink, SyncBridge, SyncHandles},
    transfer::ExportBundle,
};

/// User id used when none is given.
pub const DEFAULT_USER: &str = "local";

/// Builder for creating and configuring [`Session`] instances.
pub struct SessionBuilder {
    database_path: Option<PathBuf>,
    user: String,
    ai_config: AiConfig,
    store: Option<Arc<dyn DocumentStore>>,
    ai: Option<Arc<dyn AiBoundary>>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            user: DEFAULT_USER.to_string(),
            ai_config: AiConfig::default(),
            store: None,
            ai: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/quadrant/quadrant.db` or
    /// `~/.local/share/quadrant/quadrant.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the user whose documents are opened.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the endpoint and model of the default AI client.
    pub fn with_ai_config(mut self, config: AiConfig) -> Self {
        self.ai_config = config;
        self
    }

    /// Uses `store` instead of the SQLite database.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses `ai` instead of the HTTP client.
    pub fn with_ai_boundary(mut self, ai: Arc<dyn AiBoundary>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Opens the store, hydrates local state and starts syncing.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::InvalidInput` if the user id is blank
    /// Returns `QuadrantError::FileSystem` if the database path is invalid
    /// Returns `QuadrantError::Database` if database initialization fails
    /// Returns `QuadrantError::Configuration` if the HTTP client cannot be built
    pub async fn build(self) -> Result<Session> {
        let user = self.user.trim().to_string();
        if user.is_empty() {
            return Err(QuadrantError::invalid_input("user").with_reason("User id cannot be empty"));
        }

        let store: Arc<dyn DocumentStore> = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };
                log::debug!("Opening document store at {}", db_path.display());
                Arc::new(SqliteStore::open(db_path).await?)
            }
        };
        let ai: Arc<dyn AiBoundary> = match self.ai {
            Some(ai) => ai,
            None => Arc::new(GeminiClient::new(self.ai_config)?),
        };

        let mirror = Arc::new(RemoteMirror::new(Arc::clone(&store), user.clone()));
        let tasks = Arc::new(LocalDocument::<TaskCollection>::new(Slot::Tasks, mirror.clone()));
        let context = Arc::new(LocalDocument::<StudentContext>::new(Slot::Context, mirror.clone()));
        let settings = Arc::new(LocalDocument::<AppSettings>::new(Slot::Settings, mirror));

        let sinks: Vec<(Slot, Arc<dyn RemoteSink>)> = vec![
            (Slot::Tasks, tasks.clone() as Arc<dyn RemoteSink>),
            (Slot::Context, context.clone() as Arc<dyn RemoteSink>),
            (Slot::Settings, settings.clone() as Arc<dyn RemoteSink>),
        ];
        let sync = SyncBridge::attach(&store, &user, sinks).await?;
        log::info!("Session for '{user}' ready with {} task(s)", tasks.snapshot().len());

        Ok(Session {
            user,
            tasks: TaskService::new(tasks),
            profile: ProfileService::new(context, settings),
            classifier: Classifier::new(ai),
            sync: Mutex::new(sync),
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("quadrant")
            .place_data_file("quadrant.db")
            .map_err(|e| QuadrantError::XdgDirectory(e.to_string()))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a manual quadrant move.
pub struct MoveOutcome {
    pub task: Task,
    /// Pending coaching insight, when coaching is on and a key is set
    pub coaching: Option<JoinHandle<String>>,
}

/// One signed-in user's view of their tasks, context and settings.
///
/// Ids in parameters may be full ids or unambiguous prefixes. Dropping the
/// session (or calling [`Session::sign_out`]) cancels every sync
/// subscription.
pub struct Session {
    user: String,
    tasks: TaskService,
    profile: ProfileService,
    classifier: Classifier,
    sync: Mutex<SyncHandles>,
}

impl Session {
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Current task snapshot.
    pub fn tasks(&self) -> Arc<TaskCollection> {
        self.tasks.snapshot()
    }

    /// Receiver notified whenever the task collection changes.
    pub fn watch_tasks(&self) -> watch::Receiver<Arc<TaskCollection>> {
        self.tasks.watch()
    }

    pub fn context(&self) -> Arc<StudentContext> {
        self.profile.context()
    }

    pub fn settings(&self) -> Arc<AppSettings> {
        self.profile.settings()
    }

    /// Resolves a full id or unambiguous prefix.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - No task matches
    /// * `QuadrantError::InvalidInput` - The prefix is ambiguous
    pub fn resolve(&self, id: &str) -> Result<TaskId> {
        self.tasks().resolve(id).map(|task| task.id.clone())
    }

    /// Looks up a single task.
    ///
    /// # Errors
    ///
    /// See [`Session::resolve`].
    pub fn show_task(&self, params: &Id) -> Result<Task> {
        self.tasks().resolve(&params.id).cloned()
    }

    /// Adds a top-level task.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - Blank name
    /// * `QuadrantError::Persistence` - The write failed; the task is kept
    pub async fn add_task(&self, params: &AddTask) -> Result<Task> {
        self.tasks.add_task(&params.name, params.due_date).await
    }

    /// Adds sub-tasks, e.g. the accepted part of a breakdown.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - Unknown parent
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn add_subtasks(&self, params: &AddSubtasks) -> Result<Vec<Task>> {
        let parent = self.resolve(&params.parent_id)?;
        self.tasks.add_subtasks(&parent, &params.names).await
    }

    /// Changes the status of a task and its descendants.
    ///
    /// An id matching no task is passed through and changes nothing.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - The prefix is ambiguous
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn change_status(&self, params: &ChangeStatus) -> Result<StatusChange> {
        let id = match self.resolve(&params.id) {
            Ok(id) => id,
            Err(QuadrantError::TaskNotFound { id }) => id,
            Err(e) => return Err(e),
        };
        self.tasks.change_status(&id, params.status).await
    }

    /// Restores a trashed task and its descendants.
    ///
    /// # Errors
    ///
    /// See [`Session::resolve`]; `QuadrantError::Persistence` on write
    /// failure.
    pub async fn recover_from_trash(&self, params: &Id) -> Result<Vec<TaskId>> {
        let id = self.resolve(&params.id)?;
        self.tasks.recover_from_trash(&id).await
    }

    /// Deletes a task and its descendants for good.
    ///
    /// # Errors
    ///
    /// See [`Session::resolve`]; `QuadrantError::Persistence` on write
    /// failure.
    pub async fn permanently_delete(&self, params: &Id) -> Result<Vec<TaskId>> {
        let id = self.resolve(&params.id)?;
        self.tasks.permanently_delete(&id).await
    }

    /// Deletes every trashed task and its descendants.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn empty_trash(&self) -> Result<Vec<TaskId>> {
        self.tasks.empty_trash().await
    }

    /// Edits name, due date and recurrence.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - Blank name or ambiguous id
    /// * `QuadrantError::TaskNotFound` - Unknown task
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn update_details(&self, params: &UpdateDetails) -> Result<Task> {
        let name = params.validate()?;
        let id = self.resolve(&params.id)?;
        self.tasks
            .update_details(&id, name, params.due_date, params.recurring)
            .await
    }

    /// Moves a task to another quadrant by hand.
    ///
    /// When coaching is enabled and an API key is set, a coaching insight is
    /// requested in the background; awaiting the handle is optional.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - Unknown task
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn move_quadrant(&self, params: &MoveQuadrant) -> Result<MoveOutcome> {
        let id = self.resolve(&params.id)?;
        let task = self
            .tasks
            .move_quadrant(&id, params.from, params.to)
            .await?;

        let settings = self.settings();
        let coaching = match settings.credential() {
            Some(credential) if settings.coaching_enabled && params.from != params.to => {
                let classifier = self.classifier.clone();
                let credential = credential.to_string();
                let name = task.name.clone();
                let (from, to) = (params.from, params.to);
                Some(tokio::spawn(async move {
                    classifier
                        .move_coaching_insight(&credential, &name, from, to)
                        .await
                }))
            }
            _ => None,
        };

        Ok(MoveOutcome { task, coaching })
    }

    /// Classifies every active, top-level, unclassified task.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::MissingCredential` - No API key set
    /// * `QuadrantError::CredentialRejected` - The key was refused; no task
    ///   changed
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn classify_unclassified(&self) -> Result<BatchReport> {
        let batch = self.tasks().awaiting_classification();
        let settings = self.settings();
        self.classifier
            .classify_batch(&self.tasks, &self.context(), settings.credential(), batch)
            .await
    }

    /// Classifies one task again.
    ///
    /// # Errors
    ///
    /// As [`Session::classify_unclassified`], plus id resolution errors.
    pub async fn reclassify(&self, params: &Id) -> Result<BatchReport> {
        let id = self.resolve(&params.id)?;
        let settings = self.settings();
        self.classifier
            .reclassify_one(&self.tasks, &self.context(), settings.credential(), &id)
            .await
    }

    /// Asks for sub-task suggestions without creating anything.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::MissingCredential` / `CredentialRejected`
    /// * `QuadrantError::Ai` - The request failed
    pub async fn breakdown(&self, params: &Id) -> Result<(Task, Vec<String>)> {
        let task = self.show_task(params)?;
        let settings = self.settings();
        let suggestions = self
            .classifier
            .breakdown(settings.credential(), &task)
            .await?;
        Ok((task, suggestions))
    }

    /// Suggests what to do next for `mood`, or the mood stored in the
    /// context when `None`.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidInput` - No mood given or stored
    /// * `QuadrantError::MissingCredential` / `CredentialRejected`
    /// * `QuadrantError::Ai` - The request failed
    pub async fn mood_suggestion(&self, mood: Option<&str>) -> Result<String> {
        let context = self.context();
        let mood = mood.unwrap_or(context.mood.as_str());
        let settings = self.settings();
        self.classifier
            .mood_suggestion(settings.credential(), mood, &self.tasks())
            .await
    }

    /// Edits the student context.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn update_context(&self, params: &UpdateContext) -> Result<StudentContext> {
        self.profile.update_context(params).await
    }

    /// Edits settings, including the API key.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::Persistence` - The write failed
    pub async fn update_settings(&self, params: &UpdateSettings) -> Result<AppSettings> {
        self.profile.update_settings(params).await
    }

    /// Snapshot of everything, in export format.
    pub fn export(&self) -> ExportBundle {
        ExportBundle {
            tasks: self.tasks().as_ref().clone(),
            student_context: self.context().as_ref().clone(),
            settings: self.settings().as_ref().clone(),
        }
    }

    /// Validates an export file and replaces all three documents with it.
    ///
    /// All three local documents are replaced before any write is awaited,
    /// so a failed write never leaves a half-imported snapshot behind.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::InvalidImport` - Nothing was written
    /// * `QuadrantError::Persistence` - One or more writes failed after
    ///   validation; the error names every failed slot and the imported
    ///   state is kept locally
    pub async fn import(&self, text: &str) -> Result<ExportBundle> {
        let bundle = ExportBundle::from_json(text)?;
        let (tasks, context, settings) = futures::join!(
            self.tasks.replace_all(bundle.tasks.clone()),
            self.profile.replace_context(bundle.student_context.clone()),
            self.profile.replace_settings(bundle.settings.clone()),
        );
        let failures = [tasks, context, settings]
            .into_iter()
            .filter_map(|written| written.err())
            .collect();
        if let Some(error) = combine_write_failures(failures) {
            return Err(error);
        }
        log::info!("Imported {} task(s)", bundle.tasks.len());
        Ok(bundle)
    }

    /// True while the given document still receives remote changes.
    pub fn is_syncing(&self, slot: Slot) -> bool {
        self.sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_active(slot)
    }

    /// Stops applying remote changes for every document.
    pub fn sign_out(&self) {
        self.sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_all();
        log::debug!("Signed out '{}'", self.user);
    }
}

/// Folds the failed writes of a multi-document update into one error.
///
/// Persistence failures are merged into a single `Persistence` naming every
/// slot; any other error is returned as is.
fn combine_write_failures(failures: Vec<QuadrantError>) -> Option<QuadrantError> {
    let mut slots = Vec::new();
    let mut messages: Vec<String> = Vec::new();
    for failure in failures {
        match failure {
            QuadrantError::Persistence { slot, message } => {
                slots.push(slot);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
            other => return Some(other),
        }
    }
    if slots.is_empty() {
        return None;
    }
    Some(QuadrantError::Persistence {
        slot: slots.join(", "),
        message: messages.join("; "),
    })
}
