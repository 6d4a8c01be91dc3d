//! Orchestration of every AI-backed operation.
//!
//! Classification is the only fan-out in the crate: one request per task,
//! all in flight at once, merged into the task collection with a single
//! commit once every request has answered. A rejected credential stops the
//! batch and nothing is applied; any other failure is recorded on that task
//! only.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use jiff::{civil::Date, Zoned};

use crate::{
    ai::{
        prompts::{self, ClassificationRequest},
        truncate, AiBoundary, AiError, AiReply, BreakdownReply, ClassificationReply,
        CoachingReply, MoodReply,
    },
    error::{QuadrantError, Result},
    models::{Quadrant, StudentContext, Task, TaskCollection, TaskId},
    service::{ClassificationOutcome, TaskService},
};

/// Characters of an error kept in a task's failure note.
const DIAGNOSTIC_CHARS: usize = 100;

/// Counts reported after a classification batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Tasks sent to the classifier
    pub requested: usize,
    /// Tasks that received a quadrant
    pub classified: usize,
    /// Tasks left unclassified with a failure note
    pub failed: usize,
}

impl BatchReport {
    /// True when there was nothing to classify.
    pub fn nothing_to_do(&self) -> bool {
        self.requested == 0
    }
}

/// Note stored in `reasoning` when a task could not be classified.
pub fn failure_note(message: &str) -> String {
    format!(
        "Classification failed: {}",
        truncate(message.trim(), DIAGNOSTIC_CHARS)
    )
}

fn require(credential: Option<&str>) -> Result<&str> {
    credential.ok_or(QuadrantError::MissingCredential)
}

/// Runs AI requests on behalf of a session.
#[derive(Clone)]
pub struct Classifier {
    ai: Arc<dyn AiBoundary>,
}

impl Classifier {
    pub fn new(ai: Arc<dyn AiBoundary>) -> Self {
        Self { ai }
    }

    /// Classifies `batch` concurrently and merges the outcomes into `tasks`.
    ///
    /// An empty batch returns an empty report without checking the
    /// credential.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::MissingCredential` - No credential; nothing was sent
    /// * `QuadrantError::CredentialRejected` - A request was refused for its
    ///   credential; no task was changed
    /// * `QuadrantError::Persistence` - The merged collection could not be
    ///   written (it is kept locally)
    pub async fn classify_batch(
        &self,
        tasks: &TaskService,
        context: &StudentContext,
        credential: Option<&str>,
        batch: Vec<Task>,
    ) -> Result<BatchReport> {
        if batch.is_empty() {
            log::info!("Nothing to classify");
            return Ok(BatchReport::default());
        }
        let credential = require(credential)?;

        let snapshot = tasks.snapshot();
        let today = today();
        let mut pending: FuturesUnordered<_> = batch
            .iter()
            .map(|task| {
                let prompt = ClassificationRequest::new(task, &snapshot, context, today).render();
                let id = task.id.clone();
                let ai = Arc::clone(&self.ai);
                let credential = credential.to_string();
                async move { (id, ai.generate(&credential, &prompt).await) }
            })
            .collect();
        log::debug!("Dispatched {} classification request(s)", pending.len());

        let mut outcomes = Vec::with_capacity(batch.len());
        while let Some((id, result)) = pending.next().await {
            match result {
                Err(e) if e.is_credential() => {
                    log::warn!("Classification of {id} rejected the credential: {e}");
                    return Err(QuadrantError::CredentialRejected);
                }
                Err(e) => outcomes.push(failed(id, &e.to_string())),
                Ok(raw) => match AiReply::<ClassificationReply>::parse(&raw).into_result() {
                    Ok(reply) => outcomes.push(ClassificationOutcome::Classified { id, reply }),
                    Err(diagnostic) => outcomes.push(failed(id, &diagnostic)),
                },
            }
        }

        let applied = tasks.apply_classifications(&outcomes).await?;
        let classified = outcomes
            .iter()
            .filter(|o| o.is_classified() && applied.contains(o.id()))
            .count();
        let report = BatchReport {
            requested: batch.len(),
            classified,
            failed: applied.len() - classified,
        };
        log::info!(
            "Classified {} of {} task(s), {} failed",
            report.classified,
            report.requested,
            report.failed
        );
        Ok(report)
    }

    /// Classifies one task again, whatever its current quadrant.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::TaskNotFound` - The task does not exist
    /// * everything [`Classifier::classify_batch`] returns
    pub async fn reclassify_one(
        &self,
        tasks: &TaskService,
        context: &StudentContext,
        credential: Option<&str>,
        id: &TaskId,
    ) -> Result<BatchReport> {
        let task = tasks
            .snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| QuadrantError::TaskNotFound { id: id.clone() })?;
        self.classify_batch(tasks, context, credential, vec![task])
            .await
    }

    /// Asks for sub-task suggestions; nothing is created.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::MissingCredential` / `CredentialRejected`
    /// * `QuadrantError::Ai` - The request failed or the reply was unreadable
    pub async fn breakdown(&self, credential: Option<&str>, task: &Task) -> Result<Vec<String>> {
        let raw = self.request(credential, &prompts::breakdown(&task.name)).await?;
        let reply = AiReply::<BreakdownReply>::parse(&raw)
            .into_result()
            .map_err(|message| QuadrantError::Ai { message })?;
        log::debug!("Breakdown of {} suggested {} sub-task(s)", task.id, reply.subtasks.len());
        Ok(reply.subtasks)
    }

    /// One-sentence reaction to a manual move. Any failure yields `""`.
    pub async fn move_coaching_insight(
        &self,
        credential: &str,
        task_name: &str,
        from: Quadrant,
        to: Quadrant,
    ) -> String {
        let prompt = prompts::coaching(task_name, from, to);
        let insight = match self.ai.generate(credential, &prompt).await {
            Ok(raw) => AiReply::<CoachingReply>::parse(&raw)
                .into_result()
                .map(|reply| reply.insight),
            Err(e) => Err(e.to_string()),
        };
        insight.unwrap_or_else(|e| {
            log::warn!("Coaching insight unavailable: {e}");
            String::new()
        })
    }

    /// Suggests what to do next given `mood` and the active "do" tasks.
    ///
    /// # Errors
    ///
    /// * `QuadrantError::MissingCredential` / `CredentialRejected`
    /// * `QuadrantError::Ai` - The request failed or the reply was unreadable
    pub async fn mood_suggestion(
        &self,
        credential: Option<&str>,
        mood: &str,
        tasks: &TaskCollection,
    ) -> Result<String> {
        if mood.trim().is_empty() {
            return Err(QuadrantError::invalid_input("mood").with_reason("Mood cannot be empty"));
        }
        let urgent: Vec<&str> = tasks
            .board_column(Quadrant::Do)
            .into_iter()
            .map(|task| task.name.as_str())
            .collect();
        let raw = self.request(credential, &prompts::mood(mood, &urgent)).await?;
        AiReply::<MoodReply>::parse(&raw)
            .into_result()
            .map(|reply| reply.suggestion)
            .map_err(|message| QuadrantError::Ai { message })
    }

    async fn request(&self, credential: Option<&str>, prompt: &str) -> Result<String> {
        let credential = require(credential)?;
        self.ai.generate(credential, prompt).await.map_err(|e| match e {
            AiError::InvalidCredential(_) => QuadrantError::CredentialRejected,
            other => QuadrantError::Ai {
                message: truncate(&other.to_string(), DIAGNOSTIC_CHARS),
            },
        })
    }
}

fn failed(id: TaskId, message: &str) -> ClassificationOutcome {
    log::warn!("Classification of {id} failed: {message}");
    ClassificationOutcome::Failed {
        id,
        diagnostic: failure_note(message),
    }
}

/// Today's date in the local time zone.
pub(crate) fn today() -> Date {
    Zoned::now().date()
}
