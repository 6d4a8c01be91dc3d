//! Prompt construction for every AI request.
//!
//! Each prompt asks for a bare JSON object and spells out its exact shape so
//! the reply can be parsed by [`super::reply`]. The first line of the
//! classification prompt is always `Task: <name>`.

use std::fmt::Write as _;

use jiff::civil::Date;

use crate::models::{DatedNote, Quadrant, StudentContext, Task, TaskCollection};

/// Everything the classifier is told about one task.
#[derive(Debug, Clone)]
pub struct ClassificationRequest<'a> {
    pub task: &'a Task,
    pub today: Date,
    pub context: &'a StudentContext,
    /// Active "do" and "schedule" tasks, for workload awareness
    pub workload: Vec<&'a Task>,
}

impl<'a> ClassificationRequest<'a> {
    /// Builds a request for `task` against the current board.
    pub fn new(
        task: &'a Task,
        board: &'a TaskCollection,
        context: &'a StudentContext,
        today: Date,
    ) -> Self {
        let workload = [Quadrant::Do, Quadrant::Schedule]
            .into_iter()
            .flat_map(|quadrant| board.board_column(quadrant))
            .filter(|other| other.id != task.id)
            .collect();
        Self {
            task,
            today,
            context,
            workload,
        }
    }

    /// True when the task is a freshly spawned recurring instance.
    pub fn is_recurring_instance(&self) -> bool {
        self.task.recurring.is_some()
            && self.task.reasoning.as_deref() == Some(crate::recurrence::NEEDS_CLASSIFICATION)
    }

    pub fn render(&self) -> String {
        let mut prompt = String::new();
        let _ = writeln!(prompt, "Task: {}", self.task.name);
        let _ = writeln!(
            prompt,
            "Current due date: {}",
            self.task
                .due_date
                .map_or_else(|| "none".to_string(), |date| date.to_string())
        );
        if self.is_recurring_instance() {
            let _ = writeln!(
                prompt,
                "This is a new instance of a recurring task ({}).",
                self.task
                    .recurring
                    .map(|recurrence| recurrence.to_string())
                    .unwrap_or_default()
            );
        }
        let _ = writeln!(prompt, "Today: {}", self.today);
        prompt.push('\n');

        prompt.push_str(
            "You are a productivity coach for a student. Classify the task into one \
             Eisenhower matrix quadrant:\n\
             - \"do\": urgent and important\n\
             - \"schedule\": important but not urgent\n\
             - \"delegate\": urgent but not important\n\
             - \"delete\": neither urgent nor important\n\n",
        );

        write_context(&mut prompt, self.context);

        if !self.workload.is_empty() {
            prompt.push_str("Current workload:\n");
            for other in &self.workload {
                let _ = writeln!(
                    prompt,
                    "- [{}] {}{}",
                    other.quadrant.as_str(),
                    other.name,
                    other
                        .due_date
                        .map(|date| format!(" (due {date})"))
                        .unwrap_or_default()
                );
            }
            prompt.push('\n');
        }

        prompt.push_str(
            "If the task has no due date, or a better one exists given the workload, \
             suggest one.\n\
             Reply with only this JSON object:\n\
             {\"quadrant\": \"do|schedule|delegate|delete\", \"reasoning\": \"one or two sentences\", \
             \"suggestedDate\": \"YYYY-MM-DD or empty\", \"dateReasoning\": \"why that date\", \
             \"schedulingHint\": \"when to work on it\"}\n",
        );
        prompt
    }
}

fn write_context(prompt: &mut String, context: &StudentContext) {
    if context.is_empty() {
        return;
    }
    prompt.push_str("About the student:\n");
    write_notes(prompt, "Exams", &context.exams);
    write_notes(prompt, "Assignments", &context.assignments);
    for (label, value) in [
        ("Goals", &context.goals),
        ("Mood", &context.mood),
        ("Notes", &context.notes),
    ] {
        if !value.trim().is_empty() {
            let _ = writeln!(prompt, "{label}: {}", value.trim());
        }
    }
    prompt.push('\n');
}

fn write_notes(prompt: &mut String, label: &str, notes: &[DatedNote]) {
    if notes.is_empty() {
        return;
    }
    let _ = writeln!(prompt, "{label}:");
    for note in notes {
        match note.date {
            Some(date) => {
                let _ = writeln!(prompt, "- {} ({date})", note.text);
            }
            None => {
                let _ = writeln!(prompt, "- {}", note.text);
            }
        }
    }
}

/// Prompt asking for suggested sub-task names.
pub fn breakdown(task_name: &str) -> String {
    format!(
        "Task: {task_name}\n\n\
         Break this task into 3 to 6 small, concrete sub-tasks a student can finish \
         in one sitting each.\n\
         Reply with only this JSON object:\n\
         {{\"subtasks\": [\"first sub-task\", \"second sub-task\"]}}\n"
    )
}

/// Prompt asking for a one-line insight about a manual quadrant move.
pub fn coaching(task_name: &str, from: Quadrant, to: Quadrant) -> String {
    format!(
        "Task: {task_name}\n\n\
         The student manually moved this task from \"{}\" to \"{}\" in their \
         Eisenhower matrix. In one encouraging sentence, comment on what this move \
         says about their priorities.\n\
         Reply with only this JSON object:\n\
         {{\"insight\": \"one sentence\"}}\n",
        from.label(),
        to.label()
    )
}

/// Prompt asking which urgent task best fits the current mood.
pub fn mood(mood: &str, do_tasks: &[&str]) -> String {
    let mut prompt = format!("Mood: {}\n\n", mood.trim());
    if do_tasks.is_empty() {
        prompt.push_str("The student has no urgent tasks right now.\n");
    } else {
        prompt.push_str("Urgent and important tasks:\n");
        for name in do_tasks {
            let _ = writeln!(prompt, "- {name}");
        }
    }
    prompt.push_str(
        "\nSuggest, in two sentences at most, what the student should do next given \
         how they feel.\n\
         Reply with only this JSON object:\n\
         {\"suggestion\": \"your suggestion\"}\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::{Recurrence, RecurrenceKind};

    #[test]
    fn test_classification_prompt_starts_with_task_line() {
        let task = Task::new("Write essay", Some(date(2024, 5, 1)));
        let board = TaskCollection::new(vec![task.clone()]);
        let context = StudentContext::default();
        let prompt = ClassificationRequest::new(&task, &board, &context, date(2024, 4, 1)).render();

        assert!(prompt.starts_with("Task: Write essay\n"));
        assert!(prompt.contains("Current due date: 2024-05-01"));
        assert!(prompt.contains("Today: 2024-04-01"));
        assert!(!prompt.contains("About the student"));
        assert!(!prompt.contains("recurring"));
    }

    #[test]
    fn test_classification_prompt_includes_context_and_workload() {
        let task = Task::new("Write essay", None);
        let mut busy = Task::new("Lab report", Some(date(2024, 4, 3)));
        busy.quadrant = Quadrant::Do;
        let mut parked = Task::new("Clean desk", None);
        parked.quadrant = Quadrant::Delete;
        let board = TaskCollection::new(vec![task.clone(), busy, parked]);
        let context = StudentContext {
            exams: vec![DatedNote {
                text: "Calculus".to_string(),
                date: Some(date(2024, 4, 20)),
            }],
            mood: "tired".to_string(),
            ..StudentContext::default()
        };

        let prompt = ClassificationRequest::new(&task, &board, &context, date(2024, 4, 1)).render();
        assert!(prompt.contains("- Calculus (2024-04-20)"));
        assert!(prompt.contains("Mood: tired"));
        assert!(prompt.contains("- [do] Lab report (due 2024-04-03)"));
        assert!(!prompt.contains("Clean desk"));
    }

    #[test]
    fn test_recurring_instance_is_flagged() {
        let mut task = Task::new("Weekly review", None);
        task.recurring = Some(Recurrence::new(RecurrenceKind::Weekly, 1));
        task.reasoning = Some(crate::recurrence::NEEDS_CLASSIFICATION.to_string());
        let board = TaskCollection::default();
        let context = StudentContext::default();

        let request = ClassificationRequest::new(&task, &board, &context, date(2024, 4, 1));
        assert!(request.is_recurring_instance());
        assert!(request.render().contains("new instance of a recurring task (weekly)"));
    }

    #[test]
    fn test_other_prompts() {
        assert!(breakdown("Move house").starts_with("Task: Move house"));
        let coaching = coaching("Gym", Quadrant::Do, Quadrant::Delete);
        assert!(coaching.contains("Do First"));
        assert!(coaching.contains("Eliminate"));
        assert!(mood("anxious", &[]).contains("no urgent tasks"));
        assert!(mood("calm", &["Essay"]).contains("- Essay"));
    }
}
