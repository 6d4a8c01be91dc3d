//! Command-line interface definitions using clap
//!
//! Every subcommand has its own argument struct with clap derives; where the
//! core has a matching parameter type a `From` impl converts into it, so the
//! core never sees clap:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Session
//! ```
//!
//! Commands that need the current state before building their parameters
//! (`edit`, `move`) do that merge in [`crate::cli`].

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use jiff::civil::Date;
use quadrant_core::{
    models::{DatedNote, Quadrant, Recurrence, TaskStatus},
    params::{AddSubtasks, AddTask, ChangeStatus, Id, UpdateContext, UpdateSettings},
};

/// Eisenhower-matrix task manager with AI-assisted triage
///
/// Tasks start unclassified; `quadrant classify` sorts them into
/// do / schedule / delegate / delete. Running without a command shows the
/// board.
#[derive(Parser)]
#[command(version, about, name = "quadrant")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/quadrant/quadrant.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Account whose documents are opened
    #[arg(long, global = true, env = "QUADRANT_USER", default_value = "local")]
    pub user: String,

    /// Base URL of the generative language API
    #[arg(long, global = true, env = "QUADRANT_AI_ENDPOINT")]
    pub ai_endpoint: Option<String>,

    /// Model used for every AI request
    #[arg(long, global = true, env = "QUADRANT_MODEL")]
    pub model: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    #[command(alias = "a")]
    Add(AddArgs),
    /// Show the quadrant board
    #[command(alias = "b")]
    Board,
    /// List top-level tasks with a given status
    #[command(aliases = ["l", "ls"])]
    List(ListArgs),
    /// Show a task and its sub-tasks
    #[command(alias = "s")]
    Show(IdArgs),
    /// Add sub-tasks under a task
    Sub(SubArgs),
    /// Ask the AI to suggest sub-tasks
    Breakdown(BreakdownArgs),
    /// Mark a task and its sub-tasks completed
    Done(IdArgs),
    /// Set the status of a task and its sub-tasks
    Status(StatusArgs),
    /// Move a task and its sub-tasks to the trash
    Trash(IdArgs),
    /// Restore a trashed task and its sub-tasks
    Recover(IdArgs),
    /// Delete a task and its sub-tasks permanently
    #[command(alias = "rm")]
    Delete(DeleteArgs),
    /// Permanently delete everything in the trash
    EmptyTrash(ConfirmArgs),
    /// Edit name, due date or recurrence
    Edit(EditArgs),
    /// Move a task to another quadrant by hand
    #[command(alias = "mv")]
    Move(MoveArgs),
    /// Classify every unclassified task
    Classify,
    /// Classify one task again
    Reclassify(IdArgs),
    /// Show or edit what the AI knows about you
    Context(ContextArgs),
    /// Show or edit settings
    Settings(SettingsArgs),
    /// Ask what to work on given how you feel
    Mood(MoodArgs),
    /// Write all data as JSON
    Export(ExportArgs),
    /// Replace all data with an export file
    Import(ImportArgs),
}

fn parse_date(text: &str) -> Result<Date, String> {
    quadrant_core::models::dates::parse_date(text)
}

/// A parsed `--repeat` value; `none` stops a task from recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatArg(pub Option<Recurrence>);

fn parse_recurrence(text: &str) -> Result<RepeatArg, String> {
    Recurrence::parse(text).map(RepeatArg)
}

/// Add a new task
#[derive(ClapArgs)]
pub struct AddArgs {
    /// Name of the task
    pub name: String,
    /// Due date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    pub due: Option<Date>,
}

impl From<AddArgs> for AddTask {
    fn from(val: AddArgs) -> Self {
        AddTask {
            name: val.name,
            due_date: val.due,
        }
    }
}

/// Any command taking just a task id
#[derive(ClapArgs)]
pub struct IdArgs {
    /// Task id or unambiguous prefix
    pub id: String,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Status values accepted on the command line
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Completed,
    Trashed,
}

impl From<StatusArg> for TaskStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Active => TaskStatus::Active,
            StatusArg::Completed => TaskStatus::Completed,
            StatusArg::Trashed => TaskStatus::Trashed,
        }
    }
}

#[derive(ClapArgs)]
pub struct ListArgs {
    /// Which tasks to list
    #[arg(short, long, value_enum, default_value = "completed")]
    pub status: StatusArg,
}

#[derive(ClapArgs)]
pub struct StatusArgs {
    /// Task id or unambiguous prefix
    pub id: String,
    /// New status
    #[arg(value_enum)]
    pub status: StatusArg,
}

impl From<StatusArgs> for ChangeStatus {
    fn from(val: StatusArgs) -> Self {
        ChangeStatus {
            id: val.id,
            status: val.status.into(),
        }
    }
}

#[derive(ClapArgs)]
pub struct SubArgs {
    /// Id of the parent task
    pub parent_id: String,
    /// Names of the sub-tasks
    #[arg(required = true)]
    pub names: Vec<String>,
}

impl From<SubArgs> for AddSubtasks {
    fn from(val: SubArgs) -> Self {
        AddSubtasks {
            parent_id: val.parent_id,
            names: val.names,
        }
    }
}

#[derive(ClapArgs)]
pub struct BreakdownArgs {
    /// Task id or unambiguous prefix
    pub id: String,
    /// Add every suggestion as a sub-task right away
    #[arg(long)]
    pub accept: bool,
}

#[derive(ClapArgs)]
pub struct DeleteArgs {
    /// Task id or unambiguous prefix
    pub id: String,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(ClapArgs)]
pub struct ConfirmArgs {
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

/// Edit a task. Omitted flags keep the current value.
#[derive(ClapArgs)]
pub struct EditArgs {
    /// Task id or unambiguous prefix
    pub id: String,
    /// New name
    #[arg(short, long)]
    pub name: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date, conflicts_with = "no_due")]
    pub due: Option<Date>,
    /// Remove the due date
    #[arg(long)]
    pub no_due: bool,
    /// Recurrence: daily, weekly, monthly, optionally with `:<interval>`,
    /// or `none`
    #[arg(short, long, value_parser = parse_recurrence)]
    pub repeat: Option<RepeatArg>,
}

/// Quadrants a task can be moved into
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum QuadrantArg {
    Do,
    Schedule,
    Delegate,
    Delete,
}

impl From<QuadrantArg> for Quadrant {
    fn from(val: QuadrantArg) -> Self {
        match val {
            QuadrantArg::Do => Quadrant::Do,
            QuadrantArg::Schedule => Quadrant::Schedule,
            QuadrantArg::Delegate => Quadrant::Delegate,
            QuadrantArg::Delete => Quadrant::Delete,
        }
    }
}

#[derive(ClapArgs)]
pub struct MoveArgs {
    /// Task id or unambiguous prefix
    pub id: String,
    /// Destination quadrant
    #[arg(value_enum)]
    pub to: QuadrantArg,
}

/// Show the student context, or edit it when any flag is given
#[derive(ClapArgs)]
pub struct ContextArgs {
    /// Long-term goals
    #[arg(long)]
    pub goals: Option<String>,
    /// Current mood
    #[arg(long)]
    pub mood: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Add an upcoming exam
    #[arg(long)]
    pub exam: Option<String>,
    /// Date of the exam added with --exam
    #[arg(long, value_parser = parse_date, requires = "exam")]
    pub exam_date: Option<Date>,
    /// Add an upcoming assignment
    #[arg(long)]
    pub assignment: Option<String>,
    /// Date of the assignment added with --assignment
    #[arg(long, value_parser = parse_date, requires = "assignment")]
    pub assignment_date: Option<Date>,
    /// Forget every recorded exam and assignment
    #[arg(long)]
    pub clear_deadlines: bool,
}

impl ContextArgs {
    pub fn is_edit(&self) -> bool {
        self.goals.is_some()
            || self.mood.is_some()
            || self.notes.is_some()
            || self.exam.is_some()
            || self.assignment.is_some()
            || self.clear_deadlines
    }
}

impl From<ContextArgs> for UpdateContext {
    fn from(val: ContextArgs) -> Self {
        UpdateContext {
            goals: val.goals,
            mood: val.mood,
            notes: val.notes,
            exam: val.exam.map(|text| DatedNote {
                text,
                date: val.exam_date,
            }),
            assignment: val.assignment.map(|text| DatedNote {
                text,
                date: val.assignment_date,
            }),
            clear_deadlines: val.clear_deadlines,
        }
    }
}

/// Show settings, or edit them when any flag is given
#[derive(ClapArgs)]
pub struct SettingsArgs {
    /// API key for the AI provider; an empty value removes it
    #[arg(long)]
    pub api_key: Option<String>,
    /// Ask for a coaching insight after manual moves
    #[arg(long)]
    pub coaching: Option<bool>,
}

impl SettingsArgs {
    pub fn is_edit(&self) -> bool {
        self.api_key.is_some() || self.coaching.is_some()
    }
}

impl From<SettingsArgs> for UpdateSettings {
    fn from(val: SettingsArgs) -> Self {
        UpdateSettings {
            api_key: val.api_key,
            coaching_enabled: val.coaching,
        }
    }
}

#[derive(ClapArgs)]
pub struct MoodArgs {
    /// How you feel; defaults to the mood stored in your context
    pub mood: Option<String>,
}

#[derive(ClapArgs)]
pub struct ExportArgs {
    /// Output file; prints to stdout when omitted
    pub file: Option<PathBuf>,
}

#[derive(ClapArgs)]
pub struct ImportArgs {
    /// Export file to read
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_edit_parses_recurrence() {
        let args = Args::try_parse_from(["quadrant", "edit", "abc", "--repeat", "weekly:2"]).unwrap();
        let Some(Commands::Edit(edit)) = args.command else {
            panic!("expected edit");
        };
        assert_eq!(edit.repeat.unwrap().0.unwrap().to_string(), "every 2 weeks");

        let args = Args::try_parse_from(["quadrant", "edit", "abc", "--repeat", "none"]).unwrap();
        let Some(Commands::Edit(edit)) = args.command else {
            panic!("expected edit");
        };
        assert_eq!(edit.repeat, Some(RepeatArg(None)));
    }

    #[test]
    fn test_context_conversion() {
        let args = Args::try_parse_from([
            "quadrant",
            "context",
            "--exam",
            "Calculus",
            "--exam-date",
            "2024-06-01",
        ])
        .unwrap();
        let Some(Commands::Context(context)) = args.command else {
            panic!("expected context");
        };
        assert!(context.is_edit());

        let params = UpdateContext::from(context);
        let exam = params.exam.unwrap();
        assert_eq!(exam.text, "Calculus");
        assert_eq!(exam.date, Some(jiff::civil::date(2024, 6, 1)));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(Args::try_parse_from(["quadrant", "add", "Essay", "--due", "tomorrow"]).is_err());
    }
}
