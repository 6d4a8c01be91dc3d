//! Command handlers.
//!
//! Each handler turns parsed arguments into core parameters, calls the
//! session and renders the result. Errors are wrapped with `anyhow` context
//! naming the command that failed.

use std::fs;

use anyhow::{bail, Context, Result};
use quadrant_core::{
    display::{
        Board, CreateResult, DeleteResult, OperationStatus, StatusList, Suggestions, TaskTree,
        UpdateResult,
    },
    params::{AddSubtasks, ChangeStatus, Id, MoveQuadrant, UpdateDetails},
    Session, TaskStatus,
};

use crate::{
    args::{
        AddArgs, BreakdownArgs, Commands, ConfirmArgs, ContextArgs, DeleteArgs, EditArgs,
        ExportArgs, IdArgs, ImportArgs, ListArgs, MoodArgs, MoveArgs, SettingsArgs, StatusArgs,
        SubArgs,
    },
    renderer::TerminalRenderer,
};

/// Runs commands against one session.
pub struct Cli {
    session: Session,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(session: Session, renderer: TerminalRenderer) -> Self {
        Self { session, renderer }
    }

    /// Stops syncing; called once the command has finished.
    pub fn sign_out(&self) {
        self.session.sign_out();
    }

    pub async fn handle_command(&self, command: Option<Commands>) -> Result<()> {
        match command {
            None | Some(Commands::Board) => {
                self.show_board();
                Ok(())
            }
            Some(Commands::Add(args)) => self.add(args).await,
            Some(Commands::List(args)) => {
                self.list(args);
                Ok(())
            }
            Some(Commands::Show(args)) => self.show(args),
            Some(Commands::Sub(args)) => self.add_subtasks(args).await,
            Some(Commands::Breakdown(args)) => self.breakdown(args).await,
            Some(Commands::Done(args)) => {
                self.change_status(ChangeStatus {
                    id: args.id,
                    status: TaskStatus::Completed,
                })
                .await
            }
            Some(Commands::Trash(args)) => {
                self.change_status(ChangeStatus {
                    id: args.id,
                    status: TaskStatus::Trashed,
                })
                .await
            }
            Some(Commands::Status(args)) => self.set_status(args).await,
            Some(Commands::Recover(args)) => self.recover(args).await,
            Some(Commands::Delete(args)) => self.delete(args).await,
            Some(Commands::EmptyTrash(args)) => self.empty_trash(args).await,
            Some(Commands::Edit(args)) => self.edit(args).await,
            Some(Commands::Move(args)) => self.move_task(args).await,
            Some(Commands::Classify) => self.classify().await,
            Some(Commands::Reclassify(args)) => self.reclassify(args).await,
            Some(Commands::Context(args)) => self.context(args).await,
            Some(Commands::Settings(args)) => self.settings(args).await,
            Some(Commands::Mood(args)) => self.mood(args).await,
            Some(Commands::Export(args)) => self.export(args),
            Some(Commands::Import(args)) => self.import(args).await,
        }
    }

    fn show_board(&self) {
        self.renderer.render(Board(&self.session.tasks()));
    }

    async fn add(&self, args: AddArgs) -> Result<()> {
        let task = self
            .session
            .add_task(&args.into())
            .await
            .context("Failed to add task")?;
        self.renderer.render(CreateResult::new(task));
        Ok(())
    }

    fn list(&self, args: ListArgs) {
        let tasks = self.session.tasks();
        self.renderer.render(StatusList {
            tasks: &tasks,
            status: args.status.into(),
        });
    }

    fn show(&self, args: IdArgs) -> Result<()> {
        let task = self
            .session
            .show_task(&args.into())
            .context("Failed to show task")?;
        let tasks = self.session.tasks();
        self.renderer.render(TaskTree {
            tasks: &tasks,
            root: &task,
        });
        Ok(())
    }

    async fn add_subtasks(&self, args: SubArgs) -> Result<()> {
        let created = self
            .session
            .add_subtasks(&args.into())
            .await
            .context("Failed to add sub-tasks")?;
        self.renderer.render(CreateResult::new(created));
        Ok(())
    }

    async fn breakdown(&self, args: BreakdownArgs) -> Result<()> {
        let (task, suggestions) = self
            .session
            .breakdown(&Id::from(args.id.as_str()))
            .await
            .context("Failed to break down task")?;
        self.renderer.render(Suggestions(&suggestions));

        if args.accept {
            let created = self
                .session
                .add_subtasks(&AddSubtasks {
                    parent_id: task.id.to_string(),
                    names: suggestions,
                })
                .await
                .context("Failed to add suggested sub-tasks")?;
            self.renderer.render(CreateResult::new(created));
        } else if !suggestions.is_empty() {
            self.renderer.render(OperationStatus::notice(format!(
                "Nothing was added. Re-run with --accept, or pick some with `quadrant sub {} <NAME>...`",
                task.id.short()
            )));
        }
        Ok(())
    }

    async fn change_status(&self, params: ChangeStatus) -> Result<()> {
        let change = self
            .session
            .change_status(&params)
            .await
            .with_context(|| format!("Failed to change status of task {}", params.id))?;
        self.renderer.render(UpdateResult::new(change));
        Ok(())
    }

    async fn set_status(&self, args: StatusArgs) -> Result<()> {
        self.change_status(args.into()).await
    }

    async fn recover(&self, args: IdArgs) -> Result<()> {
        let recovered = self
            .session
            .recover_from_trash(&args.into())
            .await
            .context("Failed to recover task")?;
        self.renderer.render(DeleteResult::new("Recovered", recovered));
        Ok(())
    }

    async fn delete(&self, args: DeleteArgs) -> Result<()> {
        if !args.confirm {
            bail!(
                "Deleting task {} cannot be undone. Re-run with --confirm",
                args.id
            );
        }
        let removed = self
            .session
            .permanently_delete(&Id::from(args.id.as_str()))
            .await
            .context("Failed to delete task")?;
        self.renderer.render(DeleteResult::new("Deleted", removed));
        Ok(())
    }

    async fn empty_trash(&self, args: ConfirmArgs) -> Result<()> {
        if !args.confirm {
            bail!("Emptying the trash cannot be undone. Re-run with --confirm");
        }
        let removed = self
            .session
            .empty_trash()
            .await
            .context("Failed to empty trash")?;
        self.renderer.render(DeleteResult::new("Deleted", removed));
        Ok(())
    }

    async fn edit(&self, args: EditArgs) -> Result<()> {
        let current = self
            .session
            .show_task(&Id::from(args.id.as_str()))
            .context("Failed to edit task")?;

        let mut changes = Vec::new();
        if let Some(name) = &args.name {
            changes.push(format!("Renamed to '{}'", name.trim()));
        }
        let due_date = if args.no_due {
            changes.push("Removed due date".to_string());
            None
        } else if let Some(due) = args.due {
            changes.push(format!("Due {due}"));
            Some(due)
        } else {
            current.due_date
        };
        let recurring = match args.repeat {
            Some(repeat) => {
                changes.push(match repeat.0 {
                    Some(recurrence) => format!("Repeats {recurrence}"),
                    None => "No longer repeats".to_string(),
                });
                repeat.0
            }
            None => current.recurring,
        };

        let params = UpdateDetails {
            id: current.id.to_string(),
            name: args.name.unwrap_or(current.name),
            due_date,
            recurring,
        };
        let task = self
            .session
            .update_details(&params)
            .await
            .context("Failed to edit task")?;
        self.renderer.render(UpdateResult::with_changes(task, changes));
        Ok(())
    }

    async fn move_task(&self, args: MoveArgs) -> Result<()> {
        let current = self
            .session
            .show_task(&Id::from(args.id.as_str()))
            .context("Failed to move task")?;
        let params = MoveQuadrant {
            id: current.id.to_string(),
            from: current.quadrant,
            to: args.to.into(),
        };

        let outcome = self
            .session
            .move_quadrant(&params)
            .await
            .context("Failed to move task")?;
        self.renderer.render(UpdateResult::with_changes(
            outcome.task,
            vec![format!("Moved from {} to {}", params.from, params.to)],
        ));

        if let Some(coaching) = outcome.coaching {
            // A failed coaching task has nothing to show.
            let insight = coaching.await.unwrap_or_default();
            if !insight.is_empty() {
                self.renderer.render(OperationStatus::notice(insight));
            }
        }
        Ok(())
    }

    async fn classify(&self) -> Result<()> {
        let report = self
            .session
            .classify_unclassified()
            .await
            .context("Failed to classify tasks")?;
        self.renderer.render(report);
        if !report.nothing_to_do() {
            self.show_board();
        }
        Ok(())
    }

    async fn reclassify(&self, args: IdArgs) -> Result<()> {
        let params: Id = args.into();
        let report = self
            .session
            .reclassify(&params)
            .await
            .context("Failed to reclassify task")?;
        self.renderer.render(report);
        let task = self.session.show_task(&params)?;
        self.renderer.render(task);
        Ok(())
    }

    async fn context(&self, args: ContextArgs) -> Result<()> {
        if !args.is_edit() {
            self.renderer.render(self.session.context());
            return Ok(());
        }
        let context = self
            .session
            .update_context(&args.into())
            .await
            .context("Failed to update context")?;
        self.renderer.render(OperationStatus::success("Context updated"));
        self.renderer.render(context);
        Ok(())
    }

    async fn settings(&self, args: SettingsArgs) -> Result<()> {
        if !args.is_edit() {
            self.renderer.render(self.session.settings());
            return Ok(());
        }
        let settings = self
            .session
            .update_settings(&args.into())
            .await
            .context("Failed to update settings")?;
        self.renderer.render(OperationStatus::success("Settings saved"));
        self.renderer.render(settings);
        Ok(())
    }

    async fn mood(&self, args: MoodArgs) -> Result<()> {
        let suggestion = self
            .session
            .mood_suggestion(args.mood.as_deref())
            .await
            .context("Failed to get a suggestion")?;
        self.renderer.render(OperationStatus::notice(suggestion));
        Ok(())
    }

    fn export(&self, args: ExportArgs) -> Result<()> {
        let json = self
            .session
            .export()
            .to_json()
            .context("Failed to serialize export")?;
        match args.file {
            Some(path) => {
                fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                self.renderer.render(OperationStatus::success(format!(
                    "Exported to {}",
                    path.display()
                )));
            }
            // Raw JSON so the output can be redirected into a file.
            None => println!("{json}"),
        }
        Ok(())
    }

    async fn import(&self, args: ImportArgs) -> Result<()> {
        let text = fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let bundle = self
            .session
            .import(&text)
            .await
            .context("Failed to import")?;
        self.renderer.render(OperationStatus::success(format!(
            "Imported {} task(s) from {}",
            bundle.tasks.len(),
            args.file.display()
        )));
        Ok(())
    }
}
