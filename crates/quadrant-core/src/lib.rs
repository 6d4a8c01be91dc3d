//! Core library for the Quadrant task manager.
//!
//! Tasks are sorted into the four quadrants of the Eisenhower matrix (do,
//! schedule, delegate, delete), either by an AI classifier or by hand. Each
//! user owns three documents (tasks, student context, settings) that live in
//! a [`store::DocumentStore`] and are mirrored locally so every edit is
//! visible immediately and written through in the background.
//!
//! # Layers
//!
//! - [`models`] and [`display`]: data types and their markdown rendering
//! - [`service`]: pure collection transforms committed through
//!   [`sync::LocalDocument`]
//! - [`classify`] and [`ai`]: AI requests behind the [`ai::AiBoundary`] trait
//! - [`store`] and [`sync`]: persistence, live subscriptions, echo handling
//! - [`session`]: one user's entry point tying the layers together
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quadrant_core::{
//!     display::Board,
//!     models::TaskStatus,
//!     params::{AddTask, ChangeStatus},
//!     store::MemoryStore,
//!     SessionBuilder,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionBuilder::new()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .build()
//!     .await?;
//!
//! let task = session
//!     .add_task(&AddTask {
//!         name: "Revise for the exam".to_string(),
//!         due_date: None,
//!     })
//!     .await?;
//! println!("{}", Board(&session.tasks()));
//!
//! session
//!     .change_status(&ChangeStatus {
//!         id: task.id.to_string(),
//!         status: TaskStatus::Completed,
//!     })
//!     .await?;
//! assert!(session.tasks().get(&task.id).is_some_and(|t| t.is_completed()));
//!
//! session.sign_out();
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod classify;
pub mod db;
pub mod descendants;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod recurrence;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;
pub mod transfer;

// Re-export commonly used types
pub use classify::BatchReport;
pub use display::{
    Board, CreateResult, DeleteResult, OperationStatus, StatusList, Suggestions, TaskTree,
    UpdateResult,
};
pub use error::{QuadrantError, Result};
pub use models::{
    AppSettings, DatedNote, Quadrant, Recurrence, RecurrenceKind, StudentContext, Task,
    TaskCollection, TaskId, TaskStatus,
};
pub use params::{
    AddSubtasks, AddTask, ChangeStatus, Id, MoveQuadrant, UpdateContext, UpdateDetails,
    UpdateSettings,
};
pub use session::{MoveOutcome, Session, SessionBuilder};
pub use transfer::ExportBundle;
