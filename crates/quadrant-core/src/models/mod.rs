//! Data models for tasks and per-user records.
//!
//! This module contains the core domain models of the quadrant task manager.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! ## Shape
//!
//! - [`Task`]: one entry on the matrix, optionally owned by a parent task
//! - [`TaskCollection`]: the flat ordered list of every task of a user
//! - [`Quadrant`] / [`TaskStatus`]: where a task is filed and its lifecycle
//! - [`Recurrence`]: repeat rule carried from a task to its successors
//! - [`StudentContext`] / [`AppSettings`]: single-record documents read by the
//!   classifier
//!
//! All models serialize in the camelCase document format shared by the
//! remote store and export files.
//!
//! # Examples
//!
//! ```rust
//! use quadrant_core::models::{Quadrant, Task, TaskStatus};
//!
//! let task = Task::new("Revise chapter 3", None);
//! assert_eq!(task.quadrant, Quadrant::Unclassified);
//! assert_eq!(task.status, TaskStatus::Active);
//! assert!(task.is_top_level());
//!
//! let sub = Task::subtask_of(&task, "Summarize section 3.1");
//! assert_eq!(sub.parent_id.as_ref(), Some(&task.id));
//! ```

pub mod collection;
pub mod dates;
pub mod profile;
pub mod recurring;
pub mod status;
pub mod task;


pub use collection::TaskCollection;
pub use profile::{AppSettings, DatedNote, StudentContext};
pub use recurring::{Recurrence, RecurrenceKind};
pub use status::{AssignedQuadrant, Quadrant, TaskStatus};
pub use task::{Task, TaskId};
