//! Markdown rendering of models and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); views over
//! several tasks and the outcome of an operation are newtype wrappers so the
//! same data can be shown in more than one shape.
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐    ┌────────────────┐
//! │  Domain Models   │    │ Views & Results  │    │    Markdown    │
//! │ (Task, Context)  │───▶│ (Board, Create…) │───▶│ (termimad/CLI) │
//! └──────────────────┘    └──────────────────┘    └────────────────┘
//! ```
//!
//! - [`collections`]: the board, task subtrees, status lists, suggestions
//! - [`results`]: create, update and delete outcomes, classification reports
//! - [`status`]: one-line messages
//! - [`datetime`]: timestamps and due dates
//!
//! ```rust
//! use quadrant_core::{display::{CreateResult, OperationStatus}, models::Task};
//!
//! let task = Task::new("Email advisor", None);
//! assert!(CreateResult::new(task).to_string().contains("### Email advisor"));
//! assert_eq!(OperationStatus::success("Saved").to_string(), "**Done:** Saved\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Board, StatusList, Suggestions, TaskTree};
pub use datetime::{DueDate, LocalDateTime};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, Tone};
