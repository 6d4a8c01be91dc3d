//! The remote document store boundary.
//!
//! Each user owns three independently addressable documents ([`Slot`]). A
//! store supports whole-document overwrites and change subscriptions; a
//! subscription first yields the current content (or `None` when the document
//! does not exist) and then every later version, in write order.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`]: process-local, with write-failure injection for tests
//! - [`SqliteStore`]: durable, backed by the SQLite database in [`crate::db`]

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;

pub mod fanout;
pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// One of the per-user documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Array of every task
    Tasks,
    /// The [`crate::models::StudentContext`] record
    Context,
    /// The [`crate::models::AppSettings`] record
    Settings,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Tasks, Slot::Context, Slot::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Tasks => "tasks",
            Slot::Context => "context",
            Slot::Settings => "settings",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a document: (user id, slot).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub user: String,
    pub slot: Slot,
}

impl DocumentKey {
    pub fn new(user: impl Into<String>, slot: Slot) -> Self {
        Self {
            user: user.into(),
            slot,
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.slot)
    }
}

/// Stream of full document versions; `None` signals an absent document.
///
/// Dropping the feed ends the subscription.
pub type DocumentFeed = mpsc::UnboundedReceiver<Option<Value>>;

/// Whole-document key-value store with change notifications.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replaces the document at `key` with `body`.
    async fn write(&self, key: &DocumentKey, body: Value) -> Result<()>;

    /// Subscribes to `key`. The first item is the current content.
    async fn subscribe(&self, key: &DocumentKey) -> Result<DocumentFeed>;
}
