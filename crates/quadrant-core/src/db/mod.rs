//! SQLite layer behind [`crate::store::SqliteStore`].
//!
//! Each document is one JSON text row keyed by (user id, slot). Connections
//! are short-lived: the store opens one per read or write on the blocking
//! pool, so two CLI invocations may touch the same file at once.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod document_queries;
pub mod migrations;

/// How long a connection waits on another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// One open connection with the document schema in place.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens `path` and makes sure the document tables exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open document database")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
