//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

/// Version written by the current schema.
const SCHEMA_VERSION: i64 = 1;

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // WAL lets readers keep going while a write is in flight
        self.connection
            .query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .db_context("Failed to enable WAL journal")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Records the schema version for fresh databases.
    fn apply_migrations(&self) -> Result<()> {
        if self.schema_version()? == 0 {
            self.connection
                .execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .db_context("Failed to record schema version")?;
        }

        Ok(())
    }

    /// Schema version stored in the database.
    pub fn schema_version(&self) -> Result<i64> {
        self.connection
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
                row.get(0)
            })
            .db_context("Failed to read schema version")
    }
}
