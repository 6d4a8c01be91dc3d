//! Durable document store on top of SQLite.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::task;

use super::{fanout::Subscribers, DocumentFeed, DocumentKey, DocumentStore};
use crate::{
    db::Database,
    error::{QuadrantError, Result},
};

/// Stores documents in a SQLite file.
///
/// Every operation opens its own connection on the blocking pool. Change
/// notifications reach subscribers of this store instance only; a second
/// process writing the same file is picked up on the next subscription.
pub struct SqliteStore {
    db_path: PathBuf,
    subscribers: Subscribers,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::FileSystem` if the parent directory cannot be
    /// created, or `QuadrantError::Database` if schema setup fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| QuadrantError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), QuadrantError>(())
        })
        .await
        .map_err(join_error)??;

        Ok(Self {
            db_path,
            subscribers: Subscribers::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Reads a document directly, without subscribing.
    pub async fn read(&self, key: &DocumentKey) -> Result<Option<Value>> {
        let db_path = self.db_path.clone();
        let key = key.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_document(&key)
        })
        .await
        .map_err(join_error)?
    }
}

fn join_error(e: task::JoinError) -> QuadrantError {
    QuadrantError::Configuration {
        message: format!("Task join error: {e}"),
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn write(&self, key: &DocumentKey, body: Value) -> Result<()> {
        let db_path = self.db_path.clone();
        let owned_key = key.clone();
        let stored = body.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.put_document(&owned_key, &stored)
        })
        .await
        .map_err(join_error)?
        .map_err(|e| QuadrantError::Persistence {
            slot: key.slot.to_string(),
            message: e.to_string(),
        })?;

        self.subscribers.publish(key, &body);
        Ok(())
    }

    async fn subscribe(&self, key: &DocumentKey) -> Result<DocumentFeed> {
        let current = self.read(key).await?;
        Ok(self.subscribers.register(key, current))
    }
}
