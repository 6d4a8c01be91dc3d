//! Document reads and whole-document writes.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use crate::{
    error::{DatabaseResultExt, QuadrantError, Result},
    store::DocumentKey,
};

const SELECT_DOCUMENT_SQL: &str = "SELECT body FROM documents WHERE user_id = ?1 AND slot = ?2";
const UPSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (user_id, slot, body, updated_at) VALUES (?1, ?2, ?3, ?4) \
     ON CONFLICT(user_id, slot) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at";

impl super::Database {
    /// Reads the document at `key`, if it exists.
    pub fn get_document(&self, key: &DocumentKey) -> Result<Option<Value>> {
        let body: Option<String> = self
            .connection
            .query_row(
                SELECT_DOCUMENT_SQL,
                params![key.user, key.slot.as_str()],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to read document")?;

        body.map(|text| serde_json::from_str(&text).map_err(QuadrantError::from))
            .transpose()
    }

    /// Overwrites the document at `key`.
    pub fn put_document(&mut self, key: &DocumentKey, body: &Value) -> Result<()> {
        let text = serde_json::to_string(body)?;
        self.connection
            .execute(
                UPSERT_DOCUMENT_SQL,
                params![key.user, key.slot.as_str(), text, Timestamp::now().to_string()],
            )
            .db_context("Failed to write document")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::super::Database;
    use crate::store::{DocumentKey, Slot};

    #[test]
    fn test_put_get_and_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut db = Database::new(temp_dir.path().join("docs.db")).unwrap();
        let key = DocumentKey::new("alice", Slot::Tasks);

        assert_eq!(db.get_document(&key).unwrap(), None);

        db.put_document(&key, &json!([{"id": "1"}])).unwrap();
        db.put_document(&key, &json!([{"id": "2"}])).unwrap();
        assert_eq!(db.get_document(&key).unwrap(), Some(json!([{"id": "2"}])));

        db.put_document(&DocumentKey::new("bob", Slot::Settings), &json!({}))
            .unwrap();
        assert_eq!(db.get_document(&DocumentKey::new("bob", Slot::Settings)).unwrap(), Some(json!({})));
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_reopen_keeps_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("docs.db");
        let key = DocumentKey::new("alice", Slot::Context);

        Database::new(&path)
            .unwrap()
            .put_document(&key, &json!({"goals": "graduate"}))
            .unwrap();

        let db = Database::new(&path).unwrap();
        assert_eq!(db.get_document(&key).unwrap(), Some(json!({"goals": "graduate"})));
        assert_eq!(db.schema_version().unwrap(), 1);
    }
}
