//! Process-local document store.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, PoisonError,
    },
};

use async_trait::async_trait;
use serde_json::Value;

use super::{fanout::Subscribers, DocumentFeed, DocumentKey, DocumentStore};
use crate::error::{QuadrantError, Result};

/// Keeps documents in memory.
///
/// Writes can be made to fail on demand with [`MemoryStore::fail_writes`],
/// which is how persistence-failure behavior is exercised.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DocumentKey, Value>>,
    subscribers: Subscribers,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current content of a document.
    pub fn get(&self, key: &DocumentKey) -> Option<Value> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of open subscriptions on `key`.
    pub fn subscriber_count(&self, key: &DocumentKey) -> usize {
        self.subscribers.count(key)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn write(&self, key: &DocumentKey, body: Value) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QuadrantError::Persistence {
                slot: key.slot.to_string(),
                message: "store is unavailable".to_string(),
            });
        }

        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), body.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.subscribers.publish(key, &body);
        Ok(())
    }

    async fn subscribe(&self, key: &DocumentKey) -> Result<DocumentFeed> {
        Ok(self.subscribers.register(key, self.get(key)))
    }
}
