//! Subscriber bookkeeping shared by the store implementations.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use serde_json::Value;
use tokio::sync::mpsc;

use super::{DocumentFeed, DocumentKey};

/// Open feeds per document key.
#[derive(Default)]
pub struct Subscribers {
    feeds: Mutex<HashMap<DocumentKey, Vec<mpsc::UnboundedSender<Option<Value>>>>>,
}

impl Subscribers {
    /// Opens a feed for `key` that starts with `current`.
    pub fn register(&self, key: &DocumentKey, current: Option<Value>) -> DocumentFeed {
        let (sender, receiver) = mpsc::unbounded_channel();
        // The receiver is alive here, so the initial send cannot fail.
        let _ = sender.send(current);
        self.feeds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .push(sender);
        receiver
    }

    /// Delivers a new version of `key` to every open feed and forgets feeds
    /// whose receiver was dropped.
    pub fn publish(&self, key: &DocumentKey, body: &Value) {
        let mut feeds = self.feeds.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(senders) = feeds.get_mut(key) {
            senders.retain(|sender| sender.send(Some(body.clone())).is_ok());
            log::debug!("Published {key} to {} subscriber(s)", senders.len());
            if senders.is_empty() {
                feeds.remove(key);
            }
        }
    }

    /// Number of live feeds for `key`.
    pub fn count(&self, key: &DocumentKey) -> usize {
        let mut feeds = self.feeds.lock().unwrap_or_else(PoisonError::into_inner);
        match feeds.get_mut(key) {
            Some(senders) => {
                senders.retain(|sender| !sender.is_closed());
                senders.len()
            }
            None => 0,
        }
    }
}
