//! Local authoritative copy of one synchronized document.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use super::mirror::{Delivery, RemoteMirror};
use crate::{
    error::{QuadrantError, Result},
    store::Slot,
};

/// Receives remote document versions from the sync bridge.
pub trait RemoteSink: Send + Sync {
    /// Replaces local state with a delivered version (`None` = absent).
    fn apply_remote(&self, delivered: Option<Value>);
}

/// The always-fresh local cache of a document, paired with its remote mirror.
///
/// Local commits are synchronous and visible immediately; the remote write
/// follows and may fail without rolling the local state back. Readers get
/// immutable `Arc` snapshots.
pub struct LocalDocument<T> {
    slot: Slot,
    state: watch::Sender<Arc<T>>,
    mirror: Arc<RemoteMirror>,
}

impl<T> LocalDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    pub fn new(slot: Slot, mirror: Arc<RemoteMirror>) -> Self {
        let (state, _) = watch::channel(Arc::new(T::default()));
        Self {
            slot,
            state,
            mirror,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified after every local commit or remote replace.
    pub fn watch(&self) -> watch::Receiver<Arc<T>> {
        self.state.subscribe()
    }

    /// Computes the next version from the current one, commits it locally and
    /// then writes it to the store.
    ///
    /// The transform runs under the state lock, so no reader or remote
    /// delivery observes a half-applied update.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::Persistence` when the write fails; the local
    /// commit stays in place.
    pub async fn commit<R, F>(&self, transform: F) -> Result<R>
    where
        F: FnOnce(&T) -> (T, R),
    {
        self.try_commit(|current| Ok(transform(current))).await
    }

    /// Like [`LocalDocument::commit`], but the transform may reject the
    /// update, in which case nothing is committed or written.
    ///
    /// # Errors
    ///
    /// Returns the transform's error unchanged, or
    /// `QuadrantError::Persistence` when the write fails.
    pub async fn try_commit<R, F>(&self, transform: F) -> Result<R>
    where
        F: FnOnce(&T) -> Result<(T, R)>,
    {
        let mut outcome = None;
        self.state.send_if_modified(|current| match transform(current) {
            Ok((next, result)) => {
                let body = serde_json::to_value(&next);
                if let Ok(value) = &body {
                    self.mirror.expect_echo(self.slot, value.clone());
                }
                *current = Arc::new(next);
                outcome = Some(Ok((body, result)));
                true
            }
            Err(e) => {
                outcome = Some(Err(e));
                false
            }
        });

        let Some(outcome) = outcome else {
            return Err(QuadrantError::Configuration {
                message: format!("local {} update did not run", self.slot),
            });
        };
        let (body, result) = outcome?;
        log::debug!("Committed local {}", self.slot);
        self.mirror.write(self.slot, body?).await?;
        Ok(result)
    }
}

impl<T> RemoteSink for LocalDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    fn apply_remote(&self, delivered: Option<Value>) {
        let slot = self.slot;
        let mirror = &self.mirror;
        self.state.send_if_modified(|current| {
            if mirror.classify_delivery(slot, delivered.as_ref()) == Delivery::SkipEcho {
                log::debug!("Skipped stale echo of {slot}");
                return false;
            }
            let next = match &delivered {
                None | Some(Value::Null) => T::default(),
                Some(body) => match serde_json::from_value::<T>(body.clone()) {
                    Ok(next) => next,
                    Err(e) => {
                        log::warn!("Ignoring unreadable remote {slot} document: {e}");
                        return false;
                    }
                },
            };
            log::debug!("Applied remote {slot}");
            *current = Arc::new(next);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        models::AppSettings,
        store::{DocumentKey, MemoryStore},
    };

    fn settings_document() -> (Arc<MemoryStore>, LocalDocument<AppSettings>) {
        let store = Arc::new(MemoryStore::new());
        let mirror = Arc::new(RemoteMirror::new(store.clone(), "u1"));
        (store, LocalDocument::new(Slot::Settings, mirror))
    }

    #[tokio::test]
    async fn test_commit_updates_local_and_remote() {
        let (store, document) = settings_document();

        let previous = document
            .commit(|current| {
                let next = AppSettings {
                    coaching_enabled: false,
                    ..current.clone()
                };
                (next, current.coaching_enabled)
            })
            .await
            .unwrap();

        assert!(previous);
        assert!(!document.snapshot().coaching_enabled);
        let stored = store.get(&DocumentKey::new("u1", Slot::Settings)).unwrap();
        assert_eq!(stored["coachingEnabled"], false);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_local_state() {
        let (store, document) = settings_document();
        store.fail_writes(true);

        let result = document
            .commit(|_| {
                (
                    AppSettings {
                        api_key: Some("k".to_string()),
                        ..AppSettings::default()
                    },
                    (),
                )
            })
            .await;

        assert!(result.is_err());
        assert_eq!(document.snapshot().credential(), Some("k"));
        assert!(store.get(&DocumentKey::new("u1", Slot::Settings)).is_none());
    }

    #[tokio::test]
    async fn test_rejected_try_commit_changes_nothing() {
        let (store, document) = settings_document();
        let watcher = document.watch();

        let result: Result<()> = document
            .try_commit(|_| Err(QuadrantError::invalid_input("apiKey").with_reason("blank")))
            .await;

        assert!(matches!(result, Err(QuadrantError::InvalidInput { .. })));
        assert!(!watcher.has_changed().unwrap());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_versions_replace_or_default() {
        let (store, document) = settings_document();
        let mut watcher = document.watch();

        document.apply_remote(Some(json!({"apiKey": "remote", "coachingEnabled": false})));
        assert!(watcher.has_changed().unwrap());
        watcher.borrow_and_update();
        assert_eq!(document.snapshot().credential(), Some("remote"));

        document.apply_remote(Some(json!({"coachingEnabled": "not a bool"})));
        assert!(!watcher.has_changed().unwrap());
        assert_eq!(document.snapshot().credential(), Some("remote"));

        document.apply_remote(None);
        assert_eq!(*document.snapshot(), AppSettings::default());
        assert_eq!(store.write_count(), 0);
    }
}
