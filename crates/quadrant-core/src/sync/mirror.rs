//! Remote side of the local/remote pair: writes plus echo bookkeeping.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::Value;

use crate::{
    error::{QuadrantError, Result},
    store::{DocumentKey, DocumentStore, Slot},
};

/// Pending echoes kept per slot before the oldest are dropped.
const MAX_PENDING_ECHOES: usize = 64;

/// What the bridge should do with a delivered document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Replace local state with the delivered version
    Apply,
    /// Our own write, already superseded by a newer local write in flight
    SkipEcho,
}

/// Writes whole documents for one user and remembers which versions this
/// session wrote, so their change notifications can be told apart from
/// writes made elsewhere.
pub struct RemoteMirror {
    store: Arc<dyn DocumentStore>,
    user: String,
    pending: Mutex<HashMap<Slot, VecDeque<Value>>>,
}

impl RemoteMirror {
    pub fn new(store: Arc<dyn DocumentStore>, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(&self, slot: Slot) -> DocumentKey {
        DocumentKey::new(self.user.clone(), slot)
    }

    /// Records that `body` is about to be written to `slot`.
    ///
    /// Must be called before [`RemoteMirror::write`] so the echo is known
    /// before the store can deliver it.
    pub fn expect_echo(&self, slot: Slot, body: Value) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = pending.entry(slot).or_default();
        if queue.len() == MAX_PENDING_ECHOES {
            queue.pop_front();
        }
        queue.push_back(body);
    }

    /// Decides how to treat a delivered version of `slot`.
    ///
    /// A delivery matching one of our pending writes is skipped while a newer
    /// write of ours is still in flight, so local state never rewinds to a
    /// stale echo. The echo of our latest write is applied: it either matches
    /// local state already or repairs it after a foreign write landed in
    /// between.
    pub fn classify_delivery(&self, slot: Slot, delivered: Option<&Value>) -> Delivery {
        let Some(body) = delivered else {
            return Delivery::Apply;
        };
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queue) = pending.get_mut(&slot) else {
            return Delivery::Apply;
        };
        match queue.iter().position(|expected| expected == body) {
            Some(index) => {
                queue.remove(index);
                if queue.is_empty() {
                    Delivery::Apply
                } else {
                    Delivery::SkipEcho
                }
            }
            None => Delivery::Apply,
        }
    }

    /// Writes `body` to `slot`; on failure the pending echo is dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::Persistence` describing the failed slot.
    pub async fn write(&self, slot: Slot, body: Value) -> Result<()> {
        let key = self.key(slot);
        match self.store.write(&key, body.clone()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.forget_echo(slot, &body);
                log::warn!("Write of {key} failed, keeping local state: {e}");
                Err(match e {
                    QuadrantError::Persistence { .. } => e,
                    other => QuadrantError::Persistence {
                        slot: slot.to_string(),
                        message: other.to_string(),
                    },
                })
            }
        }
    }

    fn forget_echo(&self, slot: Slot, body: &Value) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(queue) = pending.get_mut(&slot) {
            if let Some(index) = queue.iter().rposition(|expected| expected == body) {
                queue.remove(index);
            }
        }
    }

    /// Number of writes whose echo has not been seen yet.
    pub fn pending_echoes(&self, slot: Slot) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&slot)
            .map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn mirror() -> (Arc<MemoryStore>, RemoteMirror) {
        let store = Arc::new(MemoryStore::new());
        let mirror = RemoteMirror::new(store.clone(), "u1");
        (store, mirror)
    }

    #[test]
    fn test_stale_echo_is_skipped_latest_is_applied() {
        let (_store, mirror) = mirror();
        mirror.expect_echo(Slot::Tasks, json!([1]));
        mirror.expect_echo(Slot::Tasks, json!([1, 2]));

        assert_eq!(
            mirror.classify_delivery(Slot::Tasks, Some(&json!([1]))),
            Delivery::SkipEcho
        );
        assert_eq!(
            mirror.classify_delivery(Slot::Tasks, Some(&json!([1, 2]))),
            Delivery::Apply
        );
        assert_eq!(mirror.pending_echoes(Slot::Tasks), 0);
    }

    #[test]
    fn test_foreign_versions_and_absence_are_applied() {
        let (_store, mirror) = mirror();
        mirror.expect_echo(Slot::Tasks, json!([1]));

        assert_eq!(
            mirror.classify_delivery(Slot::Tasks, Some(&json!(["foreign"]))),
            Delivery::Apply
        );
        assert_eq!(mirror.classify_delivery(Slot::Tasks, None), Delivery::Apply);
        assert_eq!(
            mirror.classify_delivery(Slot::Context, Some(&json!([1]))),
            Delivery::Apply
        );
        assert_eq!(mirror.pending_echoes(Slot::Tasks), 1);
    }

    #[test]
    fn test_pending_queue_is_bounded() {
        let (_store, mirror) = mirror();
        for i in 0..(MAX_PENDING_ECHOES + 10) {
            mirror.expect_echo(Slot::Settings, json!(i));
        }
        assert_eq!(mirror.pending_echoes(Slot::Settings), MAX_PENDING_ECHOES);
    }

    #[tokio::test]
    async fn test_failed_write_forgets_echo() {
        let (store, mirror) = mirror();
        store.fail_writes(true);
        mirror.expect_echo(Slot::Tasks, json!([1]));

        let error = mirror.write(Slot::Tasks, json!([1])).await.unwrap_err();
        assert!(matches!(error, QuadrantError::Persistence { ref slot, .. } if slot == "tasks"));
        assert_eq!(mirror.pending_echoes(Slot::Tasks), 0);
    }
}
