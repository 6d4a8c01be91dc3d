//! Two-way synchronization between local documents and the document store.
//!
//! Each synchronized slot is a [`LocalDocument`]: the local copy is the
//! source of truth for the UI and mutations, and every committed version is
//! written through its [`RemoteMirror`]. The [`SyncBridge`] subscribes to the
//! store and pushes versions written elsewhere back into the local copies.

pub mod document;
pub mod mirror;

use std::sync::Arc;

use tokio::task::JoinHandle;

pub use document::{LocalDocument, RemoteSink};
pub use mirror::{Delivery, RemoteMirror};

use crate::{
    error::Result,
    store::{DocumentKey, DocumentStore, Slot},
};

/// A running delivery loop for one slot. Aborted on cancel or drop.
pub struct Subscription {
    slot: Slot,
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops applying remote changes for this slot.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// All subscriptions opened for one signed-in user.
#[derive(Default)]
pub struct SyncHandles {
    subscriptions: Vec<Subscription>,
}

impl SyncHandles {
    /// Cancels the subscription of `slot`, if any.
    pub fn cancel(&mut self, slot: Slot) {
        self.subscriptions.retain(|subscription| {
            if subscription.slot == slot {
                subscription.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Cancels every subscription (sign-out).
    pub fn cancel_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn is_active(&self, slot: Slot) -> bool {
        self.subscriptions
            .iter()
            .any(|subscription| subscription.slot == slot && subscription.is_active())
    }
}

/// Connects local documents to store change feeds.
pub struct SyncBridge;

impl SyncBridge {
    /// Subscribes every sink to its slot for `user`.
    ///
    /// The first delivery of each feed (the current stored version) is
    /// applied before this returns, so the local documents are hydrated once
    /// `attach` completes. Later deliveries are applied by background tasks.
    ///
    /// # Errors
    ///
    /// Returns the store error if a subscription cannot be opened. Already
    /// opened subscriptions are dropped (and thereby cancelled).
    pub async fn attach(
        store: &Arc<dyn DocumentStore>,
        user: &str,
        sinks: Vec<(Slot, Arc<dyn RemoteSink>)>,
    ) -> Result<SyncHandles> {
        let mut handles = SyncHandles::default();

        for (slot, sink) in sinks {
            let key = DocumentKey::new(user, slot);
            let mut feed = store.subscribe(&key).await?;

            if let Some(current) = feed.recv().await {
                sink.apply_remote(current);
            }
            log::debug!("Hydrated {key}");

            let handle = tokio::spawn(async move {
                while let Some(delivered) = feed.recv().await {
                    sink.apply_remote(delivered);
                }
                log::debug!("Feed for {key} closed");
            });
            handles.subscriptions.push(Subscription { slot, handle });
        }

        Ok(handles)
    }
}
