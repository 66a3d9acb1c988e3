//! In-process preference store.
//!
//! Holds documents in a `HashMap` and fans snapshots out to every
//! live subscriber of the written user. This is the store used by the
//! test suite, and it doubles as a faithful stand-in for a remote
//! backend when simulating several clients sharing one account.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{FavoriteEntry, PreferenceDocument, RecentEntry};

use super::subscribers::SubscriberRegistry;
use super::{PreferenceStore, SnapshotEvent, StoreError, UserId, SNAPSHOT_CHANNEL_SIZE};

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<UserId, PreferenceDocument>>,
    subscribers: SubscriberRegistry,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn merge_write(
        &self,
        user: &UserId,
        favorites: &[FavoriteEntry],
        recents: &[RecentEntry],
    ) -> Result<(), StoreError> {
        let snapshot = {
            let mut documents = self.documents.lock().unwrap();
            let doc = PreferenceDocument::new(favorites.to_vec(), recents.to_vec());
            documents.insert(user.clone(), doc.clone());
            doc
        };

        debug!(
            user = %user,
            favorites = snapshot.favorites.len(),
            recents = snapshot.recents.len(),
            "Preference document written"
        );

        self.subscribers.fan_out(user, Some(snapshot)).await;
        Ok(())
    }

    async fn subscribe(
        &self,
        user: &UserId,
    ) -> Result<mpsc::Receiver<SnapshotEvent>, StoreError> {
        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_SIZE);

        // Registration and the initial snapshot happen under the
        // document lock so a concurrent write cannot slip between
        // them unseen.
        let documents = self.documents.lock().unwrap();
        let initial = documents.get(user).cloned();
        self.subscribers.register(user, tx.clone());
        tx.try_send(SnapshotEvent::Snapshot(initial))
            .map_err(|e| StoreError::Subscription(e.to_string()))?;

        Ok(rx)
    }
}

// ============================================================================
// Tests
// ============================================================================
