//! File-backed preference store.
//!
//! Keeps one pretty-printed JSON document per user under a data
//! directory, so preferences survive restarts of the hosting process.
//! Snapshot fan-out is process-local: writes made by this process
//! reach this process's subscribers; a write made by another process
//! is only seen on the next subscribe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{FavoriteEntry, PreferenceDocument, RecentEntry};

use super::subscribers::SubscriberRegistry;
use super::{PreferenceStore, SnapshotEvent, StoreError, UserId, SNAPSHOT_CHANNEL_SIZE};

pub struct FileStore {
    dir: PathBuf,
    subscribers: SubscriberRegistry,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            subscribers: SubscriberRegistry::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, user: &UserId) -> PathBuf {
        // User ids come from an external auth system; keep filenames
        // tame regardless of what they contain.
        let safe: String = user
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn load(&self, user: &UserId) -> Result<Option<PreferenceDocument>, StoreError> {
        let path = self.document_path(user);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let doc: PreferenceDocument = serde_json::from_str(&contents)?;
        Ok(Some(doc))
    }

    fn save(&self, user: &UserId, doc: &PreferenceDocument) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(doc)?;
        std::fs::write(self.document_path(user), contents)?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn merge_write(
        &self,
        user: &UserId,
        favorites: &[FavoriteEntry],
        recents: &[RecentEntry],
    ) -> Result<(), StoreError> {
        let doc = PreferenceDocument::new(favorites.to_vec(), recents.to_vec());
        self.save(user, &doc)?;

        debug!(
            user = %user,
            favorites = doc.favorites.len(),
            recents = doc.recents.len(),
            "Preference document saved"
        );

        self.subscribers.fan_out(user, Some(doc)).await;
        Ok(())
    }

    async fn subscribe(
        &self,
        user: &UserId,
    ) -> Result<mpsc::Receiver<SnapshotEvent>, StoreError> {
        let initial = self.load(user)?;

        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_SIZE);
        self.subscribers.register(user, tx.clone());
        tx.try_send(SnapshotEvent::Snapshot(initial))
            .map_err(|e| StoreError::Subscription(e.to_string()))?;

        Ok(rx)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemKind, RecentEntry};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!(
            "quickaccess-file-store-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        FileStore::new(dir).unwrap()
    }

    fn favorite(id: &str) -> FavoriteEntry {
        FavoriteEntry::new(
            Item::new(ItemKind::Tool, id, "Tool", format!("/tools/{id}")),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_document_survives_reopen() {
        let store = temp_store();
        let dir = store.dir().to_path_buf();
        let user = UserId::from("u1");

        let recent = RecentEntry::new(
            Item::new(ItemKind::Audit, "a1", "Audit", "/audits/a1"),
            Utc::now(),
        );
        store
            .merge_write(&user, &[favorite("t1")], std::slice::from_ref(&recent))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::new(&dir).unwrap();
        let mut rx = reopened.subscribe(&user).await.unwrap();
        match rx.recv().await {
            Some(SnapshotEvent::Snapshot(Some(doc))) => {
                assert_eq!(doc.favorites.len(), 1);
                assert_eq!(doc.recents.len(), 1);
                assert_eq!(doc.recents[0].item.id, "a1");
            }
            other => panic!("expected persisted snapshot, got {:?}", other),
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_write_reaches_live_subscriber() {
        let store = temp_store();
        let user = UserId::from("u1");

        let mut rx = store.subscribe(&user).await.unwrap();
        rx.recv().await; // initial (empty)

        store.merge_write(&user, &[favorite("t2")], &[]).await.unwrap();

        match rx.recv().await {
            Some(SnapshotEvent::Snapshot(Some(doc))) => {
                assert_eq!(doc.favorites[0].item.id, "t2");
            }
            other => panic!("expected snapshot, got {:?}", other),
        }

        std::fs::remove_dir_all(store.dir()).ok();
    }

    #[tokio::test]
    async fn test_corrupt_document_fails_subscribe() {
        let store = temp_store();
        let user = UserId::from("u1");

        std::fs::write(store.document_path(&user), "not json").unwrap();
        let err = store.subscribe(&user).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));

        std::fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_document_path_sanitizes_user_id() {
        let store = temp_store();
        let path = store.document_path(&UserId::from("a/b:c"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, "a_b_c.json");

        std::fs::remove_dir_all(store.dir()).ok();
    }
}
