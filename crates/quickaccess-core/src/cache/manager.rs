//! The synchronized favorites/recents cache.
//!
//! `PreferenceCache` owns the in-process mirror of one user's
//! favorites and recents and is the only thing that mutates it.
//! Consumers read cloned views and mutate through the documented
//! operations; every mutation applies to the latest mirror under one
//! lock (so it is visible to reads immediately) and is then persisted
//! as one merge-write of both full arrays.
//!
//! Failure handling is deliberately optimistic: a failed write leaves
//! the local mutation in place and emits a `CacheEvent` for the UI to
//! surface; the next delivered snapshot reconciles any divergence.
//! When mutations overlap in flight, the order their writes reach the
//! store is not guaranteed to match issue order - the last write the
//! store applies wins, and the subscription repairs the mirror.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::{FavoriteEntry, Item, ItemKind, RecentEntry};
use crate::store::{PreferenceStore, UserId};

use super::state::{CacheState, Operation};
use super::subscription;

/// Buffer size for the UI event channel.
/// Notices are rare (write failures, a lost subscription); eight is
/// generous, and overflow just drops the oldest kind of news.
const EVENT_CHANNEL_SIZE: usize = 8;

/// Non-fatal notices for the hosting UI, typically rendered as a
/// toast. Nothing here requires action; the cache keeps working from
/// its local mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A merge-write failed. The local mutation was kept.
    WriteFailed { message: String },
    /// The live snapshot stream died. The mirror is stale but intact.
    SubscriptionLost { message: String },
}

/// Mirror state plus the bookkeeping that scopes it to one attach.
pub(crate) struct Shared {
    pub(crate) state: CacheState,
    pub(crate) loading: bool,
    /// Bumped on every attach/detach; listener tasks compare it
    /// before applying a snapshot.
    pub(crate) epoch: u64,
    pub(crate) user: Option<UserId>,
}

pub struct PreferenceCache {
    store: Arc<dyn PreferenceStore>,
    shared: Arc<Mutex<Shared>>,
    events_tx: mpsc::Sender<CacheEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<CacheEvent>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl PreferenceCache {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        Self {
            store,
            shared: Arc::new(Mutex::new(Shared {
                state: CacheState::default(),
                loading: false,
                epoch: 0,
                user: None,
            })),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            listener: Mutex::new(None),
        }
    }

    /// Take the receiving end of the notice channel. Yields `Some`
    /// exactly once; wire it to whatever the host uses for toasts.
    pub fn events(&self) -> Option<mpsc::Receiver<CacheEvent>> {
        self.events_rx.lock().unwrap().take()
    }

    // =========================================================================
    // Session scoping
    // =========================================================================

    /// Start mirroring `user`'s preferences. Any previous identity is
    /// torn down first so none of its entries stay visible, even
    /// transiently. The mirror reports `loading` until the first
    /// snapshot (or a subscription failure) arrives.
    pub async fn attach(&self, user: UserId) {
        self.detach();

        let epoch = {
            let mut shared = self.shared.lock().unwrap();
            shared.user = Some(user.clone());
            shared.loading = true;
            shared.epoch
        };

        match self.store.subscribe(&user).await {
            Ok(rx) => {
                info!(user = %user, "Preference subscription attached");
                let handle = subscription::spawn_listener(
                    Arc::clone(&self.shared),
                    rx,
                    epoch,
                    self.events_tx.clone(),
                );
                *self.listener.lock().unwrap() = Some(handle);
            }
            Err(e) => {
                warn!(error = %e, user = %user, "Failed to attach preference subscription");
                self.shared.lock().unwrap().loading = false;
                if self
                    .events_tx
                    .try_send(CacheEvent::SubscriptionLost {
                        message: e.to_string(),
                    })
                    .is_err()
                {
                    debug!("Event channel full or closed, dropping notice");
                }
            }
        }
    }

    /// Stop mirroring and clear the local mirror. Takes effect
    /// synchronously: once this returns, no snapshot from the old
    /// subscription can reach the mirror.
    pub fn detach(&self) {
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
        let mut shared = self.shared.lock().unwrap();
        shared.epoch += 1;
        shared.user = None;
        shared.state = CacheState::default();
        shared.loading = false;
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.shared.lock().unwrap().user.clone()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// True while attached and no snapshot has arrived yet.
    pub fn loading(&self) -> bool {
        self.shared.lock().unwrap().loading
    }

    /// All pinned items, most recently favorited first.
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.shared.lock().unwrap().state.favorites.clone()
    }

    /// Recently accessed items, most recent first.
    pub fn recents(&self) -> Vec<RecentEntry> {
        self.shared.lock().unwrap().state.recents.clone()
    }

    /// Whether `(id, kind)` is currently pinned. Reflects local
    /// mutations immediately, before any write round-trip completes.
    pub fn is_favorite(&self, id: &str, kind: ItemKind) -> bool {
        self.shared.lock().unwrap().state.is_favorite(id, kind)
    }

    pub fn favorites_by_kind(&self, kind: ItemKind) -> Vec<FavoriteEntry> {
        self.shared.lock().unwrap().state.favorites_by_kind(kind)
    }

    pub fn recents_by_kind(&self, kind: ItemKind) -> Vec<RecentEntry> {
        self.shared.lock().unwrap().state.recents_by_kind(kind)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Pin an item. No-op if it is already pinned.
    pub async fn add_to_favorites(&self, item: Item) {
        self.mutate(Operation::AddFavorite {
            item,
            at: Utc::now(),
        })
        .await;
    }

    /// Unpin by identity. No-op if absent.
    pub async fn remove_from_favorites(&self, id: &str, kind: ItemKind) {
        self.mutate(Operation::RemoveFavorite {
            id: id.to_string(),
            kind,
        })
        .await;
    }

    /// Flip the pinned state of an item, decided against the mirror
    /// at the moment the call runs - two toggles in a row always
    /// land back where they started.
    pub async fn toggle_favorite(&self, item: Item) {
        self.mutate(Operation::ToggleFavorite {
            item,
            at: Utc::now(),
        })
        .await;
    }

    /// Record an access: dedup, move to the front with a fresh
    /// timestamp, evict the oldest entries past the cap.
    pub async fn record_access(&self, item: Item) {
        self.mutate(Operation::RecordAccess {
            item,
            at: Utc::now(),
        })
        .await;
    }

    /// Empty the recents collection. Favorites are untouched.
    pub async fn clear_recents(&self) {
        self.mutate(Operation::ClearRecents).await;
    }

    /// Apply one operation to the latest mirror and persist the
    /// result. The local transition happens before the first await,
    /// which is what makes reads see it immediately.
    async fn mutate(&self, op: Operation) {
        let (user, favorites, recents) = {
            let mut shared = self.shared.lock().unwrap();
            let Some(user) = shared.user.clone() else {
                // Normal during logout transitions; nothing to report.
                debug!("Mutation with no attached user, ignoring");
                return;
            };
            shared.state = shared.state.apply(&op);
            (
                user,
                shared.state.favorites.clone(),
                shared.state.recents.clone(),
            )
        };

        if let Err(e) = self.store.merge_write(&user, &favorites, &recents).await {
            warn!(error = %e, user = %user, "Failed to persist preference mutation");
            if self
                .events_tx
                .try_send(CacheEvent::WriteFailed {
                    message: e.to_string(),
                })
                .is_err()
            {
                debug!("Event channel full or closed, dropping notice");
            }
        }
    }
}

impl Drop for PreferenceCache {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
