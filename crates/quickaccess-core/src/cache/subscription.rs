//! Listener side of a preference subscription.
//!
//! `PreferenceCache::attach` opens a snapshot channel on the store and
//! hands it to `spawn_listener`, which applies every delivered
//! snapshot to the shared mirror wholesale. Each attach carries an
//! epoch number; detach and re-attach bump the epoch under the state
//! lock, so a snapshot that was already in flight for a torn-down
//! subscription is discarded instead of repopulating the mirror with
//! the wrong user's data.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::SnapshotEvent;

use super::manager::{CacheEvent, Shared};
use super::state::CacheState;

pub(crate) fn spawn_listener(
    shared: Arc<Mutex<Shared>>,
    mut rx: mpsc::Receiver<SnapshotEvent>,
    epoch: u64,
    events_tx: mpsc::Sender<CacheEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SnapshotEvent::Snapshot(doc) => {
                    // Snapshots apply under the lock without awaiting,
                    // so an abort can never leave a half-applied mirror.
                    let mut shared = shared.lock().unwrap();
                    if shared.epoch != epoch {
                        debug!("Snapshot for a detached subscription, discarding");
                        return;
                    }
                    shared.state = CacheState::from_document(doc.as_ref());
                    shared.loading = false;
                    debug!(
                        favorites = shared.state.favorites.len(),
                        recents = shared.state.recents.len(),
                        "Remote snapshot applied"
                    );
                }
                SnapshotEvent::Lost(message) => {
                    // Keep the last-known mirror; just stop reporting
                    // loading and let the UI know sync is gone.
                    {
                        let mut shared = shared.lock().unwrap();
                        if shared.epoch != epoch {
                            return;
                        }
                        shared.loading = false;
                    }
                    warn!(error = %message, "Preference subscription lost");
                    if events_tx
                        .try_send(CacheEvent::SubscriptionLost { message })
                        .is_err()
                    {
                        debug!("Event channel full or closed, dropping notice");
                    }
                    return;
                }
            }
        }
    })
}
