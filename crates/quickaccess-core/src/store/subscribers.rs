//! Per-user snapshot subscriber bookkeeping shared by the in-process
//! stores.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use crate::models::PreferenceDocument;

use super::{SnapshotEvent, UserId};

/// Tracks the live snapshot channels per user and delivers writes to
/// all of them.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    inner: Mutex<HashMap<UserId, Vec<mpsc::Sender<SnapshotEvent>>>>,
}

impl SubscriberRegistry {
    pub(crate) fn register(&self, user: &UserId, tx: mpsc::Sender<SnapshotEvent>) {
        self.inner
            .lock()
            .unwrap()
            .entry(user.clone())
            .or_default()
            .push(tx);
    }

    /// Deliver a snapshot to every subscriber of `user`, dropping
    /// subscribers whose receiving side has gone away.
    pub(crate) async fn fan_out(&self, user: &UserId, snapshot: Option<PreferenceDocument>) {
        let senders: Vec<mpsc::Sender<SnapshotEvent>> = {
            let inner = self.inner.lock().unwrap();
            inner.get(user).cloned().unwrap_or_default()
        };
        if senders.is_empty() {
            return;
        }

        let sends = senders
            .iter()
            .map(|tx| tx.send(SnapshotEvent::Snapshot(snapshot.clone())));
        let results = futures::future::join_all(sends).await;

        if results.iter().any(|r| r.is_err()) {
            let mut inner = self.inner.lock().unwrap();
            if let Some(list) = inner.get_mut(user) {
                let before = list.len();
                list.retain(|tx| !tx.is_closed());
                debug!(
                    user = %user,
                    dropped = before - list.len(),
                    "Pruned closed snapshot subscribers"
                );
            }
        }
    }
}
