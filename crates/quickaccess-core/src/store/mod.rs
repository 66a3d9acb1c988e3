//! Preference store implementations and the seam they plug into.
//!
//! A `PreferenceStore` holds one `PreferenceDocument` per user and
//! supports exactly two operations:
//!
//! - `merge_write`: replace both the `favorites` and `recents` arrays
//!   of a user's document in one write, stamping `updatedAt`
//! - `subscribe`: a live channel of whole-document snapshots, starting
//!   with the current state (`None` while the document does not exist)
//!
//! Two implementations ship here: `MemoryStore` (in-process, used by
//! tests and multi-client simulations) and `FileStore` (one JSON
//! document per user on disk). Remote backends implement the same
//! trait outside this crate.

pub mod error;
pub mod file;
pub mod memory;
pub(crate) mod subscribers;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::{FavoriteEntry, PreferenceDocument, RecentEntry};

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Buffer size for snapshot channels.
/// Snapshots supersede each other, so a small buffer is plenty; a
/// consumer that falls this far behind only needs the latest anyway.
pub(crate) const SNAPSHOT_CHANNEL_SIZE: usize = 16;

/// Identity of the user whose document is being read or written.
///
/// Opaque to this crate: whatever the host's auth layer calls a user
/// id goes in here verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Events delivered on a subscription channel.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// The user's full document as of now. `None` means the document
    /// does not exist yet, which reads as two empty collections.
    Snapshot(Option<PreferenceDocument>),
    /// The stream failed mid-flight. The subscriber keeps whatever it
    /// last saw; no further events arrive on this channel.
    Lost(String),
}

/// Storage backend holding one preference document per user.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Replace the `favorites` and `recents` arrays of the user's
    /// document in a single write. Creates the document if it does
    /// not exist. `updatedAt` is stamped by the store.
    async fn merge_write(
        &self,
        user: &UserId,
        favorites: &[FavoriteEntry],
        recents: &[RecentEntry],
    ) -> Result<(), StoreError>;

    /// Open a live snapshot channel for the user's document. The
    /// current state is delivered first, then one snapshot per
    /// subsequent write.
    async fn subscribe(&self, user: &UserId)
        -> Result<mpsc::Receiver<SnapshotEvent>, StoreError>;
}

// ============================================================================
// Tests
// ============================================================================
