//! The authoritative local mirror and the operations that advance it.
//!
//! All mutation semantics live here as a pure transition function:
//! `CacheState::apply` takes the current state and one `Operation`
//! and returns the next state. The cache manager always applies
//! against the latest state under a single lock, so a burst of
//! mutations issued faster than any write round-trip still composes
//! correctly; no operation ever computes from a stale copy.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{FavoriteEntry, Item, ItemKind, PreferenceDocument, RecentEntry};

/// Upper bound on the recents collection.
/// Ten entries fill a quick-access widget without scrolling; older
/// accesses are not worth resurfacing.
pub const MAX_RECENT_ITEMS: usize = 10;

/// One mutation of the mirror. Timestamps ride in the operation so
/// that applying it is deterministic.
#[derive(Debug, Clone)]
pub enum Operation {
    AddFavorite { item: Item, at: DateTime<Utc> },
    RemoveFavorite { id: String, kind: ItemKind },
    /// Flip: removes the favorite if present, adds it otherwise,
    /// decided against the state the operation is applied to.
    ToggleFavorite { item: Item, at: DateTime<Utc> },
    /// Record that an item was accessed: dedup, move to front,
    /// refresh the timestamp, evict past the cap.
    RecordAccess { item: Item, at: DateTime<Utc> },
    ClearRecents,
}

/// In-process mirror of one user's favorites and recents.
///
/// Invariants, after `apply` and after `from_document`:
/// - no two favorites and no two recents share an `(id, kind)` pair
/// - `recents` holds at most `MAX_RECENT_ITEMS` entries
/// - `recents` is ordered most-recently-accessed first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheState {
    pub favorites: Vec<FavoriteEntry>,
    pub recents: Vec<RecentEntry>,
}

impl CacheState {
    /// Advance the state by one operation.
    pub fn apply(&self, op: &Operation) -> CacheState {
        match op {
            Operation::AddFavorite { item, at } => {
                if self.is_favorite(&item.id, item.kind) {
                    return self.clone();
                }
                let mut favorites = Vec::with_capacity(self.favorites.len() + 1);
                favorites.push(FavoriteEntry::new(item.clone(), *at));
                favorites.extend(self.favorites.iter().cloned());
                CacheState {
                    favorites,
                    recents: self.recents.clone(),
                }
            }

            Operation::RemoveFavorite { id, kind } => CacheState {
                favorites: self
                    .favorites
                    .iter()
                    .filter(|f| !f.matches(id, *kind))
                    .cloned()
                    .collect(),
                recents: self.recents.clone(),
            },

            Operation::ToggleFavorite { item, at } => {
                if self.is_favorite(&item.id, item.kind) {
                    self.apply(&Operation::RemoveFavorite {
                        id: item.id.clone(),
                        kind: item.kind,
                    })
                } else {
                    self.apply(&Operation::AddFavorite {
                        item: item.clone(),
                        at: *at,
                    })
                }
            }

            Operation::RecordAccess { item, at } => {
                let mut recents = Vec::with_capacity(self.recents.len() + 1);
                recents.push(RecentEntry::new(item.clone(), *at));
                recents.extend(
                    self.recents
                        .iter()
                        .filter(|r| !r.matches(&item.id, item.kind))
                        .cloned(),
                );
                recents.truncate(MAX_RECENT_ITEMS);
                CacheState {
                    favorites: self.favorites.clone(),
                    recents,
                }
            }

            Operation::ClearRecents => CacheState {
                favorites: self.favorites.clone(),
                recents: Vec::new(),
            },
        }
    }

    pub fn is_favorite(&self, id: &str, kind: ItemKind) -> bool {
        self.favorites.iter().any(|f| f.matches(id, kind))
    }

    pub fn favorites_by_kind(&self, kind: ItemKind) -> Vec<FavoriteEntry> {
        self.favorites
            .iter()
            .filter(|f| f.item.kind == kind)
            .cloned()
            .collect()
    }

    pub fn recents_by_kind(&self, kind: ItemKind) -> Vec<RecentEntry> {
        self.recents
            .iter()
            .filter(|r| r.item.kind == kind)
            .cloned()
            .collect()
    }

    /// Build a mirror from a remote snapshot, restoring the local
    /// invariants in case another writer diverged: recents are sorted
    /// newest first, duplicates collapse to their newest entry, and
    /// the recents cap is enforced.
    pub fn from_document(doc: Option<&PreferenceDocument>) -> CacheState {
        let Some(doc) = doc else {
            return CacheState::default();
        };

        let mut seen: HashSet<(String, ItemKind)> = HashSet::new();
        let favorites: Vec<FavoriteEntry> = doc
            .favorites
            .iter()
            .filter(|f| seen.insert((f.item.id.clone(), f.item.kind)))
            .cloned()
            .collect();

        let mut recents: Vec<RecentEntry> = doc.recents.clone();
        recents.sort_by(|a, b| b.accessed_at.cmp(&a.accessed_at));
        let mut seen: HashSet<(String, ItemKind)> = HashSet::new();
        recents.retain(|r| seen.insert((r.item.id.clone(), r.item.kind)));
        recents.truncate(MAX_RECENT_ITEMS);

        CacheState { favorites, recents }
    }
}

// ============================================================================
// Tests
// ============================================================================
