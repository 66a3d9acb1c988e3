//! Synchronized favorites/recents cache.
//!
//! This module provides the cache core:
//!
//! - `CacheState` / `Operation`: the authoritative mirror and the
//!   pure transition function that advances it
//! - `PreferenceCache`: the public surface consumed by UI code -
//!   reads, mutations, session attach/detach, and the notice channel
//! - the subscription listener that applies remote snapshots
//!
//! Recents are bounded at `MAX_RECENT_ITEMS`; favorites are unbounded.

pub mod manager;
pub mod state;
pub(crate) mod subscription;

pub use manager::{CacheEvent, PreferenceCache};
pub use state::{CacheState, Operation, MAX_RECENT_ITEMS};
