//! quickaccess-core - synchronized favorites and recents for the
//! quickaccess dashboard.
//!
//! The crate keeps a per-user, in-process mirror of two collections -
//! explicitly pinned favorites and a bounded list of recently
//! accessed items - and keeps that mirror consistent across rapid
//! local mutations, a live snapshot subscription that can overwrite
//! it at any time, and any number of UI surfaces reading it
//! concurrently.
//!
//! The moving parts:
//!
//! - [`models`]: `Item`/`ItemKind` descriptors and the per-user
//!   `PreferenceDocument` wire shape
//! - [`store`]: the `PreferenceStore` seam plus in-memory and
//!   file-backed implementations
//! - [`cache`]: `PreferenceCache`, the synchronized cache itself
//! - [`config`]: host configuration (store location, last account)
//!
//! ```no_run
//! use std::sync::Arc;
//! use quickaccess_core::{Item, ItemKind, MemoryStore, PreferenceCache, UserId};
//!
//! # async fn demo() {
//! let cache = PreferenceCache::new(Arc::new(MemoryStore::new()));
//! cache.attach(UserId::from("u1")).await;
//!
//! let audit = Item::new(ItemKind::Audit, "a1", "Homepage Audit", "/audits/a1");
//! cache.toggle_favorite(audit.clone()).await;
//! assert!(cache.is_favorite("a1", ItemKind::Audit));
//! cache.record_access(audit).await;
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod models;
pub mod store;

pub use cache::{CacheEvent, CacheState, Operation, PreferenceCache, MAX_RECENT_ITEMS};
pub use config::Config;
pub use models::{FavoriteEntry, Item, ItemKind, PreferenceDocument, RecentEntry, UnknownItemKind};
pub use store::{FileStore, MemoryStore, PreferenceStore, SnapshotEvent, StoreError, UserId};
