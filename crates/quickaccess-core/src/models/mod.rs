//! Data models for quickaccess entries.
//!
//! This module contains the structures shared between the cache, the
//! preference stores, and UI consumers:
//!
//! - `ItemKind`, `Item`: what can be pinned or recently accessed
//! - `FavoriteEntry`, `RecentEntry`: items stamped with their
//!   favorited / last-accessed time
//! - `PreferenceDocument`: the per-user remote document shape

pub mod document;
pub mod item;

pub use document::{FavoriteEntry, PreferenceDocument, RecentEntry};
pub use item::{Item, ItemKind, UnknownItemKind};
