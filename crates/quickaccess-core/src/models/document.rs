use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind};

/// An explicitly pinned item. Stays until the user removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub item: Item,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(item: Item, added_at: DateTime<Utc>) -> Self {
        Self { item, added_at }
    }

    pub fn matches(&self, id: &str, kind: ItemKind) -> bool {
        self.item.matches(id, kind)
    }

    /// Human-readable age of the pin, e.g. "just now" or "3h ago".
    pub fn added_display(&self) -> String {
        age_display(self.added_at)
    }
}

/// An implicitly tracked access record. Bounded and recency-ordered;
/// the cache evicts the oldest entries past the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecentEntry {
    #[serde(flatten)]
    pub item: Item,
    #[serde(rename = "accessedAt")]
    pub accessed_at: DateTime<Utc>,
}

impl RecentEntry {
    pub fn new(item: Item, accessed_at: DateTime<Utc>) -> Self {
        Self { item, accessed_at }
    }

    pub fn matches(&self, id: &str, kind: ItemKind) -> bool {
        self.item.matches(id, kind)
    }

    /// Human-readable age of the last access.
    pub fn accessed_display(&self) -> String {
        age_display(self.accessed_at)
    }
}

/// The per-user remote document, as stored and as delivered by
/// subscription snapshots. Absence of the document is a valid state
/// and reads as two empty collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PreferenceDocument {
    #[serde(default)]
    pub favorites: Vec<FavoriteEntry>,
    #[serde(default)]
    pub recents: Vec<RecentEntry>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PreferenceDocument {
    /// Build a document from the two full collections, stamping the
    /// write time.
    pub fn new(favorites: Vec<FavoriteEntry>, recents: Vec<RecentEntry>) -> Self {
        Self {
            favorites,
            recents,
            updated_at: Utc::now(),
        }
    }
}

/// Format a timestamp as a coarse relative age for display.
fn age_display(since: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - since).num_minutes();
    if minutes < 1 {
        // Covers clock skew (negative ages) as well
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item() -> Item {
        Item::new(ItemKind::Audit, "a9", "Homepage Audit", "/audits/a9")
    }

    #[test]
    fn test_entry_wire_shape_is_flat() {
        let at = Utc::now();
        let entry = FavoriteEntry::new(item(), at);
        let value = serde_json::to_value(&entry).unwrap();

        // Item fields and the timestamp live side by side
        assert_eq!(value["type"], "audit");
        assert_eq!(value["id"], "a9");
        assert!(value.get("addedAt").is_some());
        assert!(value.get("item").is_none());
    }

    #[test]
    fn test_document_defaults_to_empty_collections() {
        let doc: PreferenceDocument =
            serde_json::from_str(r#"{"updatedAt":"2026-01-05T10:00:00Z"}"#).unwrap();
        assert!(doc.favorites.is_empty());
        assert!(doc.recents.is_empty());
    }

    #[test]
    fn test_document_round_trip() {
        let doc = PreferenceDocument::new(
            vec![FavoriteEntry::new(item(), Utc::now())],
            vec![RecentEntry::new(item(), Utc::now())],
        );
        let json = serde_json::to_string(&doc).unwrap();
        let back: PreferenceDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_age_display_buckets() {
        let entry = RecentEntry::new(item(), Utc::now());
        assert_eq!(entry.accessed_display(), "just now");

        let old = RecentEntry::new(item(), Utc::now() - Duration::minutes(5));
        assert_eq!(old.accessed_display(), "5m ago");

        let older = RecentEntry::new(item(), Utc::now() - Duration::hours(3));
        assert_eq!(older.accessed_display(), "3h ago");

        let oldest = RecentEntry::new(item(), Utc::now() - Duration::days(2));
        assert_eq!(oldest.accessed_display(), "2d ago");
    }
}
