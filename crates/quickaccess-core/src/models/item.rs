use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of item that can be favorited or tracked as recently accessed.
///
/// This is a closed set: preference documents written by other clients
/// may only use these tags, and anything else is rejected when the
/// document is decoded rather than silently carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ItemKind {
    Project,
    Tool,
    Audit,
    Resource,
    Readability,
    Schema,
    Meta,
}

impl ItemKind {
    /// Every kind, in a stable order. Useful for pickers that build a
    /// section per kind.
    pub const ALL: [ItemKind; 7] = [
        ItemKind::Project,
        ItemKind::Tool,
        ItemKind::Audit,
        ItemKind::Resource,
        ItemKind::Readability,
        ItemKind::Schema,
        ItemKind::Meta,
    ];

    /// The lowercase tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Project => "project",
            ItemKind::Tool => "tool",
            ItemKind::Audit => "audit",
            ItemKind::Resource => "resource",
            ItemKind::Readability => "readability",
            ItemKind::Schema => "schema",
            ItemKind::Meta => "meta",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item kind: {0}")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownItemKind(s.to_string()))
    }
}

/// Caller-supplied descriptor of something that can be pinned or
/// recently accessed: a project, a tool page, a saved audit, etc.
///
/// `id` is unique within a kind, not globally; the `(id, kind)` pair
/// is the identity used for dedup everywhere in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub id: String,
    /// Display label.
    pub name: String,
    /// Navigation target, e.g. `/projects/p1`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Extra display-only fields supplied by the caller. Carried
    /// through the wire untouched; never consulted by the cache.
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    pub fn new(
        kind: ItemKind,
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            path: path.into(),
            icon: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set a display icon hint.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Attach an extra display-only field.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Whether this item carries the given identity.
    pub fn matches(&self, id: &str, kind: ItemKind) -> bool {
        self.id == id && self.kind == kind
    }
}

// ============================================================================
// Tests
// ============================================================================
