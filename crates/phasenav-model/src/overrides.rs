//! Per-project, per-section overrides

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

/// One override record
///
/// Either a rename/reorder of an item or a tombstone (`removed: true`).
/// A tombstone never carries display fields; see [`OverrideEntry::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEntry {
    /// Item id this entry applies to
    pub id: String,
    /// Raw folder name in the external store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_point_name: Option<String>,
    /// User-facing name without ordering prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Position override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Entry created by a user with no base item
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_custom: bool,
    /// Tombstone marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub removed: bool,
}

impl OverrideEntry {
    /// Rename/reorder entry for a base item
    #[must_use]
    pub fn rename(
        id: impl Into<String>,
        share_point_name: impl Into<String>,
        display_name: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            share_point_name: Some(share_point_name.into()),
            display_name: Some(display_name.into()),
            order: Some(order),
            is_custom: false,
            removed: false,
        }
    }

    /// User-created folder entry
    #[must_use]
    pub fn custom(
        id: impl Into<String>,
        share_point_name: impl Into<String>,
        display_name: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            is_custom: true,
            ..Self::rename(id, share_point_name, display_name, order)
        }
    }

    /// Tombstone for a removed item
    #[must_use]
    pub fn tombstone(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            share_point_name: None,
            display_name: None,
            order: None,
            is_custom: false,
            removed: true,
        }
    }

    /// Bare entry returning a base item to its defaults
    ///
    /// Written when a user drops their override of a base item, so the
    /// document records the change instead of losing the entry.
    #[must_use]
    pub fn reset(id: impl Into<String>) -> Self {
        Self {
            removed: false,
            ..Self::tombstone(id)
        }
    }

    /// Whether this entry carries no override at all
    #[must_use]
    pub fn is_reset(&self) -> bool {
        !self.removed
            && !self.is_custom
            && self.share_point_name.is_none()
            && self.display_name.is_none()
            && self.order.is_none()
    }

    /// Whether this entry is a tombstone
    #[inline]
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.removed
    }

    /// Strip display fields from tombstones
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.removed {
            Self::tombstone(self.id)
        } else {
            self
        }
    }
}

/// Stored override document for one (company, project, section)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOverride {
    /// Override and tombstone entries
    #[serde(default)]
    pub items: Vec<OverrideEntry>,
}

impl SectionOverride {
    /// Create from entries, normalising them
    #[must_use]
    pub fn new(items: Vec<OverrideEntry>) -> Self {
        Self { items }.normalized()
    }

    /// Entry for an id
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&OverrideEntry> {
        self.items.iter().find(|e| e.id == id)
    }

    /// Whether an id is tombstoned
    #[must_use]
    pub fn is_tombstoned(&self, id: &str) -> bool {
        self.items.iter().any(|e| e.id == id && e.removed)
    }

    /// Ids of all tombstones
    #[must_use]
    pub fn tombstoned_ids(&self) -> HashSet<&str> {
        self.items
            .iter()
            .filter(|e| e.removed)
            .map(|e| e.id.as_str())
            .collect()
    }

    /// True when the document holds no entries at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Enforce the entry invariants
    ///
    /// Tombstones lose their display fields, and an id that appears more
    /// than once keeps a single entry: the tombstone if any occurrence is
    /// one, otherwise the last occurrence.
    #[must_use]
    pub fn normalized(self) -> Self {
        let tombstoned: HashSet<String> = self
            .items
            .iter()
            .filter(|e| e.removed)
            .map(|e| e.id.clone())
            .collect();

        let mut out: Vec<OverrideEntry> = Vec::with_capacity(self.items.len());
        for entry in self.items {
            let entry = if tombstoned.contains(&entry.id) {
                OverrideEntry::tombstone(entry.id)
            } else {
                entry
            };
            match out.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => out.push(entry),
            }
        }
        Self { items: out }
    }
}
