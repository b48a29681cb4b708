//! Project section overrides
//!
//! The second merge layer: a project's per-section override document is
//! applied on top of the (already merged) navigation items.
//!
//! # Resolution
//!
//! ```text
//! base items ──┬── tombstoned? ──> dropped
//!              └── override?   ──> display name / order / folder name applied
//! custom entries (no base item) ──> appended as pass-through folders
//! ```

use phasenav_model::text::strip_order_prefix;
use phasenav_model::{Item, OverrideEntry, SectionOverride};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Component marker for user-created pass-through folders
pub const PASS_THROUGH_COMPONENT: &str = "PassThroughFolder";

/// Where a section's folders live in the external store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathContext {
    /// Project root folder path
    pub project_root: String,
    /// Folder name of the section inside the project
    pub section_folder: String,
}

impl PathContext {
    /// Create context
    #[must_use]
    pub fn new(project_root: impl Into<String>, section_folder: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            section_folder: section_folder.into(),
        }
    }

    /// `{project_root}/{section_folder}/{folder}` with redundant slashes removed
    #[must_use]
    pub fn resolve(&self, folder: &str) -> String {
        [self.project_root.as_str(), self.section_folder.as_str(), folder]
            .iter()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Item as shown to the user after overrides
///
/// `resolved_path` is derived on every merge and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedItem {
    pub id: String,
    pub display_name: String,
    pub share_point_name: String,
    pub order: u32,
    pub component: String,
    pub enabled: bool,
    pub is_custom: bool,
    pub resolved_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
}

impl ResolvedItem {
    /// Override entry reproducing this item's current state
    #[must_use]
    pub fn to_entry(&self) -> OverrideEntry {
        OverrideEntry {
            id: self.id.clone(),
            share_point_name: Some(self.share_point_name.clone()),
            display_name: Some(self.display_name.clone()),
            order: Some(self.order),
            is_custom: self.is_custom,
            removed: false,
        }
    }
}

/// Apply an override document to base items
#[must_use]
pub fn merge_section_items(base: &[Item], overrides: &SectionOverride, ctx: &PathContext) -> Vec<ResolvedItem> {
    let base_ids: HashSet<&str> = base.iter().map(|i| i.id.as_str()).collect();

    let mut out: Vec<ResolvedItem> = base
        .iter()
        .filter(|item| !overrides.is_tombstoned(&item.id))
        .map(|item| {
            let entry = overrides.entry(&item.id);
            let share_point_name = entry
                .and_then(|e| e.share_point_name.clone())
                .unwrap_or_else(|| item.name.clone());
            let display_name = entry
                .and_then(|e| e.display_name.clone())
                .unwrap_or_else(|| strip_order_prefix(&item.name).to_string());
            ResolvedItem {
                id: item.id.clone(),
                resolved_path: ctx.resolve(&share_point_name),
                display_name,
                share_point_name,
                order: entry.and_then(|e| e.order).unwrap_or(item.order),
                component: item.component.clone(),
                enabled: item.enabled,
                is_custom: item.is_custom_item,
                items: item.items.clone(),
            }
        })
        .collect();

    let mut next = out.iter().map(|i| i.order).max().unwrap_or(0);
    for entry in overrides
        .items
        .iter()
        .filter(|e| e.is_custom && !e.removed && !base_ids.contains(e.id.as_str()))
    {
        let share_point_name = entry
            .share_point_name
            .clone()
            .or_else(|| entry.display_name.clone())
            .unwrap_or_else(|| entry.id.clone());
        let display_name = entry
            .display_name
            .clone()
            .unwrap_or_else(|| strip_order_prefix(&share_point_name).to_string());
        let order = entry.order.unwrap_or_else(|| {
            next += 1;
            next
        });
        out.push(ResolvedItem {
            id: entry.id.clone(),
            resolved_path: ctx.resolve(&share_point_name),
            display_name,
            share_point_name,
            order,
            component: PASS_THROUGH_COMPONENT.to_string(),
            enabled: true,
            is_custom: true,
            items: Vec::new(),
        });
    }

    out.sort_by_key(|i| i.order);
    out
}

/// Build the override document written by a save
///
/// - `items` is the complete new list of live entries
/// - tombstones from `previous` not re-listed in `items` are kept
/// - custom entries from `previous` missing from `items` become tombstones
/// - other entries from `previous` missing from `items` become bare resets,
///   so a save after a user edit is never an empty document
/// - every id in `removed_base_ids` becomes a tombstone, even if listed
#[must_use]
pub fn apply_save(previous: &SectionOverride, items: &[OverrideEntry], removed_base_ids: &[String]) -> SectionOverride {
    let removed: HashSet<&str> = removed_base_ids.iter().map(String::as_str).collect();
    let listed: HashSet<&str> = items.iter().map(|e| e.id.as_str()).collect();

    let mut out: Vec<OverrideEntry> = items
        .iter()
        .filter(|e| !removed.contains(e.id.as_str()))
        .cloned()
        .collect();

    for entry in &previous.items {
        let id = entry.id.as_str();
        if listed.contains(id) || removed.contains(id) {
            continue;
        }
        if entry.removed || entry.is_custom {
            out.push(OverrideEntry::tombstone(id));
        } else {
            out.push(OverrideEntry::reset(id));
        }
    }

    out.extend(removed_base_ids.iter().map(OverrideEntry::tombstone));
    SectionOverride::new(out)
}
