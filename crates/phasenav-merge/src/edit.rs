//! Read-modify-write helpers for merged navigation documents
//!
//! Each helper mutates an already merged document in place and reports
//! whether anything changed. Structural parts of the definition cannot be
//! deleted: the merge would restore them on the next load, so removing a
//! default item disables it instead and removing a default section is
//! refused.

use phasenav_model::{Item, NavigationDocument, Section};
use phasenav_structure::StructureDefinition;

/// Append a custom section
///
/// Returns `false` when a section with the same id already exists.
pub fn add_section(doc: &mut NavigationDocument, mut section: Section) -> bool {
    if doc.section(&section.id).is_some() {
        return false;
    }
    if section.order == 0 {
        section.order = next_order(doc.sections.iter().map(|s| s.order));
    }
    doc.sections.push(section);
    true
}

/// Remove a custom section
///
/// Sections of the definition are never removed.
pub fn remove_section(doc: &mut NavigationDocument, definition: &StructureDefinition, id: &str) -> bool {
    if definition.contains_section(id) {
        tracing::debug!(section = id, "refusing to remove a default section");
        return false;
    }
    let before = doc.sections.len();
    doc.sections.retain(|s| s.id != id);
    doc.sections.len() != before
}

/// Append an item to a section
///
/// Returns `false` when the section is missing or the id is taken. Items
/// without an order are placed last.
pub fn add_item(doc: &mut NavigationDocument, section_id: &str, mut item: Item) -> bool {
    let Some(section) = doc.section_mut(section_id) else {
        return false;
    };
    if section.find_item(&item.id).is_some() {
        return false;
    }
    if item.order == 0 {
        item.order = next_order(section.items.iter().map(|i| i.order));
    }
    section.items.push(item);
    true
}

/// Remove an item from a section
///
/// Default items are disabled rather than deleted; custom items are deleted.
pub fn remove_item(
    doc: &mut NavigationDocument,
    definition: &StructureDefinition,
    section_id: &str,
    item_id: &str,
) -> bool {
    let is_default_item = definition
        .section(section_id)
        .is_some_and(|s| s.find_item(item_id).is_some());
    if is_default_item {
        return set_item_enabled(doc, section_id, item_id, false);
    }

    let Some(section) = doc.section_mut(section_id) else {
        return false;
    };
    let before = section.items.len();
    section.items.retain(|i| i.id != item_id);
    section.items.len() != before
}

/// Toggle an item's visibility
pub fn set_item_enabled(doc: &mut NavigationDocument, section_id: &str, item_id: &str, enabled: bool) -> bool {
    let Some(item) = doc
        .section_mut(section_id)
        .and_then(|s| s.items.iter_mut().find(|i| i.id == item_id))
    else {
        return false;
    };
    if item.enabled == enabled {
        return false;
    }
    item.enabled = enabled;
    true
}

fn next_order(orders: impl Iterator<Item = u32>) -> u32 {
    orders.max().unwrap_or(0) + 1
}
