//! Company navigation merge
//!
//! Reconciles a stored navigation document with the current structure
//! definition. Known sections and items always take their structural
//! fields (`name`, `order`, `component`, `icon`) from the definition;
//! user-owned fields (`enabled`, unknown extras) and everything custom are
//! kept from storage.

use crate::legacy::LegacyAliases;
use indexmap::IndexMap;
use phasenav_model::{Item, NavigationDocument, Section};
use phasenav_structure::StructureDefinition;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Merge engine for company-level navigation documents
#[derive(Debug, Clone, Default)]
pub struct NavigationMergeEngine {
    aliases: LegacyAliases,
}

impl NavigationMergeEngine {
    /// Engine with the built-in legacy aliases
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom alias table
    #[inline]
    #[must_use]
    pub fn with_aliases(aliases: LegacyAliases) -> Self {
        Self { aliases }
    }

    /// Alias table in use
    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &LegacyAliases {
        &self.aliases
    }

    /// Navigation for a stored document (or its absence)
    ///
    /// Without a stored document, or with one holding no sections, the
    /// default is returned with `is_default = true`.
    #[must_use]
    pub fn get_navigation(
        &self,
        stored: Option<&NavigationDocument>,
        definition: StructureDefinition,
    ) -> NavigationDocument {
        match stored {
            Some(doc) if !doc.sections.is_empty() => self.merge(&definition.navigation(), doc),
            Some(_) => {
                tracing::debug!(phase = %definition.phase(), "stored navigation has no sections, using defaults");
                definition.navigation()
            }
            None => definition.navigation(),
        }
    }

    /// Merge a stored document onto a defaults document
    ///
    /// `defaults` is normally a structure definition's output, but any
    /// previously merged document works too, which is what makes the merge
    /// idempotent.
    #[must_use]
    pub fn merge(&self, defaults: &NavigationDocument, stored: &NavigationDocument) -> NavigationDocument {
        let normalized = self.normalize_sections(stored.sections.clone());
        let known: HashSet<&str> = defaults.sections.iter().map(|s| s.id.as_str()).collect();

        let mut sections: Vec<Section> = defaults
            .sections
            .iter()
            .map(|default| match normalized.get(&default.id) {
                Some(stored_section) => merge_known_section(default, stored_section),
                None => default.clone(),
            })
            .collect();

        let custom = normalized
            .into_values()
            .filter(|s| !known.contains(s.id.as_str()));
        sections.extend(custom);

        NavigationDocument {
            phase: defaults.phase,
            sections,
            schema_version: defaults.schema_version,
            version: stored.version,
            is_default: false,
            updated_at: stored.updated_at,
            updated_by: stored.updated_by.clone(),
        }
    }

    /// Migrate legacy ids, then fold duplicate sections together
    fn normalize_sections(&self, sections: Vec<Section>) -> IndexMap<String, Section> {
        let mut out: IndexMap<String, Section> = IndexMap::with_capacity(sections.len());
        for mut section in sections {
            if let Some(canonical) = self.aliases.canonical_id(&section.id, &section.name) {
                if section.id != canonical {
                    tracing::debug!(from = %section.id, to = canonical, "migrating legacy section id");
                    section.id = canonical.to_string();
                }
            }
            section.items = union_items(Vec::new(), section.items);

            match out.get_mut(&section.id) {
                Some(existing) => union_section(existing, section),
                None => {
                    out.insert(section.id.clone(), section);
                }
            }
        }
        out
    }
}

fn merge_known_section(default: &Section, stored: &Section) -> Section {
    Section {
        id: default.id.clone(),
        name: default.name.clone(),
        icon: default.icon.clone(),
        order: default.order,
        items: merge_items(&default.items, &stored.items),
        extra: overlay(&default.extra, &stored.extra),
    }
}

/// Merge stored items onto default items
///
/// Default items keep their structural fields and take `enabled` plus
/// extras from storage; stored ids unknown to the defaults follow in
/// stored order, otherwise verbatim but flagged as custom.
pub(crate) fn merge_items(defaults: &[Item], stored: &[Item]) -> Vec<Item> {
    let default_ids: HashSet<&str> = defaults.iter().map(|i| i.id.as_str()).collect();

    let mut out: Vec<Item> = defaults
        .iter()
        .map(|default| match stored.iter().find(|s| s.id == default.id) {
            Some(stored_item) => Item {
                id: default.id.clone(),
                name: default.name.clone(),
                component: default.component.clone(),
                order: default.order,
                enabled: stored_item.enabled,
                is_custom_item: default.is_custom_item,
                items: merge_items(&default.items, &stored_item.items),
                extra: overlay(&default.extra, &stored_item.extra),
            },
            None => default.clone(),
        })
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    for item in stored {
        if !default_ids.contains(item.id.as_str()) && seen.insert(item.id.as_str()) {
            out.push(Item {
                is_custom_item: true,
                ..item.clone()
            });
        }
    }
    out
}

fn overlay(base: &Map<String, Value>, top: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (k, v) in top {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// Union two sections sharing an id; the first occurrence's scalars win
fn union_section(into: &mut Section, other: Section) {
    if into.name.is_empty() {
        into.name = other.name;
    }
    if into.icon.is_empty() {
        into.icon = other.icon;
    }
    if into.order == 0 {
        into.order = other.order;
    }
    fill_missing(&mut into.extra, other.extra);
    let items = std::mem::take(&mut into.items);
    into.items = union_items(items, other.items);
}

/// Union item lists by id, recursing into nested items
///
/// Also deduplicates `other` itself at every nesting level.
fn union_items(into: Vec<Item>, other: Vec<Item>) -> Vec<Item> {
    let mut by_id: IndexMap<String, Item> = into.into_iter().map(|i| (i.id.clone(), i)).collect();
    for item in other {
        match by_id.get_mut(&item.id) {
            Some(existing) => {
                fill_missing(&mut existing.extra, item.extra);
                let nested = std::mem::take(&mut existing.items);
                existing.items = union_items(nested, item.items);
            }
            None => {
                let mut item = item;
                item.items = union_items(Vec::new(), item.items);
                by_id.insert(item.id.clone(), item);
            }
        }
    }
    by_id.into_values().collect()
}

fn fill_missing(into: &mut Map<String, Value>, other: Map<String, Value>) {
    for (k, v) in other {
        into.entry(k).or_insert(v);
    }
}
