//! Navigation documents, sections and items

use crate::phase::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

fn default_true() -> bool {
    true
}

/// Navigable unit inside a section
///
/// Items may nest one level of sub-items for grouped entries. Fields the
/// engine does not know about are kept in `extra` and survive every merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable identifier
    pub id: String,
    /// Display label, `"NN - Title"` for default items
    #[serde(default)]
    pub name: String,
    /// Opaque reference to the UI unit rendering this item
    #[serde(default)]
    pub component: String,
    /// 1-based position within the section
    #[serde(default)]
    pub order: u32,
    /// Whether the item is shown
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Item created by a user rather than the structure definition
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_custom_item: bool,
    /// Nested sub-items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Unknown stored fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Create an enabled item
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        component: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component: component.into(),
            order,
            enabled: true,
            is_custom_item: false,
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Create a user-defined item
    #[must_use]
    pub fn custom(id: impl Into<String>, name: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            is_custom_item: true,
            ..Self::new(id, name, component, 0)
        }
    }

    /// With nested sub-items
    #[inline]
    #[must_use]
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// With an extra stored field
    #[inline]
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Find a nested item by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Top-level navigation grouping within a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier, never renamed
    pub id: String,
    /// Versioned `"NN - Title"` label
    #[serde(default)]
    pub name: String,
    /// Icon name
    #[serde(default)]
    pub icon: String,
    /// Versioned 1-based position
    #[serde(default)]
    pub order: u32,
    /// Section members
    #[serde(default)]
    pub items: Vec<Item>,
    /// Unknown stored fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    /// Create an empty section
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            order,
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// With items
    #[inline]
    #[must_use]
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Find an item by id
    #[must_use]
    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Company-level navigation for one phase
///
/// Created lazily on the first save and always merged against the
/// structure definition on load; never trusted standalone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDocument {
    /// Phase this navigation belongs to
    #[serde(default)]
    pub phase: Phase,
    /// Sections in display order
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Structure version number the document was last merged against
    #[serde(default)]
    pub schema_version: u32,
    /// Monotonic edit counter, bumped on every save
    #[serde(default)]
    pub version: u64,
    /// True when built from defaults with no stored counterpart
    #[serde(skip)]
    pub is_default: bool,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last modifying actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl NavigationDocument {
    /// Empty document for a phase
    #[must_use]
    pub fn empty(phase: Phase) -> Self {
        Self {
            phase,
            sections: Vec::new(),
            schema_version: 0,
            version: 0,
            is_default: false,
            updated_at: None,
            updated_by: None,
        }
    }

    /// Find a section by id
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Find a section by id, mutably
    #[must_use]
    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Section ids in document order
    #[must_use]
    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_keeps_unknown_fields() {
        let raw = json!({
            "id": "02-offerter",
            "name": "02 - Offerter",
            "component": "OfferList",
            "order": 2,
            "pinned": true,
            "color": "teal"
        });

        let item: Item = serde_json::from_value(raw).unwrap();
        assert!(item.enabled);
        assert_eq!(item.extra.get("pinned"), Some(&json!(true)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["color"], "teal");
        assert!(back.get("isCustomItem").is_none());
    }

    #[test]
    fn sparse_stored_item_decodes() {
        let item: Item = serde_json::from_value(json!({"id": "x", "enabled": false})).unwrap();
        assert_eq!(item.name, "");
        assert!(!item.enabled);
        assert!(item.items.is_empty());
    }

    #[test]
    fn custom_item_flag_roundtrips() {
        let item = Item::custom("egen-mapp", "Egen mapp", "FolderView");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isCustomItem"], true);
    }

    #[test]
    fn section_lookup() {
        let mut doc = NavigationDocument::empty(Phase::Kalkylskede);
        doc.sections.push(
            Section::new("kalkyl", "03 - Kalkyl", "calculator", 3)
                .with_items(vec![Item::new("02-offerter", "02 - Offerter", "OfferList", 2)]),
        );

        assert!(doc.section("kalkyl").and_then(|s| s.find_item("02-offerter")).is_some());
        assert!(doc.section("anbud").is_none());
        assert_eq!(doc.section_ids(), vec!["kalkyl"]);
    }
}
