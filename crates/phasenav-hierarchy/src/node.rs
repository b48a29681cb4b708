//! Raw listing entries and classified hierarchy nodes

use crate::function::ProjectFunction;
use chrono::{DateTime, Utc};
use phasenav_model::Phase;
use serde::{Deserialize, Serialize};

/// Kind of entry reported by the file-storage service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawKind {
    Folder,
    File,
}

/// File metadata carried through verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileMeta {
    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.web_url.is_none() && self.size.is_none() && self.mime_type.is_none() && self.last_modified.is_none()
    }
}

/// Entry of a raw folder/file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RawKind,
    /// Full path in the store; derived from the parent when empty
    #[serde(default)]
    pub path: String,
    #[serde(flatten)]
    pub meta: FileMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Folder entry
    #[must_use]
    pub fn folder(name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            name: name.into(),
            kind: RawKind::Folder,
            path: String::new(),
            meta: FileMeta::default(),
            children,
        }
    }

    /// File entry
    #[must_use]
    pub fn file(name: impl Into<String>, meta: FileMeta) -> Self {
        Self {
            name: name.into(),
            kind: RawKind::File,
            path: String::new(),
            meta,
            children: Vec::new(),
        }
    }

    /// With an explicit path
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// Derived node kind; never stored by the external system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Site,
    Main,
    Sub,
    Project,
    ProjectFunction,
    Folder,
    File,
}

/// Classified, renderable node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    /// Nearest detected phase, or the configured default
    pub phase: Phase,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ProjectFunction>,
    #[serde(default, skip_serializing_if = "FileMeta::is_empty")]
    pub file: FileMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Depth-first iterator over this node and its descendants
    pub fn walk(&self) -> impl Iterator<Item = &HierarchyNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// All project nodes below this one
    #[must_use]
    pub fn projects(&self) -> Vec<&HierarchyNode> {
        self.walk().filter(|n| n.kind == NodeKind::Project).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_tree_from_listing_json() {
        let raw: RawNode = serde_json::from_value(json!({
            "name": "Offert.pdf",
            "type": "file",
            "path": "/sites/bygg/825-10 Projektnamn/Offert.pdf",
            "webUrl": "https://files.example.com/Offert.pdf",
            "size": 2048,
            "mimeType": "application/pdf",
            "lastModified": "2026-03-01T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(raw.kind, RawKind::File);
        assert_eq!(raw.meta.size, Some(2048));
        assert!(raw.children.is_empty());
    }

    #[test]
    fn folder_without_children_decodes() {
        let raw: RawNode = serde_json::from_value(json!({"name": "Ritningar", "type": "folder"})).unwrap();
        assert_eq!(raw, RawNode::folder("Ritningar", vec![]));
    }
}
