//! File-storage listing adapter

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One child returned by a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl RawEntry {
    /// Folder entry at `path`; the name is the last path segment
    #[must_use]
    pub fn folder(path: &str) -> Self {
        Self::bare(path, EntryKind::Folder)
    }

    /// File entry at `path`
    #[must_use]
    pub fn file(path: &str) -> Self {
        Self::bare(path, EntryKind::File)
    }

    /// With size and mime type
    #[inline]
    #[must_use]
    pub fn with_content(mut self, size: u64, mime_type: impl Into<String>) -> Self {
        self.size = Some(size);
        self.mime_type = Some(mime_type.into());
        self
    }

    /// With a browsable URL
    #[inline]
    #[must_use]
    pub fn with_web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = Some(url.into());
        self
    }

    /// Whether the entry can be listed further
    #[inline]
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    fn bare(path: &str, kind: EntryKind) -> Self {
        let path = normalize_path(path);
        Self {
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            kind,
            path,
            web_url: None,
            size: None,
            mime_type: None,
            last_modified: None,
        }
    }
}

/// Folder listing service
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Children of a folder; `""` is the drive root
    async fn list_children(&self, path: &str) -> StoreResult<Vec<RawEntry>>;
}

/// In-process file storage
#[derive(Debug, Default)]
pub struct MemoryFileStorage {
    folders: DashMap<String, Vec<RawEntry>>,
}

impl MemoryFileStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under its parent folder, creating the parents
    pub fn insert(&self, entry: RawEntry) {
        let parent = parent_of(&entry.path);
        if entry.is_folder() {
            self.folders.entry(entry.path.clone()).or_default();
        }
        if !parent.is_empty() && !self.folders.contains_key(parent) {
            self.insert(RawEntry::folder(parent));
        }
        let mut siblings = self.folders.entry(parent.to_string()).or_default();
        if !siblings.iter().any(|e| e.path == entry.path) {
            siblings.push(entry);
        }
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(self, entry: RawEntry) -> Self {
        self.insert(entry);
        self
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn list_children(&self, path: &str) -> StoreResult<Vec<RawEntry>> {
        let path = normalize_path(path);
        match self.folders.get(&path) {
            Some(children) => Ok(children.clone()),
            None if path.is_empty() => Ok(Vec::new()),
            None => Err(StoreError::NotFound(path)),
        }
    }
}

fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[tokio::test]
    async fn lists_nested_folders() {
        let storage = MemoryFileStorage::new()
            .with(RawEntry::folder("01 - Kalkylskede/825-10 Projektnamn/Ritningar"))
            .with(RawEntry::file("01 - Kalkylskede/825-10 Projektnamn/Ritningar/A-101.pdf").with_content(1024, "application/pdf"));

        let root = storage.list_children("").await.unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].name, "01 - Kalkylskede");
        assert!(root[0].is_folder());

        let drawings = storage
            .list_children("/01 - Kalkylskede/825-10 Projektnamn/Ritningar/")
            .await
            .unwrap();
        assert_eq!(drawings[0].name, "A-101.pdf");
        assert_eq!(drawings[0].size, Some(1024));
    }

    #[tokio::test]
    async fn unknown_folder_is_not_found() {
        let storage = MemoryFileStorage::new();
        assert!(storage.list_children("").await.unwrap().is_empty());
        let err = storage.list_children("missing").await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[tokio::test]
    async fn duplicate_inserts_are_ignored() {
        let storage = MemoryFileStorage::new()
            .with(RawEntry::folder("a/b"))
            .with(RawEntry::folder("a/b"));
        assert_eq!(storage.list_children("a").await.unwrap().len(), 1);
    }
}
