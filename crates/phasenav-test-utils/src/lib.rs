//! Testing utilities for the phasenav workspace
//!
//! Shared fixtures and failure-injecting adapters.

#![allow(missing_docs)]

use async_trait::async_trait;
use dashmap::DashSet;
use phasenav_hierarchy::RawNode;
use phasenav_model::{OverrideEntry, OverrideScope, ScopeKey, SectionOverride};
use phasenav_store::{
    DocumentStore, FileStorage, MemoryDocumentStore, MemoryFileStorage, RawEntry, StoreError, StoreResult,
    Subscription,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const COMPANY: &str = "acme";
pub const PROJECT: &str = "825-10";
pub const PROJECT_ROOT: &str = "01 - Kalkylskede/825-10 Projektnamn";

pub fn kalkyl_scope() -> OverrideScope {
    OverrideScope::new(COMPANY, PROJECT, "kalkyl").unwrap()
}

/// Phase folder, one project, one drawings folder
pub fn scenario_tree() -> Vec<RawNode> {
    vec![RawNode::folder(
        "01 - Kalkylskede",
        vec![RawNode::folder(
            "825-10 Projektnamn",
            vec![RawNode::folder("Ritningar", vec![])],
        )],
    )]
}

/// The same tree as a file storage
pub fn scenario_storage() -> MemoryFileStorage {
    MemoryFileStorage::new()
        .with(RawEntry::folder("01 - Kalkylskede/825-10 Projektnamn/Ritningar"))
        .with(RawEntry::folder("01 - Kalkylskede/825-10 Projektnamn/Mötesprotokoll"))
        .with(RawEntry::file("01 - Kalkylskede/825-10 Projektnamn/Ritningar/A-101.pdf").with_content(2048, "application/pdf"))
        .with(RawEntry::folder("02 - Produktion/226-01 Opus/KMA"))
}

/// Stored navigation holding a subset of the kalkylskede sections, with
/// legacy ids, stale names and extra fields
pub fn legacy_navigation_json() -> Value {
    json!({
        "phase": "kalkylskede",
        "schemaVersion": 1,
        "version": 7,
        "sections": [
            {
                "id": "kalkylering",
                "name": "3. Kalkyl (gammal)",
                "order": 9,
                "color": "teal",
                "items": [
                    {"id": "02-offerter", "name": "Offerter", "component": "Old", "order": 1, "enabled": false, "pinned": true}
                ]
            },
            {"id": "custom-risk", "name": "Riskanalys", "icon": "alert", "order": 10, "items": []}
        ]
    })
}

pub fn tombstoned_offers() -> SectionOverride {
    SectionOverride::new(vec![OverrideEntry::tombstone("02-offerter")])
}

/// Document store whose reads and writes can be made to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryDocumentStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_subscribe: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Acknowledged writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn read(&self, key: &ScopeKey) -> StoreResult<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::read(key, "injected read failure"));
        }
        self.inner.read(key).await
    }

    async fn write_merge(&self, key: &ScopeKey, partial: Value) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::write(key, "injected write failure"));
        }
        self.inner.write_merge(key, partial).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self, key: &ScopeKey) -> StoreResult<Subscription> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(StoreError::read(key, "injected subscribe failure"));
        }
        self.inner.subscribe(key).await
    }
}

/// File storage failing the listing of chosen folders
#[derive(Debug, Default)]
pub struct FlakyFileStorage {
    inner: MemoryFileStorage,
    failing: DashSet<String>,
}

impl FlakyFileStorage {
    pub fn new(inner: MemoryFileStorage) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failing: DashSet::new(),
        })
    }

    pub fn fail_listing(&self, path: &str) {
        self.failing.insert(path.trim_matches('/').to_string());
    }
}

#[async_trait]
impl FileStorage for FlakyFileStorage {
    async fn list_children(&self, path: &str) -> StoreResult<Vec<RawEntry>> {
        if self.failing.contains(path.trim_matches('/')) {
            return Err(StoreError::read(path, "injected listing failure"));
        }
        self.inner.list_children(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flaky_store_injects_failures() {
        let store = FlakyStore::new();
        let key = ScopeKey::from(kalkyl_scope());

        store.set_fail_writes(true);
        assert!(store.write_merge(&key, json!({"a": 1})).await.is_err());
        assert_eq!(store.write_count(), 0);

        store.set_fail_writes(false);
        store.write_merge(&key, json!({"a": 1})).await.unwrap();
        assert_eq!(store.write_count(), 1);

        store.set_fail_reads(true);
        assert!(store.read(&key).await.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn flaky_storage_fails_chosen_folder() {
        let storage = FlakyFileStorage::new(scenario_storage());
        storage.fail_listing("02 - Produktion");
        assert!(storage.list_children("").await.is_ok());
        assert!(storage.list_children("/02 - Produktion").await.is_err());
    }
}
