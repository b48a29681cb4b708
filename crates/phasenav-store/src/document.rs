//! Document database adapter
//!
//! Documents are JSON values addressed by [`ScopeKey`]. Writes are partial
//! merges, never whole-document overwrites, so two writers touching
//! different fields both land; the later writer wins per field.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use phasenav_model::ScopeKey;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// One delivery of a live subscription
pub type SnapshotEvent = StoreResult<Option<Value>>;

/// Live feed of snapshots for one key
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    key: ScopeKey,
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
}

impl Subscription {
    /// Wrap a receiver fed by an adapter
    #[must_use]
    pub fn new(key: ScopeKey, rx: mpsc::UnboundedReceiver<SnapshotEvent>) -> Self {
        Self { key, rx }
    }

    /// Create a subscription together with its feeding sender
    #[must_use]
    pub fn channel(key: ScopeKey) -> (mpsc::UnboundedSender<SnapshotEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(key, rx))
    }

    /// Subscribed key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// Next snapshot or error; `None` once the adapter closed the feed
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.rx.recv().await
    }
}

/// Document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document; `Ok(None)` when it does not exist
    async fn read(&self, key: &ScopeKey) -> StoreResult<Option<Value>>;

    /// Deep-merge a partial object into the document, creating it if absent
    async fn write_merge(&self, key: &ScopeKey, partial: Value) -> StoreResult<()>;

    /// Subscribe to snapshots; the current state is delivered first
    async fn subscribe(&self, key: &ScopeKey) -> StoreResult<Subscription>;
}

/// Decode a raw document into a typed value
///
/// # Errors
/// Returns [`StoreError::Malformed`] when the document does not match `T`
pub fn decode<T: DeserializeOwned>(key: &ScopeKey, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::malformed(key, e))
}

/// Merge `partial` into `target`
///
/// Objects merge key by key, recursively. Every other value, arrays
/// included, replaces what was there.
pub fn deep_merge(target: &mut Value, partial: Value) {
    match (target, partial) {
        (Value::Object(target), Value::Object(partial)) => {
            for (key, value) in partial {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, partial) => *target = partial,
    }
}

/// In-process document store
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: DashMap<ScopeKey, Value>,
    subscribers: DashMap<ScopeKey, Vec<mpsc::UnboundedSender<SnapshotEvent>>>,
}

impl MemoryDocumentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a document outright, as a remote writer would
    pub fn put(&self, key: &ScopeKey, value: Value) {
        self.docs.insert(key.clone(), value.clone());
        self.publish(key, Some(value));
    }

    /// Delete a document
    pub fn delete(&self, key: &ScopeKey) {
        self.docs.remove(key);
        self.publish(key, None);
    }

    /// Number of stored documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Live subscriber count for a key
    #[must_use]
    pub fn subscriber_count(&self, key: &ScopeKey) -> usize {
        self.subscribers
            .get(key)
            .map_or(0, |subs| subs.iter().filter(|tx| !tx.is_closed()).count())
    }

    fn publish(&self, key: &ScopeKey, snapshot: Option<Value>) {
        if let Some(mut subs) = self.subscribers.get_mut(key) {
            subs.retain(|tx| tx.send(Ok(snapshot.clone())).is_ok());
            trace!(key = %key, subscribers = subs.len(), "snapshot published");
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, key: &ScopeKey) -> StoreResult<Option<Value>> {
        Ok(self.docs.get(key).map(|doc| doc.value().clone()))
    }

    async fn write_merge(&self, key: &ScopeKey, partial: Value) -> StoreResult<()> {
        if !partial.is_object() {
            return Err(StoreError::NotAnObject(key.storage_path()));
        }

        let snapshot = {
            let mut doc = self
                .docs
                .entry(key.clone())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            deep_merge(doc.value_mut(), partial);
            doc.value().clone()
        };

        debug!(key = %key, "document merged");
        self.publish(key, Some(snapshot));
        Ok(())
    }

    async fn subscribe(&self, key: &ScopeKey) -> StoreResult<Subscription> {
        let (tx, subscription) = Subscription::channel(key.clone());
        let current = self.docs.get(key).map(|doc| doc.value().clone());
        // Initial delivery cannot fail: the receiver is still in hand
        let _ = tx.send(Ok(current));
        self.subscribers.entry(key.clone()).or_default().push(tx);
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key() -> ScopeKey {
        ScopeKey::section_override("acme", "825-10", "kalkyl")
    }

    #[test]
    fn deep_merge_objects_and_replaces_arrays() {
        let mut doc = json!({
            "sections": [{"id": "a"}],
            "meta": {"a": 1, "b": {"c": 2}},
            "version": 1
        });
        deep_merge(
            &mut doc,
            json!({"sections": [{"id": "b"}], "meta": {"b": {"d": 3}}, "version": 2}),
        );
        assert_eq!(
            doc,
            json!({
                "sections": [{"id": "b"}],
                "meta": {"a": 1, "b": {"c": 2, "d": 3}},
                "version": 2
            })
        );
    }

    #[tokio::test]
    async fn read_missing_is_none() {
        let store = MemoryDocumentStore::new();
        assert_eq!(store.read(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_merge_creates_then_merges() {
        let store = MemoryDocumentStore::new();
        store.write_merge(&key(), json!({"items": [], "a": 1})).await.unwrap();
        store.write_merge(&key(), json!({"b": 2})).await.unwrap();

        assert_eq!(store.read(&key()).await.unwrap(), Some(json!({"items": [], "a": 1, "b": 2})));
    }

    #[tokio::test]
    async fn write_merge_rejects_non_objects() {
        let store = MemoryDocumentStore::new();
        let err = store.write_merge(&key(), json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn subscription_delivers_current_then_updates() {
        let store = MemoryDocumentStore::new();
        store.put(&key(), json!({"items": [{"id": "x"}]}));

        let mut sub = store.subscribe(&key()).await.unwrap();
        assert_eq!(sub.key(), &key());
        assert_eq!(sub.next().await.unwrap().unwrap(), Some(json!({"items": [{"id": "x"}]})));

        store.write_merge(&key(), json!({"items": []})).await.unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap(), Some(json!({"items": []})));

        store.delete(&key());
        assert_eq!(sub.next().await.unwrap().unwrap(), None);
    }

    #[tokio::test]
    async fn dropping_subscription_unsubscribes() {
        let store = MemoryDocumentStore::new();
        let sub = store.subscribe(&key()).await.unwrap();
        assert_eq!(store.subscriber_count(&key()), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(&key()), 0);
        store.write_merge(&key(), json!({"a": 1})).await.unwrap();
        assert!(store.subscribers.get(&key()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn scopes_do_not_leak() {
        let store = MemoryDocumentStore::new();
        let other = ScopeKey::section_override("acme", "825-11", "kalkyl");
        let mut sub = store.subscribe(&other).await.unwrap();
        let _ = sub.next().await;

        store.write_merge(&key(), json!({"a": 1})).await.unwrap();
        assert_eq!(store.read(&other).await.unwrap(), None);
        assert!(sub.rx.try_recv().is_err());
    }
}
