//! Merged section items handle
//!
//! Holds one section's override document for one project and publishes
//! the merged item list through a `watch` channel.
//!
//! # Read path
//!
//! ```text
//! memory cache ─> session cache ─> store read ─> live subscription
//!      (first hit is shown, later sources supersede it)
//! ```
//!
//! A snapshot with no entries does not replace non-empty local state
//! under [`EmptySnapshotPolicy::IgnoreWhenCached`].

use crate::config::EmptySnapshotPolicy;
use crate::error::{CoreError, CoreResult};
use parking_lot::Mutex;
use phasenav_merge::{apply_save, merge_section_items, PathContext, ResolvedItem};
use phasenav_model::{Item, NavigationDocument, OverrideEntry, OverrideScope, ScopeKey, SectionOverride};
use phasenav_store::{decode, DocumentStore, OverrideCache};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Published state of a [`SectionItems`] handle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionItemsState {
    pub items: Vec<ResolvedItem>,
    pub is_loading: bool,
}

/// Live merged items of one (company, project, section)
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SectionItems {
    inner: Arc<Inner>,
}

struct Inner {
    scope: OverrideScope,
    key: ScopeKey,
    base: Vec<Item>,
    ctx: PathContext,
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn OverrideCache>,
    policy: EmptySnapshotPolicy,
    current: Mutex<SectionOverride>,
    state: watch::Sender<SectionItemsState>,
}

impl std::fmt::Debug for SectionItems {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionItems")
            .field("scope", &self.inner.scope)
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl SectionItems {
    /// Create handle over explicit base items
    ///
    /// Starts in the loading state showing the base items unmodified.
    #[must_use]
    pub fn new(
        scope: OverrideScope,
        base: Vec<Item>,
        ctx: PathContext,
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn OverrideCache>,
        policy: EmptySnapshotPolicy,
    ) -> Self {
        let initial = SectionItemsState {
            items: merge_section_items(&base, &SectionOverride::default(), &ctx),
            is_loading: true,
        };
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                key: ScopeKey::from(scope.clone()),
                scope,
                base,
                ctx,
                store,
                cache,
                policy,
                current: Mutex::new(SectionOverride::default()),
                state,
            }),
        }
    }

    /// Create handle for a section of a merged navigation
    ///
    /// Disabled items are left out of the base list. The section folder is
    /// the section's versioned name.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownSection`] when the navigation has no
    /// section with the scope's id
    pub fn for_section(
        scope: OverrideScope,
        navigation: &NavigationDocument,
        project_root: &str,
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn OverrideCache>,
        policy: EmptySnapshotPolicy,
    ) -> CoreResult<Self> {
        let section = navigation
            .section(&scope.section)
            .ok_or_else(|| CoreError::unknown_section(scope.section.as_str(), navigation.phase))?;
        let base = section.items.iter().filter(|i| i.enabled).cloned().collect();
        let ctx = PathContext::new(project_root, section.name.as_str());
        Ok(Self::new(scope, base, ctx, store, cache, policy))
    }

    #[inline]
    #[must_use]
    pub fn scope(&self) -> &OverrideScope {
        &self.inner.scope
    }

    /// Current published state
    #[must_use]
    pub fn state(&self) -> SectionItemsState {
        self.inner.state.borrow().clone()
    }

    /// Current merged items
    #[must_use]
    pub fn items(&self) -> Vec<ResolvedItem> {
        self.inner.state.borrow().items.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    /// Current override document
    #[must_use]
    pub fn overrides(&self) -> SectionOverride {
        self.inner.current.lock().clone()
    }

    /// Receiver notified on every state change
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<SectionItemsState> {
        self.inner.state.subscribe()
    }

    /// Show the cached override, then read the store
    ///
    /// Returns whether the store read succeeded.
    pub async fn load(&self) -> bool {
        if let Some(cached) = self.inner.cache.get(&self.inner.scope).await {
            debug!(scope = %self.inner.scope.cache_key(), "showing cached overrides");
            *self.inner.current.lock() = cached;
            self.publish(true);
        }
        self.refresh().await
    }

    /// Read the store and apply the result as a snapshot
    ///
    /// A failed read keeps local state and clears the loading flag.
    pub async fn refresh(&self) -> bool {
        self.inner.state.send_modify(|s| s.is_loading = true);
        match self.inner.store.read(&self.inner.key).await {
            Ok(raw) => {
                self.apply_raw(raw).await;
                true
            }
            Err(e) => {
                warn!(key = %self.inner.key, error = %e, "override read failed, keeping local state");
                self.set_loading(false);
                false
            }
        }
    }

    /// Apply an incoming override document
    ///
    /// Returns `false` when the snapshot was ignored by the empty-snapshot
    /// policy.
    pub async fn apply_snapshot(&self, snapshot: SectionOverride) -> bool {
        let snapshot = snapshot.normalized();
        let ignore = {
            let current = self.inner.current.lock();
            self.inner.policy == EmptySnapshotPolicy::IgnoreWhenCached && snapshot.is_empty() && !current.is_empty()
        };
        if ignore {
            warn!(scope = %self.inner.scope.cache_key(), "ignoring empty snapshot over non-empty overrides");
            self.set_loading(false);
            return false;
        }

        *self.inner.current.lock() = snapshot.clone();
        self.inner.cache.set(&self.inner.scope, snapshot).await;
        self.publish(false);
        true
    }

    /// Save a new item list
    ///
    /// `items` is the complete list of live entries; `removed_base_ids` are
    /// base items the user deleted. The result is applied to local state
    /// and both cache tiers before the write. Returns `false` when the write
    /// fails; local state is kept either way.
    pub async fn save_items(&self, items: &[OverrideEntry], removed_base_ids: &[String]) -> bool {
        let next = apply_save(&self.inner.current.lock(), items, removed_base_ids);
        *self.inner.current.lock() = next.clone();
        self.publish(false);
        self.inner.cache.set(&self.inner.scope, next.clone()).await;

        let partial = match serde_json::to_value(&next) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.inner.key, error = %e, "override not serializable");
                return false;
            }
        };
        match self.inner.store.write_merge(&self.inner.key, partial).await {
            Ok(()) => {
                info!(key = %self.inner.key, entries = next.items.len(), "section overrides saved");
                true
            }
            Err(e) => {
                warn!(key = %self.inner.key, error = %e, "section override write failed");
                false
            }
        }
    }

    /// Save the resolved items as they are shown
    pub async fn save_resolved(&self, items: &[ResolvedItem], removed_base_ids: &[String]) -> bool {
        let entries: Vec<OverrideEntry> = items.iter().map(ResolvedItem::to_entry).collect();
        self.save_items(&entries, removed_base_ids).await
    }

    /// Follow the store's live subscription
    ///
    /// Each snapshot is applied as by [`apply_snapshot`](Self::apply_snapshot).
    /// Dropping the returned guard unsubscribes.
    ///
    /// # Errors
    /// Returns the adapter error when the subscription cannot be opened
    pub async fn watch(&self) -> CoreResult<WatchGuard> {
        let mut subscription = self.inner.store.subscribe(&self.inner.key).await?;
        let handle = self.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.next().await {
                match event {
                    Ok(raw) => handle.apply_raw(raw).await,
                    Err(e) => warn!(key = %subscription.key(), error = %e, "override snapshot failed"),
                }
            }
            debug!(key = %subscription.key(), "override subscription closed");
        });
        Ok(WatchGuard { task })
    }

    async fn apply_raw(&self, raw: Option<Value>) {
        let snapshot = match raw {
            None => SectionOverride::default(),
            Some(value) => match decode::<SectionOverride>(&self.inner.key, value) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(error = %e, "undecodable override snapshot, keeping local state");
                    self.set_loading(false);
                    return;
                }
            },
        };
        self.apply_snapshot(snapshot).await;
    }

    fn publish(&self, is_loading: bool) {
        let items = merge_section_items(&self.inner.base, &self.inner.current.lock(), &self.inner.ctx);
        self.inner.state.send_replace(SectionItemsState { items, is_loading });
    }

    fn set_loading(&self, is_loading: bool) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.is_loading != is_loading;
            s.is_loading = is_loading;
            changed
        });
    }
}

/// Keeps a [`SectionItems::watch`] subscription alive
#[derive(Debug)]
pub struct WatchGuard {
    task: JoinHandle<()>,
}

impl WatchGuard {
    /// Whether the subscription task has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasenav_model::{Phase, StructureVersion};
    use phasenav_store::{MemoryDocumentStore, TwoTierCache};
    use phasenav_structure::StructureDefinition;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryDocumentStore>,
        cache: Arc<TwoTierCache>,
        items: SectionItems,
    }

    fn fixture(policy: EmptySnapshotPolicy) -> Fixture {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(TwoTierCache::in_memory(16));
        let nav = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V1).navigation();
        let scope = OverrideScope::new("acme", "825-10", "kalkyl").unwrap();
        let items = SectionItems::for_section(scope, &nav, "825-10 Projektnamn", store.clone(), cache.clone(), policy)
            .unwrap();
        Fixture { store, cache, items }
    }

    fn ids(items: &SectionItems) -> Vec<String> {
        items.items().into_iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn starts_loading_with_base_items() {
        let f = fixture(EmptySnapshotPolicy::default());
        assert!(f.items.is_loading());
        assert_eq!(ids(&f.items), ["01-kalkylunderlag", "02-offerter", "03-kalkylanteckningar"]);
    }

    #[tokio::test]
    async fn unknown_section_is_an_error() {
        let nav = StructureDefinition::new(Phase::Produktion, StructureVersion::V1).navigation();
        let scope = OverrideScope::new("acme", "825-10", "kalkyl").unwrap();
        let err = SectionItems::for_section(
            scope,
            &nav,
            "p",
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(TwoTierCache::in_memory(1)),
            EmptySnapshotPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnknownSection { .. }));
    }

    #[tokio::test]
    async fn save_applies_locally_and_persists() {
        let f = fixture(EmptySnapshotPolicy::default());
        assert!(f.items.load().await);
        assert!(!f.items.is_loading());

        assert!(f.items.save_items(&[], &["02-offerter".to_string()]).await);
        assert_eq!(ids(&f.items), ["01-kalkylunderlag", "03-kalkylanteckningar"]);

        let stored = f.store.read(&f.items.inner.key).await.unwrap().unwrap();
        assert_eq!(stored, json!({"items": [{"id": "02-offerter", "removed": true}]}));
        assert!(f.cache.get(f.items.scope()).await.unwrap().is_tombstoned("02-offerter"));
    }

    #[tokio::test]
    async fn empty_snapshot_ignored_when_cached() {
        let f = fixture(EmptySnapshotPolicy::IgnoreWhenCached);
        f.items.save_items(&[], &["02-offerter".to_string()]).await;

        assert!(!f.items.apply_snapshot(SectionOverride::default()).await);
        assert!(f.items.overrides().is_tombstoned("02-offerter"));
        assert_eq!(f.items.items().len(), 2);
    }

    #[tokio::test]
    async fn empty_snapshot_applied_under_apply_policy() {
        let f = fixture(EmptySnapshotPolicy::Apply);
        f.items.save_items(&[], &["02-offerter".to_string()]).await;

        assert!(f.items.apply_snapshot(SectionOverride::default()).await);
        assert_eq!(f.items.items().len(), 3);
    }

    #[tokio::test]
    async fn reverting_the_only_rename_reaches_other_clients() {
        let a = fixture(EmptySnapshotPolicy::IgnoreWhenCached);
        let b_cache = Arc::new(TwoTierCache::in_memory(16));
        let nav = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V1).navigation();
        let b = SectionItems::for_section(
            a.items.scope().clone(),
            &nav,
            "825-10 Projektnamn",
            a.store.clone(),
            b_cache,
            EmptySnapshotPolicy::IgnoreWhenCached,
        )
        .unwrap();

        let rename = OverrideEntry::rename("02-offerter", "02 - Offerter UE", "Offerter UE", 2);
        assert!(a.items.save_items(&[rename], &[]).await);
        assert!(b.load().await);
        assert_eq!(b.items()[1].display_name, "Offerter UE");

        assert!(a.items.save_items(&[], &[]).await);
        assert!(b.refresh().await);

        assert_eq!(a.items.items()[1].display_name, "Offerter");
        assert_eq!(a.items.items(), b.items());
        assert!(!b.overrides().is_empty());
    }

    #[tokio::test]
    async fn cached_value_shown_before_store() {
        let f = fixture(EmptySnapshotPolicy::default());
        let doc = SectionOverride::new(vec![OverrideEntry::tombstone("03-kalkylanteckningar")]);
        f.cache.set(f.items.scope(), doc).await;

        // Store has nothing: empty read must not clobber the cached tombstone
        assert!(f.items.load().await);
        assert_eq!(ids(&f.items), ["01-kalkylunderlag", "02-offerter"]);
    }

    #[tokio::test]
    async fn watch_follows_remote_writes() {
        let f = fixture(EmptySnapshotPolicy::default());
        let mut rx = f.items.subscribe_state();
        let guard = f.items.watch().await.unwrap();

        f.store.put(
            &f.items.inner.key,
            json!({"items": [{"id": "01-kalkylunderlag", "displayName": "Underlag", "sharePointName": "01 - Underlag", "order": 5}]}),
        );

        let state = rx
            .wait_for(|s| s.items.iter().any(|i| i.display_name == "Underlag"))
            .await
            .unwrap()
            .clone();
        assert_eq!(state.items.last().unwrap().id, "01-kalkylunderlag");
        assert_eq!(
            state.items.last().unwrap().resolved_path,
            "825-10 Projektnamn/03 - Kalkyl/01 - Underlag"
        );

        drop(guard);
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(f.store.subscriber_count(&f.items.inner.key), 0);
    }
}
