//! Company navigation service
//!
//! Reads are always merged against the structure definition and degrade
//! to the defaults; writes are partial merges stamped with a bumped
//! version counter.

use crate::error::CoreResult;
use chrono::Utc;
use phasenav_merge::{edit, NavigationMergeEngine};
use phasenav_model::{Item, NavigationDocument, Phase, ScopeKey, Section, StructureVersion};
use phasenav_store::{decode, DocumentStore, Subscription};
use phasenav_structure::StructureDefinition;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Navigation reads and edits for one company
#[derive(Clone)]
pub struct NavigationService {
    store: Arc<dyn DocumentStore>,
    engine: Arc<NavigationMergeEngine>,
    company: String,
}

impl std::fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationService")
            .field("company", &self.company)
            .finish_non_exhaustive()
    }
}

impl NavigationService {
    /// Create service for a company
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, company: impl Into<String>) -> Self {
        Self {
            store,
            engine: Arc::new(NavigationMergeEngine::new()),
            company: company.into(),
        }
    }

    /// With a custom merge engine (extra legacy aliases)
    #[inline]
    #[must_use]
    pub fn with_engine(mut self, engine: NavigationMergeEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    #[inline]
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    fn key(&self, phase: Phase) -> ScopeKey {
        ScopeKey::navigation(self.company.as_str(), phase)
    }

    /// Stored document for a phase, undecoded fields preserved
    ///
    /// # Errors
    /// Returns the adapter error, or [`StoreError::Malformed`](phasenav_store::StoreError::Malformed)
    /// when the stored document cannot be decoded
    pub async fn read_stored(&self, phase: Phase) -> CoreResult<Option<NavigationDocument>> {
        let key = self.key(phase);
        let Some(raw) = self.store.read(&key).await? else {
            return Ok(None);
        };
        let mut doc: NavigationDocument = decode(&key, raw)?;
        doc.phase = phase;
        Ok(Some(doc))
    }

    /// Merged navigation for a phase
    ///
    /// Never fails: a missing document yields the defaults with
    /// `is_default = true`, and a failed or undecodable read is logged and
    /// degrades to the defaults too.
    pub async fn get_navigation(&self, phase: Phase, version: StructureVersion) -> NavigationDocument {
        let definition = StructureDefinition::new(phase, version);
        match self.read_stored(phase).await {
            Ok(stored) => self.engine.get_navigation(stored.as_ref(), definition),
            Err(e) => {
                warn!(company = %self.company, %phase, error = %e, "navigation read failed, using defaults");
                definition.navigation()
            }
        }
    }

    /// Persist a navigation document
    ///
    /// Bumps the edit counter and stamps time and actor. Returns `false`
    /// when the write is not acknowledged.
    pub async fn save_navigation(&self, doc: &NavigationDocument, actor: &str) -> bool {
        self.persist(doc, actor).await.is_some()
    }

    async fn persist(&self, doc: &NavigationDocument, actor: &str) -> Option<NavigationDocument> {
        let mut next = doc.clone();
        next.version = doc.version.saturating_add(1);
        next.updated_at = Some(Utc::now());
        next.updated_by = Some(actor.to_string());
        next.is_default = false;

        let key = self.key(doc.phase);
        let partial = match serde_json::to_value(&next) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "navigation not serializable");
                return None;
            }
        };

        match self.store.write_merge(&key, partial).await {
            Ok(()) => {
                info!(key = %key, version = next.version, actor, "navigation saved");
                Some(next)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "navigation write failed");
                None
            }
        }
    }

    /// Load, edit and save in one step
    ///
    /// Unlike [`get_navigation`](Self::get_navigation) a failed read aborts:
    /// saving an edit of the defaults would overwrite stored customizations.
    /// Returns the saved document, or `None` when nothing changed or the
    /// read or write failed.
    pub async fn edit<F>(
        &self,
        phase: Phase,
        version: StructureVersion,
        actor: &str,
        f: F,
    ) -> Option<NavigationDocument>
    where
        F: FnOnce(&mut NavigationDocument, &StructureDefinition) -> bool + Send,
    {
        let definition = StructureDefinition::new(phase, version);
        let stored = match self.read_stored(phase).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(company = %self.company, %phase, error = %e, "navigation edit aborted, read failed");
                return None;
            }
        };

        let mut doc = self.engine.get_navigation(stored.as_ref(), definition);
        if !f(&mut doc, &definition) {
            debug!(company = %self.company, %phase, "navigation edit changed nothing");
            return None;
        }
        self.persist(&doc, actor).await
    }

    /// Append a custom section
    pub async fn add_section(&self, phase: Phase, version: StructureVersion, section: Section, actor: &str) -> bool {
        self.edit(phase, version, actor, |doc, _| edit::add_section(doc, section))
            .await
            .is_some()
    }

    /// Remove a custom section; default sections are refused
    pub async fn remove_section(&self, phase: Phase, version: StructureVersion, section_id: &str, actor: &str) -> bool {
        self.edit(phase, version, actor, |doc, def| edit::remove_section(doc, def, section_id))
            .await
            .is_some()
    }

    /// Append an item to a section
    pub async fn add_item(
        &self,
        phase: Phase,
        version: StructureVersion,
        section_id: &str,
        item: Item,
        actor: &str,
    ) -> bool {
        self.edit(phase, version, actor, |doc, _| edit::add_item(doc, section_id, item))
            .await
            .is_some()
    }

    /// Remove an item; default items are disabled instead
    pub async fn remove_item(
        &self,
        phase: Phase,
        version: StructureVersion,
        section_id: &str,
        item_id: &str,
        actor: &str,
    ) -> bool {
        self.edit(phase, version, actor, |doc, def| {
            edit::remove_item(doc, def, section_id, item_id)
        })
        .await
        .is_some()
    }

    /// Show or hide an item
    pub async fn set_item_enabled(
        &self,
        phase: Phase,
        version: StructureVersion,
        section_id: &str,
        item_id: &str,
        enabled: bool,
        actor: &str,
    ) -> bool {
        self.edit(phase, version, actor, |doc, _| {
            edit::set_item_enabled(doc, section_id, item_id, enabled)
        })
        .await
        .is_some()
    }

    /// Live merged navigation
    ///
    /// # Errors
    /// Returns the adapter error when the subscription cannot be opened
    pub async fn subscribe_navigation(&self, phase: Phase, version: StructureVersion) -> CoreResult<NavigationFeed> {
        let subscription = self.store.subscribe(&self.key(phase)).await?;
        Ok(NavigationFeed {
            subscription,
            engine: Arc::clone(&self.engine),
            definition: StructureDefinition::new(phase, version),
        })
    }
}

/// Merged navigation, re-merged on every snapshot
///
/// Dropping the feed unsubscribes.
#[derive(Debug)]
pub struct NavigationFeed {
    subscription: Subscription,
    engine: Arc<NavigationMergeEngine>,
    definition: StructureDefinition,
}

impl NavigationFeed {
    /// Next merged document; `None` once the store closed the feed
    ///
    /// Failed deliveries are logged and skipped; undecodable documents
    /// yield the defaults.
    pub async fn next(&mut self) -> Option<NavigationDocument> {
        loop {
            match self.subscription.next().await? {
                Ok(raw) => return Some(self.merge(raw)),
                Err(e) => warn!(key = %self.subscription.key(), error = %e, "navigation snapshot failed"),
            }
        }
    }

    fn merge(&self, raw: Option<Value>) -> NavigationDocument {
        let stored = raw.and_then(|value| match decode::<NavigationDocument>(self.subscription.key(), value) {
            Ok(mut doc) => {
                doc.phase = self.definition.phase();
                Some(doc)
            }
            Err(e) => {
                warn!(error = %e, "undecodable navigation snapshot, using defaults");
                None
            }
        });
        self.engine.get_navigation(stored.as_ref(), self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasenav_store::MemoryDocumentStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service() -> (Arc<MemoryDocumentStore>, NavigationService) {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = NavigationService::new(store.clone(), "acme");
        (store, service)
    }

    #[tokio::test]
    async fn missing_document_yields_defaults() {
        let (_, service) = service();
        let nav = service.get_navigation(Phase::Kalkylskede, StructureVersion::V2).await;
        assert!(nav.is_default);
        assert_eq!(
            nav.section_ids(),
            StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V2).section_ids()
        );
    }

    #[tokio::test]
    async fn save_bumps_version_and_stamps_actor() {
        let (store, service) = service();
        let nav = service.get_navigation(Phase::Produktion, StructureVersion::V1).await;
        assert!(service.save_navigation(&nav, "anna@acme.se").await);

        let raw = store
            .read(&ScopeKey::navigation("acme", Phase::Produktion))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw["version"], json!(1));
        assert_eq!(raw["updatedBy"], json!("anna@acme.se"));

        let reloaded = service.get_navigation(Phase::Produktion, StructureVersion::V1).await;
        assert!(!reloaded.is_default);
        assert_eq!(reloaded.version, 1);
    }

    #[tokio::test]
    async fn edits_round_trip_through_the_store() {
        let (_, service) = service();
        let (phase, version) = (Phase::Kalkylskede, StructureVersion::V1);

        assert!(
            service
                .add_item(phase, version, "kalkyl", Item::custom("egen", "Egen mapp", "PassThroughFolder"), "anna")
                .await
        );
        assert!(service.remove_item(phase, version, "kalkyl", "02-offerter", "anna").await);
        assert!(!service.remove_section(phase, version, "kalkyl", "anna").await);

        let nav = service.get_navigation(phase, version).await;
        let kalkyl = nav.section("kalkyl").unwrap();
        assert!(kalkyl.find_item("egen").is_some());
        assert!(!kalkyl.find_item("02-offerter").unwrap().enabled);
        assert_eq!(nav.version, 2);
    }

    #[tokio::test]
    async fn toggling_an_item_records_the_actor() {
        let (store, service) = service();
        let (phase, version) = (Phase::Kalkylskede, StructureVersion::V1);

        assert!(service.set_item_enabled(phase, version, "kalkyl", "02-offerter", false, "bo@acme.se").await);
        let nav = service.get_navigation(phase, version).await;
        assert!(!nav.section("kalkyl").unwrap().find_item("02-offerter").unwrap().enabled);
        assert_eq!(nav.updated_by.as_deref(), Some("bo@acme.se"));

        let raw = store.read(&ScopeKey::navigation("acme", phase)).await.unwrap().unwrap();
        assert_eq!(raw["updatedBy"], json!("bo@acme.se"));
    }

    #[tokio::test]
    async fn save_at_maximum_version_saturates() {
        let (_, service) = service();
        let mut nav = service.get_navigation(Phase::Avslut, StructureVersion::V1).await;
        nav.version = u64::MAX;

        assert!(service.save_navigation(&nav, "anna").await);
        assert_eq!(service.get_navigation(Phase::Avslut, StructureVersion::V1).await.version, u64::MAX);
    }

    #[tokio::test]
    async fn custom_sections_can_be_added_and_removed() {
        let (_, service) = service();
        let (phase, version) = (Phase::Avslut, StructureVersion::V1);

        let section = Section::new("egen", "Egen sektion", "star", 0);
        assert!(service.add_section(phase, version, section.clone(), "anna").await);
        assert!(!service.add_section(phase, version, section, "anna").await);
        assert!(service.get_navigation(phase, version).await.section("egen").is_some());

        assert!(service.remove_section(phase, version, "egen", "anna").await);
        assert!(service.get_navigation(phase, version).await.section("egen").is_none());
    }

    #[tokio::test]
    async fn feed_remerges_each_snapshot() {
        let (store, service) = service();
        let mut feed = service
            .subscribe_navigation(Phase::Eftermarknad, StructureVersion::V1)
            .await
            .unwrap();

        let first = feed.next().await.unwrap();
        assert!(first.is_default);

        store.put(
            &ScopeKey::navigation("acme", Phase::Eftermarknad),
            json!({"sections": [{"id": "garanti", "name": "x", "order": 9, "items": []}], "version": 4}),
        );
        let second = feed.next().await.unwrap();
        assert_eq!(second.version, 4);
        assert_eq!(second.section("garanti").unwrap().order, 2);
        assert_eq!(second.sections.len(), first.sections.len());
    }
}
