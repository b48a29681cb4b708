//! Engine facade
//!
//! Wires configuration, adapters and the override cache into the three
//! services the UI talks to.

use crate::config::EngineConfig;
use crate::error::CoreResult;
use crate::hierarchy::HierarchyService;
use crate::navigation::NavigationService;
use crate::section_items::SectionItems;
use phasenav_model::{OverrideScope, Phase, ProjectStructureFlag, StructureVersion};
use phasenav_store::{DocumentStore, FileStorage, OverrideCache};
use std::sync::Arc;

/// Shared entry point
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStorage>,
    cache: Arc<dyn OverrideCache>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Engine {
    /// Create engine; the override cache is built from the config
    #[must_use]
    pub fn new(config: EngineConfig, store: Arc<dyn DocumentStore>, files: Arc<dyn FileStorage>) -> Self {
        let cache = Arc::new(config.override_cache());
        Self {
            config,
            store,
            files,
            cache,
        }
    }

    /// With an externally owned override cache
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn OverrideCache>) -> Self {
        self.cache = cache;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Version a project resolves through
    #[must_use]
    pub fn structure_version(&self, flag: ProjectStructureFlag) -> StructureVersion {
        flag.structure_version.unwrap_or(self.config.default_version)
    }

    /// Navigation service for a company
    #[must_use]
    pub fn navigation(&self, company: impl Into<String>) -> NavigationService {
        NavigationService::new(Arc::clone(&self.store), company)
    }

    /// Document tree service
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyService {
        HierarchyService::new(
            Arc::clone(&self.files),
            self.config.classify_options(),
            self.config.site_name.as_str(),
        )
    }

    /// Section items handle for a project section
    ///
    /// Resolves the company navigation first, so base items reflect the
    /// company's customizations and the project's structure version. The
    /// handle is returned unloaded.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownSection`](crate::CoreError::UnknownSection)
    /// when the phase has no such section
    pub async fn section_items(
        &self,
        scope: OverrideScope,
        phase: Phase,
        flag: ProjectStructureFlag,
        project_root: &str,
    ) -> CoreResult<SectionItems> {
        let navigation = self
            .navigation(scope.company.as_str())
            .get_navigation(phase, self.structure_version(flag))
            .await;
        SectionItems::for_section(
            scope,
            &navigation,
            project_root,
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.config.empty_snapshot_policy,
        )
    }
}
