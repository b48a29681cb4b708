//! Engine configuration
//!
//! Loaded from TOML, then overridden from `PHASENAV_*` environment
//! variables. Every field has a default, so an empty file is valid.

use phasenav_hierarchy::ClassifyOptions;
use phasenav_model::{Phase, StructureVersion};
use phasenav_store::{FileSessionStore, MemorySessionStore, SessionStore, TwoTierCache};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding [`EngineConfig::default_phase`]
pub const ENV_DEFAULT_PHASE: &str = "PHASENAV_DEFAULT_PHASE";
/// Environment variable overriding [`EngineConfig::default_version`]
pub const ENV_STRUCTURE_VERSION: &str = "PHASENAV_STRUCTURE_VERSION";
/// Environment variable overriding [`EngineConfig::session_cache_dir`]
pub const ENV_SESSION_DIR: &str = "PHASENAV_SESSION_DIR";

/// What to do with a live snapshot holding no override entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySnapshotPolicy {
    /// Keep a non-empty cached override over an empty snapshot
    #[default]
    IgnoreWhenCached,
    /// Every snapshot replaces local state
    Apply,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Phase attributed to tree nodes with no phase ancestor
    pub default_phase: Phase,
    /// Structure version for projects without a pinned version
    pub default_version: StructureVersion,
    /// Memory-tier capacity of the override cache
    pub cache_capacity: u64,
    /// Memory-tier entry lifetime; unset keeps entries until evicted
    pub cache_ttl_secs: Option<u64>,
    /// Directory of the durable session tier; unset keeps it in memory
    pub session_cache_dir: Option<PathBuf>,
    pub empty_snapshot_policy: EmptySnapshotPolicy,
    /// Listing and classification depth limit of tree walks
    pub max_tree_depth: usize,
    /// Name of the synthetic root node of classified trees
    pub site_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_phase: Phase::Kalkylskede,
            default_version: StructureVersion::V1,
            cache_capacity: 1_000,
            cache_ttl_secs: None,
            session_cache_dir: None,
            empty_snapshot_policy: EmptySnapshotPolicy::default(),
            max_tree_depth: phasenav_hierarchy::DEFAULT_MAX_DEPTH,
            site_name: "Dokument".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on invalid TOML or unknown value types
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML file and apply environment overrides
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override holds an invalid value
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)?.with_env_overrides()
    }

    /// Apply `PHASENAV_*` overrides from the process environment
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unknown phase
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `PHASENAV_*` overrides from any lookup
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unknown phase
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_DEFAULT_PHASE) {
            self.default_phase = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_DEFAULT_PHASE.to_string(),
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_STRUCTURE_VERSION) {
            self.default_version = StructureVersion::parse_lenient(&value);
        }
        if let Some(value) = lookup(ENV_SESSION_DIR) {
            self.session_cache_dir = (!value.trim().is_empty()).then(|| PathBuf::from(value));
        }
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn with_default_phase(mut self, phase: Phase) -> Self {
        self.default_phase = phase;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_default_version(mut self, version: StructureVersion) -> Self {
        self.default_version = version;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_session_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_cache_dir = Some(dir.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_empty_snapshot_policy(mut self, policy: EmptySnapshotPolicy) -> Self {
        self.empty_snapshot_policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }

    /// Memory-tier TTL, if any
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Tree classification options
    #[must_use]
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions::default()
            .with_default_phase(self.default_phase)
            .with_max_depth(self.max_tree_depth)
    }

    /// Build the session tier described by this config
    #[must_use]
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        match &self.session_cache_dir {
            Some(dir) => Arc::new(FileSessionStore::new(dir)),
            None => Arc::new(MemorySessionStore::new()),
        }
    }

    /// Build the override cache described by this config
    #[must_use]
    pub fn override_cache(&self) -> TwoTierCache {
        let session = self.session_store();
        match self.cache_ttl() {
            Some(ttl) => TwoTierCache::with_ttl(self.cache_capacity, ttl, session),
            None => TwoTierCache::new(self.cache_capacity, session),
        }
    }
}
