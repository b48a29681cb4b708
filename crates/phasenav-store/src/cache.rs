//! Two-tier section override cache using moka
//!
//! Tier 1 is a concurrent in-process cache; tier 2 is a [`SessionStore`].
//! Cache failures never surface to callers: a tier-2 error degrades to a
//! miss and is logged.

use crate::session::{MemorySessionStore, SessionStore};
use async_trait::async_trait;
use moka::future::Cache;
use phasenav_model::{OverrideScope, SectionOverride};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of tier-1 entries
    pub entry_count: u64,
}

/// Cache of section override documents
#[async_trait]
pub trait OverrideCache: Send + Sync {
    async fn get(&self, scope: &OverrideScope) -> Option<SectionOverride>;

    async fn set(&self, scope: &OverrideScope, value: SectionOverride);

    async fn invalidate(&self, scope: &OverrideScope);
}

/// Memory tier over a durable session tier
#[derive(Clone)]
pub struct TwoTierCache {
    memory: Cache<OverrideScope, Arc<SectionOverride>>,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for TwoTierCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoTierCache")
            .field("entry_count", &self.memory.entry_count())
            .finish_non_exhaustive()
    }
}

impl TwoTierCache {
    /// Create cache with max tier-1 capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64, session: Arc<dyn SessionStore>) -> Self {
        Self {
            memory: Cache::new(max_capacity),
            session,
        }
    }

    /// Create cache whose tier-1 entries expire
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration, session: Arc<dyn SessionStore>) -> Self {
        Self {
            memory: Cache::builder().max_capacity(max_capacity).time_to_live(ttl).build(),
            session,
        }
    }

    /// Cache whose second tier lives in process memory
    #[must_use]
    pub fn in_memory(max_capacity: u64) -> Self {
        Self::new(max_capacity, Arc::new(MemorySessionStore::new()))
    }

    /// Drop every tier-1 entry; tier 2 is untouched
    #[inline]
    pub fn clear_memory(&self) {
        self.memory.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.memory.entry_count(),
        }
    }

    async fn load_session(&self, scope: &OverrideScope) -> Option<SectionOverride> {
        let key = scope.cache_key();
        let value = match self.session.load(&key).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(key, error = %e, "session cache read failed");
                return None;
            }
        };
        match serde_json::from_value::<SectionOverride>(value) {
            Ok(doc) => Some(doc.normalized()),
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable session cache entry");
                if let Err(e) = self.session.remove(&key).await {
                    warn!(key, error = %e, "session cache cleanup failed");
                }
                None
            }
        }
    }
}

#[async_trait]
impl OverrideCache for TwoTierCache {
    async fn get(&self, scope: &OverrideScope) -> Option<SectionOverride> {
        if let Some(hit) = self.memory.get(scope).await {
            debug!(scope = %scope.cache_key(), "override cache hit (memory)");
            return Some(hit.as_ref().clone());
        }

        let doc = self.load_session(scope).await?;
        debug!(scope = %scope.cache_key(), "override cache hit (session), promoting");
        self.memory.insert(scope.clone(), Arc::new(doc.clone())).await;
        Some(doc)
    }

    async fn set(&self, scope: &OverrideScope, value: SectionOverride) {
        let key = scope.cache_key();
        match serde_json::to_value(&value) {
            Ok(json) => {
                if let Err(e) = self.session.save(&key, &json).await {
                    warn!(key, error = %e, "session cache write failed");
                }
            }
            Err(e) => warn!(key, error = %e, "override not serializable for session cache"),
        }
        self.memory.insert(scope.clone(), Arc::new(value)).await;
    }

    async fn invalidate(&self, scope: &OverrideScope) {
        self.memory.invalidate(scope).await;
        if let Err(e) = self.session.remove(&scope.cache_key()).await {
            warn!(scope = %scope.cache_key(), error = %e, "session cache invalidation failed");
        }
    }
}
