//! phasenav Persistence Adapters
//!
//! The only suspension points of the engine live here. Everything above
//! this crate is pure merge/classification logic fed by these adapters.
//!
//! # Core Concepts
//!
//! - [`DocumentStore`]: JSON documents keyed by [`ScopeKey`](phasenav_model::ScopeKey),
//!   partial merge-writes, live [`Subscription`]s
//! - [`FileStorage`]: folder listings of the external file store
//! - [`SessionStore`]: durable, session-scoped key-value cache
//! - [`TwoTierCache`]: moka memory tier over a session tier, keyed by
//!   [`OverrideScope`](phasenav_model::OverrideScope)
//!
//! # Example
//!
//! ```rust,ignore
//! use phasenav_store::{DocumentStore, MemoryDocumentStore};
//! use phasenav_model::ScopeKey;
//!
//! let store = MemoryDocumentStore::new();
//! let key = ScopeKey::section_override("acme", "825-10", "kalkyl");
//! store.write_merge(&key, serde_json::json!({"items": []})).await?;
//! let mut sub = store.subscribe(&key).await?;
//! while let Some(snapshot) = sub.next().await { /* ... */ }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
mod document;
pub mod error;
mod files;
mod session;

pub use cache::{CacheStats, OverrideCache, TwoTierCache};
pub use document::{decode, deep_merge, DocumentStore, MemoryDocumentStore, SnapshotEvent, Subscription};
pub use error::{ErrorClass, StoreError, StoreResult};
pub use files::{EntryKind, FileStorage, MemoryFileStorage, RawEntry};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
