//! phasenav Core
//!
//! Services that connect the pure merge and classification layers to the
//! persistence adapters:
//! - Company navigation: read-merged on every load, partial-merge writes
//!   with a monotonic edit counter
//! - Project section items: two-tier cached overrides superseded by a live
//!   subscription
//! - Document trees: breadth-first listing tolerant of per-folder failures
//!
//! # Example
//!
//! ```rust,ignore
//! use phasenav_core::{Engine, EngineConfig};
//! use phasenav_model::{OverrideScope, Phase, ProjectStructureFlag};
//!
//! let engine = Engine::new(EngineConfig::load("phasenav.toml")?, store, files);
//! let nav = engine.navigation("acme").get_navigation(Phase::Kalkylskede, engine.config().default_version).await;
//!
//! let scope = OverrideScope::new("acme", "825-10", "kalkyl")?;
//! let items = engine.section_items(scope, Phase::Kalkylskede, ProjectStructureFlag::default(), "825-10 Projektnamn").await?;
//! let _guard = items.watch().await?;
//! items.load().await;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
mod engine;
pub mod error;
mod hierarchy;
mod navigation;
mod section_items;

pub use config::{ConfigError, EmptySnapshotPolicy, EngineConfig};
pub use engine::Engine;
pub use error::{CoreError, CoreResult};
pub use hierarchy::{FetchedTree, HierarchyService, HierarchySnapshot};
pub use navigation::{NavigationFeed, NavigationService};
pub use section_items::{SectionItems, SectionItemsState, WatchGuard};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with phasenav Core
    pub use crate::{Engine, EngineConfig, HierarchyService, NavigationService, SectionItems};
    pub use phasenav_model::{
        Item, NavigationDocument, OverrideEntry, OverrideScope, Phase, ProjectStructureFlag, Section,
        SectionOverride, StructureVersion,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
