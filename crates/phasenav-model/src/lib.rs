//! phasenav data model
//!
//! Types shared by every layer of the navigation engine.
//!
//! # Core Concepts
//!
//! - [`Phase`]: Lifecycle stage of a project, each with its own navigation
//! - [`StructureVersion`]: Immutable snapshot of the default layout
//! - [`NavigationDocument`]: Company-level navigation for one phase
//! - [`Section`] / [`Item`]: Navigation groupings and their members
//! - [`SectionOverride`]: Per-project, per-section customisation with tombstones
//! - [`ScopeKey`]: Explicit storage scope for every persisted document
//!
//! # Example
//!
//! ```rust,ignore
//! use phasenav_model::{OverrideEntry, SectionOverride};
//!
//! let mut overrides = SectionOverride::default();
//! overrides.items.push(OverrideEntry::tombstone("02-offerter"));
//! assert!(overrides.is_tombstoned("02-offerter"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod navigation;
mod overrides;
mod phase;
mod scope;
pub mod text;

pub use error::ModelError;
pub use navigation::{Item, NavigationDocument, Section};
pub use overrides::{OverrideEntry, SectionOverride};
pub use phase::{Phase, ProjectStructureFlag, StructureVersion};
pub use scope::{NavigationScope, OverrideScope, ScopeKey};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn navigation_document_json_shape() {
        let doc = NavigationDocument {
            phase: Phase::Kalkylskede,
            sections: vec![Section::new("oversikt", "01 - Översikt", "home", 1)],
            schema_version: 2,
            version: 7,
            is_default: true,
            updated_at: None,
            updated_by: Some("anna@example.com".to_string()),
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["phase"], "kalkylskede");
        assert_eq!(json["schemaVersion"], 2);
        assert_eq!(json["updatedBy"], "anna@example.com");
        // Never persisted
        assert!(json.get("isDefault").is_none());

        let back: NavigationDocument = serde_json::from_value(json).unwrap();
        assert!(!back.is_default);
        assert_eq!(back.sections[0].id, "oversikt");
    }

    #[test]
    fn scope_paths_are_disjoint_per_scope() {
        let nav = ScopeKey::navigation("acme", Phase::Produktion);
        let ovr = ScopeKey::section_override("acme", "825-10", "kalkyl");
        assert_ne!(nav.storage_path(), ovr.storage_path());
        assert!(ovr.storage_path().contains("825-10"));
    }
}
