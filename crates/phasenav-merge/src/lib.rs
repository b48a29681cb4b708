//! phasenav Merge Layers
//!
//! Two composable, pure merge functions:
//!
//! - [`NavigationMergeEngine`]: stored company navigation over the
//!   versioned structure definition (legacy id migration, deduplication,
//!   structural fields forced back to the defaults)
//! - [`merge_section_items`] / [`apply_save`]: project section overrides
//!   over merged navigation items (renames, reorders, tombstones, custom
//!   pass-through folders)
//!
//! # Data flow
//!
//! ```text
//! StructureDefinition ─┐
//!                      ├─> NavigationMergeEngine ─> section items ─┐
//! stored navigation ───┘                                           ├─> merge_section_items ─> UI
//!                                          stored SectionOverride ─┘
//! ```
//!
//! Neither layer performs I/O or fails; storage lives in `phasenav-store`.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod edit;
mod legacy;
mod navigation;
mod section;

pub use edit::{add_item, add_section, remove_item, remove_section, set_item_enabled};
pub use legacy::LegacyAliases;
pub use navigation::NavigationMergeEngine;
pub use section::{apply_save, merge_section_items, PathContext, ResolvedItem, PASS_THROUGH_COMPONENT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use phasenav_model::{OverrideEntry, Phase, SectionOverride, StructureVersion};
    use phasenav_structure::StructureDefinition;

    #[test]
    fn layers_compose() {
        let def = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V2);
        let nav = NavigationMergeEngine::new().get_navigation(None, def);
        let kalkyl = nav.section("kalkyl").unwrap();

        let overrides = SectionOverride::new(vec![OverrideEntry::tombstone("02-offerter")]);
        let ctx = PathContext::new("825-10 Projektnamn", &kalkyl.name);
        let items = merge_section_items(&kalkyl.items, &overrides, &ctx);

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.resolved_path.starts_with("825-10 Projektnamn/03 - Kalkyl/")));
    }
}
