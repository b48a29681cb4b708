//! phasenav Structure Definition
//!
//! Produces the canonical, versioned default navigation for each phase.
//! No I/O and no failure modes: unknown versions already resolve to V1 in
//! [`StructureVersion`](phasenav_model::StructureVersion) parsing.
//!
//! # Layout rules
//!
//! - Section `order` is its 1-based position in the version's id list
//! - Section `name` is `"{order:02} - {title}"`
//! - Item ids are stable across versions; names and orders are not
//! - The request documents section has no fixed items, only one reserved
//!   sub-folder ([`RESERVED_REQUEST_FOLDER`])
//!
//! # Example
//!
//! ```rust,ignore
//! use phasenav_model::{Phase, StructureVersion};
//! use phasenav_structure::build_navigation;
//!
//! let nav = build_navigation(Phase::Kalkylskede, StructureVersion::V2);
//! assert_eq!(nav.sections[3].name, "04 - Risker & möjligheter");
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod catalog;
mod definition;

pub use catalog::{RESERVED_REQUEST_FOLDER, REQUEST_SECTION_ID};
pub use definition::{
    build_locked_folder_names, build_navigation, default_section, is_reserved_folder, known_section_ids, section_ids, section_title,
    StructureDefinition,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
