//! phasenav Hierarchy Classifier
//!
//! Turns a raw folder/file tree listed from an external file store into
//! typed [`HierarchyNode`]s. The store knows nothing about phases or
//! projects, so both are recognised from naming conventions on every fetch.
//!
//! # Core Concepts
//!
//! - **Name patterns**: [`classify_name`] is the single predicate deciding
//!   whether a folder is a phase root (`"01 - Kalkylskede"`), a project
//!   (`"825-10 Projektnamn"`), a plain container, or unusable
//! - **Functions**: folders directly inside a project are matched against a
//!   keyword vocabulary ([`classify_function`])
//! - **Walk**: [`classify`] / [`adapt_tree`] recurse with an inherited
//!   [`ClassifyContext`]; a project stops phase/project detection for its
//!   subtree
//!
//! # Example
//!
//! ```rust,ignore
//! use phasenav_hierarchy::{adapt_tree, ClassifyOptions, RawNode};
//!
//! let tree = vec![RawNode::folder("01 - Kalkylskede", vec![
//!     RawNode::folder("825-10 Projektnamn", vec![RawNode::folder("Ritningar", vec![])]),
//! ])];
//! let adapted = adapt_tree("Byggbolaget", &tree, &ClassifyOptions::default());
//! assert_eq!(adapted.root.projects()[0].id, "825-10");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod classify;
mod function;
mod node;
mod pattern;

pub use classify::{
    adapt_tree, classify, AdaptedTree, ClassifyContext, ClassifyOptions, ClassifyScope, Diagnostic, ProjectRef,
    DEFAULT_MAX_DEPTH,
};
pub use function::{classify_function, ProjectFunction};
pub use node::{FileMeta, HierarchyNode, NodeKind, RawKind, RawNode};
pub use pattern::{classify_name, is_project_name, phase_of, NameClass};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
