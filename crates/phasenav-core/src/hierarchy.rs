//! Document tree fetch and classification
//!
//! Lists the external file store breadth-first, one level at a time with
//! the listings of a level issued concurrently, then hands the assembled
//! raw tree to the classifier.

use futures::future::join_all;
use phasenav_hierarchy::{adapt_tree, AdaptedTree, ClassifyOptions, FileMeta, RawKind, RawNode};
use phasenav_store::{EntryKind, FileStorage, RawEntry};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Raw tree plus the folders whose listing failed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedTree {
    pub roots: Vec<RawNode>,
    /// Folders kept without children
    pub failed: Vec<String>,
}

/// Classified tree plus fetch failures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySnapshot {
    pub tree: AdaptedTree,
    pub failed_listings: Vec<String>,
}

/// Fetches and classifies document trees
#[derive(Clone)]
pub struct HierarchyService {
    storage: Arc<dyn FileStorage>,
    options: ClassifyOptions,
    site_name: String,
}

impl std::fmt::Debug for HierarchyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyService")
            .field("options", &self.options)
            .field("site_name", &self.site_name)
            .finish_non_exhaustive()
    }
}

impl HierarchyService {
    #[must_use]
    pub fn new(storage: Arc<dyn FileStorage>, options: ClassifyOptions, site_name: impl Into<String>) -> Self {
        Self {
            storage,
            options,
            site_name: site_name.into(),
        }
    }

    /// List the tree below `root`, down to the configured depth
    ///
    /// A failed listing of the root yields an empty tree; a failed listing
    /// of any other folder keeps that folder with no children.
    pub async fn fetch_tree(&self, root: &str) -> FetchedTree {
        let mut listings: HashMap<String, Vec<RawEntry>> = HashMap::new();
        let mut failed = Vec::new();
        let mut level = vec![root.to_string()];

        for depth in 0..=self.options.max_depth {
            if level.is_empty() {
                break;
            }
            let results = join_all(level.iter().map(|path| self.storage.list_children(path))).await;

            let mut next = Vec::new();
            for (path, result) in level.into_iter().zip(results) {
                match result {
                    Ok(children) => {
                        next.extend(children.iter().filter(|c| c.is_folder()).map(|c| c.path.clone()));
                        listings.insert(path, children);
                    }
                    Err(e) => {
                        warn!(path, depth, error = %e, "folder listing failed, keeping folder without children");
                        failed.push(path);
                    }
                }
            }
            level = next;
        }

        let roots = assemble(root, &mut listings);
        debug!(root, roots = roots.len(), failed = failed.len(), "tree fetched");
        FetchedTree { roots, failed }
    }

    /// Fetch and classify the tree below `root`
    pub async fn load(&self, root: &str) -> HierarchySnapshot {
        let fetched = self.fetch_tree(root).await;
        HierarchySnapshot {
            tree: self.classify(&fetched.roots),
            failed_listings: fetched.failed,
        }
    }

    /// Classify an already fetched raw tree
    #[must_use]
    pub fn classify(&self, roots: &[RawNode]) -> AdaptedTree {
        adapt_tree(&self.site_name, roots, &self.options)
    }
}

fn assemble(path: &str, listings: &mut HashMap<String, Vec<RawEntry>>) -> Vec<RawNode> {
    let Some(children) = listings.remove(path) else {
        return Vec::new();
    };
    children
        .into_iter()
        .map(|entry| {
            let grandchildren = if entry.is_folder() {
                assemble(&entry.path, listings)
            } else {
                Vec::new()
            };
            to_raw_node(entry, grandchildren)
        })
        .collect()
}

fn to_raw_node(entry: RawEntry, children: Vec<RawNode>) -> RawNode {
    RawNode {
        name: entry.name,
        kind: match entry.kind {
            EntryKind::Folder => RawKind::Folder,
            EntryKind::File => RawKind::File,
        },
        path: entry.path,
        meta: FileMeta {
            web_url: entry.web_url,
            size: entry.size,
            mime_type: entry.mime_type,
            last_modified: entry.last_modified,
        },
        children,
    }
}
