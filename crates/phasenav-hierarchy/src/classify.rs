//! Recursive tree classification
//!
//! Walks a raw folder/file tree and derives a [`NodeKind`] for every entry.
//! Classification never fails: malformed entries degrade to plain folders
//! and deep subtrees are truncated, both recorded as [`Diagnostic`]s.

use crate::function::classify_function;
use crate::node::{HierarchyNode, NodeKind, RawKind, RawNode};
use crate::pattern::{classify_name, NameClass};
use phasenav_model::Phase;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default depth limit of a walk
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Where in the tree a node sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyScope {
    /// Above any project; phase and project detection active
    #[default]
    Hierarchy,
    /// Direct child of a project
    Project,
    /// Inside a project function
    Function,
}

/// Project identity carried down a project subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub number: String,
    pub name: String,
}

/// Inherited state for one level of the walk
#[derive(Debug, Clone, Default)]
pub struct ClassifyContext {
    pub parent_path: String,
    pub phase: Option<Phase>,
    pub project: Option<ProjectRef>,
    pub scope: ClassifyScope,
    pub depth: usize,
}

impl ClassifyContext {
    /// Context for top-level entries
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Context with a known phase
    #[inline]
    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Context with a parent path
    #[inline]
    #[must_use]
    pub fn with_parent_path(mut self, path: impl Into<String>) -> Self {
        self.parent_path = path.into();
        self
    }

    fn child(&self, path: &str, scope: ClassifyScope) -> Self {
        Self {
            parent_path: path.to_string(),
            phase: self.phase,
            project: self.project.clone(),
            scope,
            depth: self.depth + 1,
        }
    }
}

/// Walk options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Phase attributed when no ancestor names one
    pub default_phase: Phase,
    /// Entries deeper than this keep their node but lose their children
    pub max_depth: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            default_phase: Phase::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ClassifyOptions {
    #[inline]
    #[must_use]
    pub fn with_default_phase(mut self, phase: Phase) -> Self {
        self.default_phase = phase;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Something the walk degraded on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// Name was empty or unusable; classified as a plain folder
    MalformedName { path: String },
    /// Children dropped at the depth limit
    Truncated { path: String, dropped: usize },
}

/// Result of [`adapt_tree`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptedTree {
    pub root: HierarchyNode,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify one raw entry and its subtree
#[must_use]
pub fn classify(raw: &RawNode, ctx: &ClassifyContext, options: &ClassifyOptions) -> HierarchyNode {
    Walker::new(options).node(raw, ctx)
}

/// Classify a forest of raw entries under a synthetic site node
#[must_use]
pub fn adapt_tree(site_name: &str, roots: &[RawNode], options: &ClassifyOptions) -> AdaptedTree {
    let mut walker = Walker::new(options);
    let ctx = ClassifyContext::root().child("", ClassifyScope::Hierarchy);
    let children = roots.iter().map(|raw| walker.node(raw, &ctx)).collect();

    let root = HierarchyNode {
        id: "site".to_string(),
        name: site_name.to_string(),
        kind: NodeKind::Site,
        path: String::new(),
        phase: options.default_phase,
        icon: "globe".to_string(),
        project_number: None,
        project_name: None,
        function: None,
        file: Default::default(),
        children,
    };

    debug!(
        site = site_name,
        roots = roots.len(),
        diagnostics = walker.diagnostics.len(),
        "tree adapted"
    );

    AdaptedTree {
        root,
        diagnostics: walker.diagnostics,
    }
}

struct Walker<'a> {
    options: &'a ClassifyOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Walker<'a> {
    fn new(options: &'a ClassifyOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    fn node(&mut self, raw: &RawNode, ctx: &ClassifyContext) -> HierarchyNode {
        let path = entry_path(raw, ctx);
        let mut node = HierarchyNode {
            id: path.clone(),
            name: raw.name.trim().to_string(),
            kind: NodeKind::Folder,
            path: path.clone(),
            phase: ctx.phase.unwrap_or(self.options.default_phase),
            icon: "folder".to_string(),
            project_number: ctx.project.as_ref().map(|p| p.number.clone()),
            project_name: ctx.project.as_ref().map(|p| p.name.clone()),
            function: None,
            file: Default::default(),
            children: Vec::new(),
        };

        if raw.kind == RawKind::File {
            node.kind = NodeKind::File;
            node.icon = "file".to_string();
            node.file = raw.meta.clone();
            return node;
        }

        let child_ctx = match ctx.scope {
            ClassifyScope::Hierarchy => self.hierarchy_folder(raw, ctx, &mut node),
            ClassifyScope::Project => {
                if self.check_name(raw, &path) {
                    let function = classify_function(&raw.name);
                    node.kind = NodeKind::ProjectFunction;
                    node.icon = function.icon().to_string();
                    node.function = Some(function);
                }
                ctx.child(&path, ClassifyScope::Function)
            }
            ClassifyScope::Function => {
                self.check_name(raw, &path);
                ctx.child(&path, ClassifyScope::Function)
            }
        };

        node.children = self.children(raw, &child_ctx, &path);
        node
    }

    fn hierarchy_folder(&mut self, raw: &RawNode, ctx: &ClassifyContext, node: &mut HierarchyNode) -> ClassifyContext {
        match classify_name(&raw.name) {
            NameClass::Phase(phase) => {
                node.kind = NodeKind::Main;
                node.icon = "layers".to_string();
                node.phase = phase;
                let mut child = ctx.child(&node.path, ClassifyScope::Hierarchy);
                child.phase = Some(phase);
                child
            }
            NameClass::Project { number, title } => {
                node.kind = NodeKind::Project;
                node.icon = "briefcase".to_string();
                node.id = number.clone();
                node.project_number = Some(number.clone());
                node.project_name = Some(title.clone());
                let mut child = ctx.child(&node.path, ClassifyScope::Project);
                child.project = Some(ProjectRef { number, name: title });
                child
            }
            NameClass::Container => {
                node.kind = NodeKind::Sub;
                ctx.child(&node.path, ClassifyScope::Hierarchy)
            }
            NameClass::Malformed => {
                self.malformed(&node.path);
                ctx.child(&node.path, ClassifyScope::Hierarchy)
            }
        }
    }

    fn children(&mut self, raw: &RawNode, ctx: &ClassifyContext, path: &str) -> Vec<HierarchyNode> {
        if raw.children.is_empty() {
            return Vec::new();
        }
        if ctx.depth > self.options.max_depth {
            warn!(path, dropped = raw.children.len(), "depth limit reached, subtree truncated");
            self.diagnostics.push(Diagnostic::Truncated {
                path: path.to_string(),
                dropped: raw.children.len(),
            });
            return Vec::new();
        }
        raw.children.iter().map(|child| self.node(child, ctx)).collect()
    }

    /// False (and recorded) when the name is unusable
    fn check_name(&mut self, raw: &RawNode, path: &str) -> bool {
        if matches!(classify_name(&raw.name), NameClass::Malformed) {
            self.malformed(path);
            return false;
        }
        true
    }

    fn malformed(&mut self, path: &str) {
        warn!(path, "malformed folder name, classified as plain folder");
        self.diagnostics.push(Diagnostic::MalformedName { path: path.to_string() });
    }
}

fn entry_path(raw: &RawNode, ctx: &ClassifyContext) -> String {
    if !raw.path.is_empty() {
        return raw.path.clone();
    }
    let name = raw.name.trim();
    if ctx.parent_path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", ctx.parent_path.trim_end_matches('/'), name)
    }
}
