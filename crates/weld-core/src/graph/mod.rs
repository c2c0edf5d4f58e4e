//! The cross-project dependency graph.

pub mod loader;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::domain::{Project, SdkStatus, Target, Workspace};

pub use loader::GraphLoader;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("found circular dependency between targets: {path}")]
    CyclicDependency { path: String },

    #[error("target '{name}' was not found in project at {}", .project_path.display())]
    MissingTarget { project_path: PathBuf, name: String },

    #[error("no project found at {}", .path.display())]
    MissingProject { path: PathBuf },

    #[error("missing file: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("external dependency '{name}' is not present in the dependencies graph")]
    UnknownExternalDependency { name: String },
}

/// A resolved node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Target { project_path: PathBuf, name: String },
    Framework { path: PathBuf },
    Xcframework { path: PathBuf },
    Library { path: PathBuf },
    Sdk { name: String, status: SdkStatus },
    Package { product: String },
    Cocoapods { path: PathBuf },
}

impl GraphNode {
    pub fn target(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::Target {
            project_path: project_path.into(),
            name: name.into(),
        }
    }

    /// Whether this node is a pre-built artefact on disk.
    pub const fn is_precompiled(&self) -> bool {
        matches!(
            self,
            Self::Framework { .. } | Self::Xcframework { .. } | Self::Library { .. }
        )
    }
}

/// The loaded, cycle-checked workspace graph.
#[derive(Debug, Clone)]
pub struct Graph {
    pub name: String,
    pub entry_path: PathBuf,
    pub workspace: Workspace,
    pub projects: IndexMap<PathBuf, Project>,
    /// Direct dependency edges, keyed by target node, in manifest order.
    pub dependencies: IndexMap<GraphNode, Vec<GraphNode>>,
}

impl Graph {
    pub fn project(&self, path: &Path) -> Option<&Project> {
        self.projects.get(path)
    }

    pub fn target(&self, project_path: &Path, name: &str) -> Option<&Target> {
        self.projects.get(project_path)?.target(name)
    }

    /// Projects in deterministic (path-sorted) order.
    pub fn sorted_projects(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.values().collect();
        projects.sort_by(|a, b| a.path.cmp(&b.path));
        projects
    }

    /// Direct dependencies of a target, in manifest order.
    pub fn target_dependencies(&self, project_path: &Path, name: &str) -> &[GraphNode] {
        self.dependencies
            .get(&GraphNode::target(project_path, name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transitive closure of a target's dependencies filtered to nodes that
    /// participate in linking, in discovery order.
    pub fn linkable_dependencies(&self, project_path: &Path, name: &str) -> Vec<GraphNode> {
        let mut linkable: Vec<GraphNode> = Vec::new();
        let mut visited: Vec<GraphNode> = Vec::new();
        let mut queue: Vec<GraphNode> =
            self.target_dependencies(project_path, name).to_vec();

        while !queue.is_empty() {
            let node = queue.remove(0);
            if visited.contains(&node) {
                continue;
            }
            visited.push(node.clone());

            let is_linkable = match &node {
                GraphNode::Target {
                    project_path,
                    name,
                } => self
                    .target(project_path, name)
                    .is_some_and(|t| t.product.is_linkable()),
                GraphNode::Framework { .. }
                | GraphNode::Xcframework { .. }
                | GraphNode::Library { .. }
                | GraphNode::Sdk { .. }
                | GraphNode::Package { .. } => true,
                GraphNode::Cocoapods { .. } => false,
            };
            if is_linkable && !linkable.contains(&node) {
                linkable.push(node.clone());
            }

            if let GraphNode::Target { project_path, name } = &node {
                queue.extend(self.target_dependencies(project_path, name).iter().cloned());
            }
        }
        linkable
    }

    /// All pre-compiled nodes referenced anywhere in the graph.
    pub fn pre_compiled_nodes(&self) -> Vec<&GraphNode> {
        self.all_nodes(|node| node.is_precompiled())
    }

    /// All package-product nodes referenced anywhere in the graph.
    pub fn package_nodes(&self) -> Vec<&GraphNode> {
        self.all_nodes(|node| matches!(node, GraphNode::Package { .. }))
    }

    /// All CocoaPods nodes referenced anywhere in the graph.
    pub fn cocoapods_nodes(&self) -> Vec<&GraphNode> {
        self.all_nodes(|node| matches!(node, GraphNode::Cocoapods { .. }))
    }

    fn all_nodes(&self, keep: impl Fn(&GraphNode) -> bool) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = Vec::new();
        for edges in self.dependencies.values() {
            for node in edges {
                if keep(node) && !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }
}
