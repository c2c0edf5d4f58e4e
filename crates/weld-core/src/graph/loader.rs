//! Building and validating the workspace graph.
//!
//! Resolution happens target by target in manifest order; cycle detection
//! runs once over the finished target-to-target edges with a DFS and an
//! explicit visiting set.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::instrument;

use crate::{
    dependencies::DependenciesGraph,
    domain::{Project, TargetDependency, Workspace},
    graph::{Graph, GraphError, GraphNode},
    paths,
};

pub struct GraphLoader<'a> {
    dependencies: &'a DependenciesGraph,
}

impl<'a> GraphLoader<'a> {
    pub fn new(dependencies: &'a DependenciesGraph) -> Self {
        Self { dependencies }
    }

    /// Build the graph for a workspace and its projects.
    #[instrument(skip_all, fields(workspace = %workspace.name))]
    pub fn load(
        &self,
        workspace: Workspace,
        projects: impl IntoIterator<Item = Project>,
    ) -> Result<Graph, GraphError> {
        let projects: IndexMap<PathBuf, Project> = projects
            .into_iter()
            .map(|project| (project.path.clone(), project))
            .collect();

        let mut dependencies: IndexMap<GraphNode, Vec<GraphNode>> = IndexMap::new();
        for project in projects.values() {
            for target in &project.targets {
                let node = GraphNode::target(&project.path, &target.name);
                let mut edges: Vec<GraphNode> = Vec::new();
                for dependency in &target.dependencies {
                    self.resolve(dependency, project, &projects, &mut edges)?;
                }
                dependencies.insert(node, edges);
            }
        }

        let graph = Graph {
            name: workspace.name.clone(),
            entry_path: workspace.path.clone(),
            workspace,
            projects,
            dependencies,
        };
        detect_cycles(&graph)?;
        Ok(graph)
    }

    fn resolve(
        &self,
        dependency: &TargetDependency,
        project: &Project,
        projects: &IndexMap<PathBuf, Project>,
        edges: &mut Vec<GraphNode>,
    ) -> Result<(), GraphError> {
        match dependency {
            TargetDependency::Target { name } => {
                let node = self.target_node(&project.path, name, projects)?;
                edges.push(node);
            }
            TargetDependency::Project { target, path } => {
                let resolved = resolve_project_path(&project.path, path);
                let node = self.target_node(&resolved, target, projects)?;
                edges.push(node);
            }
            TargetDependency::Framework { path } => {
                edges.push(precompiled(path, |p| GraphNode::Framework { path: p })?);
            }
            TargetDependency::Xcframework { path } => {
                edges.push(precompiled(path, |p| GraphNode::Xcframework { path: p })?);
            }
            TargetDependency::Library { path, .. } => {
                edges.push(precompiled(path, |p| GraphNode::Library { path: p })?);
            }
            TargetDependency::Sdk { name, status } => {
                edges.push(GraphNode::Sdk {
                    name: name.clone(),
                    status: *status,
                });
            }
            TargetDependency::Package { product } => {
                edges.push(GraphNode::Package {
                    product: product.clone(),
                });
            }
            TargetDependency::Cocoapods { path } => {
                edges.push(GraphNode::Cocoapods { path: path.clone() });
            }
            TargetDependency::External { name } => {
                let resolved = self
                    .dependencies
                    .external_dependencies
                    .get(name)
                    .ok_or_else(|| GraphError::UnknownExternalDependency { name: name.clone() })?
                    .clone();
                for entry in &resolved {
                    self.resolve(entry, project, projects, edges)?;
                }
            }
        }
        Ok(())
    }

    fn target_node(
        &self,
        project_path: &Path,
        name: &str,
        projects: &IndexMap<PathBuf, Project>,
    ) -> Result<GraphNode, GraphError> {
        let project = projects
            .get(project_path)
            .ok_or_else(|| GraphError::MissingProject {
                path: project_path.to_path_buf(),
            })?;
        if project.target(name).is_none() {
            return Err(GraphError::MissingTarget {
                project_path: project_path.to_path_buf(),
                name: name.to_string(),
            });
        }
        Ok(GraphNode::target(project_path, name))
    }
}

/// Project dependency paths may be relative to the declaring project.
fn resolve_project_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        paths::normalize(path)
    } else {
        paths::normalize(&base.join(path))
    }
}

/// Pre-compiled artefacts must exist on disk.
fn precompiled(
    path: &Path,
    node: impl FnOnce(PathBuf) -> GraphNode,
) -> Result<GraphNode, GraphError> {
    if !path.exists() {
        return Err(GraphError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    Ok(node(path.to_path_buf()))
}

/// DFS with an explicit visiting set over target-to-target edges.
fn detect_cycles(graph: &Graph) -> Result<(), GraphError> {
    let mut finished: IndexSet<GraphNode> = IndexSet::new();
    for node in graph.dependencies.keys() {
        let mut visiting: IndexSet<GraphNode> = IndexSet::new();
        visit(graph, node, &mut visiting, &mut finished)?;
    }
    Ok(())
}

fn visit(
    graph: &Graph,
    node: &GraphNode,
    visiting: &mut IndexSet<GraphNode>,
    finished: &mut IndexSet<GraphNode>,
) -> Result<(), GraphError> {
    if finished.contains(node) {
        return Ok(());
    }
    if !visiting.insert(node.clone()) {
        let mut names: Vec<String> = visiting
            .iter()
            .skip_while(|n| *n != node)
            .map(node_name)
            .collect();
        names.push(node_name(node));
        return Err(GraphError::CyclicDependency {
            path: names.join(" -> "),
        });
    }
    if let GraphNode::Target { project_path, name } = node {
        for edge in graph.target_dependencies(project_path, name) {
            if matches!(edge, GraphNode::Target { .. }) {
                visit(graph, edge, visiting, finished)?;
            }
        }
    }
    visiting.shift_remove(node);
    finished.insert(node.clone());
    Ok(())
}

fn node_name(node: &GraphNode) -> String {
    match node {
        GraphNode::Target { name, .. } => name.clone(),
        other => format!("{other:?}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
