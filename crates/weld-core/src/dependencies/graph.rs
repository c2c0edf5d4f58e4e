//! The lowered external-dependencies graph.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::domain::{Project, TargetDependency};

/// External packages lowered into the project model.
///
/// `external_dependencies` maps a product name to the dependency edges a
/// target gains by declaring `external(name)`. `external_projects` holds
/// the synthetic projects, keyed by package folder.
#[derive(Debug, Clone, Default)]
pub struct DependenciesGraph {
    pub external_dependencies: IndexMap<String, Vec<TargetDependency>>,
    pub external_projects: IndexMap<PathBuf, Project>,
}

impl DependenciesGraph {
    /// The empty graph, for workspaces without package dependencies.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.external_dependencies.is_empty() && self.external_projects.is_empty()
    }
}
