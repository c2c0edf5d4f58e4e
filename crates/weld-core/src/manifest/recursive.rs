//! Recursive manifest loading.
//!
//! Follows project-to-project dependency edges from a root manifest,
//! loading each referenced project exactly once. Cycles are tolerated: the
//! cache short-circuits a path that is already loaded, so mutual project
//! references terminate without error.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    dependencies::DependenciesGraph,
    domain::TargetDependency,
    manifest::{
        loader::{ManifestError, ManifestKind, ManifestLoading},
        model::{DependencyManifest, ProjectManifest, WorkspaceManifest},
    },
    paths,
};

/// All project manifests reachable from a root, keyed by directory.
///
/// Callers must not rely on any ordering beyond "all referenced projects
/// are present".
#[derive(Debug, Clone, Default)]
pub struct LoadedProjects {
    pub projects: IndexMap<PathBuf, ProjectManifest>,
}

/// A workspace manifest plus every project it transitively references.
#[derive(Debug, Clone)]
pub struct LoadedWorkspace {
    pub path: PathBuf,
    pub workspace: WorkspaceManifest,
    pub projects: LoadedProjects,
}

/// Loads manifests by following dependency edges.
pub struct RecursiveManifestLoader<'a> {
    loader: &'a dyn ManifestLoading,
    dependencies: &'a DependenciesGraph,
}

impl<'a> RecursiveManifestLoader<'a> {
    pub fn new(loader: &'a dyn ManifestLoading, dependencies: &'a DependenciesGraph) -> Self {
        Self {
            loader,
            dependencies,
        }
    }

    /// Load the project at `root` and everything it references.
    pub fn load_project(&self, root: &Path) -> Result<LoadedProjects, ManifestError> {
        self.load_reachable(vec![paths::normalize(root)])
    }

    /// Load a workspace manifest and every project its globs select,
    /// then everything those projects reference.
    pub fn load_workspace(&self, root: &Path) -> Result<LoadedWorkspace, ManifestError> {
        let workspace = self.loader.load_workspace(root)?;

        let mut initial: Vec<PathBuf> = Vec::new();
        for pattern in &workspace.projects {
            for candidate in paths::glob(root, pattern) {
                let candidate = paths::normalize(&candidate);
                if !paths::is_folder(&candidate) {
                    continue;
                }
                if !self
                    .loader
                    .manifests_at(&candidate)
                    .contains(&ManifestKind::Project)
                {
                    debug!(path = %candidate.display(), "skipping directory without project manifest");
                    continue;
                }
                initial.push(candidate);
            }
        }

        let projects = self.load_reachable(initial)?;
        Ok(LoadedWorkspace {
            path: paths::normalize(root),
            workspace,
            projects,
        })
    }

    fn load_reachable(&self, initial: Vec<PathBuf>) -> Result<LoadedProjects, ManifestError> {
        let mut cache: IndexMap<PathBuf, ProjectManifest> = IndexMap::new();
        let mut stack = initial;

        while let Some(path) = stack.pop() {
            if cache.contains_key(&path) {
                continue;
            }
            // Synthetic projects from the external-dependencies graph have
            // no on-disk manifest; the generator merges them as models.
            if self.dependencies.external_projects.contains_key(&path) {
                continue;
            }
            let manifest = self.loader.load_project(&path)?;
            stack.extend(self.project_edges(&path, &manifest));
            cache.insert(path, manifest);
        }

        Ok(LoadedProjects { projects: cache })
    }

    /// Outgoing project directories referenced by a manifest's targets.
    fn project_edges(&self, directory: &Path, manifest: &ProjectManifest) -> Vec<PathBuf> {
        let mut edges = Vec::new();
        for target in &manifest.targets {
            for dependency in &target.dependencies {
                match dependency {
                    DependencyManifest::Project { path, .. } => {
                        edges.push(paths::normalize(&directory.join(path)));
                    }
                    DependencyManifest::External { name } => {
                        let Some(resolved) = self.dependencies.external_dependencies.get(name)
                        else {
                            debug!(name, "external dependency not present in graph");
                            continue;
                        };
                        for entry in resolved {
                            match entry {
                                TargetDependency::Project { path, .. } => {
                                    edges.push(paths::normalize(path));
                                }
                                // Binary products contribute no project.
                                TargetDependency::Xcframework { .. } => {}
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        edges
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
