//! Descriptor generation: the pure step from graph to "what the writer
//! must materialise".
//!
//! Descriptors never touch the filesystem. Side effects collected during
//! mapping ride along and are executed by the writer after every
//! descriptor has been produced.

pub mod build_settings;

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::{
    domain::{Project, Scheme, SettingsDictionary, SideEffectDescriptor, Workspace},
    graph::Graph,
};

pub use build_settings::target_build_settings;

/// A scheme plus where it belongs: shared data or the user's directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeDescriptor {
    pub scheme: Scheme,
    pub shared: bool,
}

/// Everything needed to materialise one project container.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub path: PathBuf,
    pub xcodeproj_path: PathBuf,
    pub project: Project,
    /// Merged base settings per target name.
    pub target_settings: IndexMap<String, SettingsDictionary>,
    pub schemes: Vec<SchemeDescriptor>,
    pub side_effects: Vec<SideEffectDescriptor>,
}

impl ProjectDescriptor {
    pub fn shared_schemes(&self) -> impl Iterator<Item = &SchemeDescriptor> {
        self.schemes.iter().filter(|s| s.shared)
    }

    pub fn user_schemes(&self) -> impl Iterator<Item = &SchemeDescriptor> {
        self.schemes.iter().filter(|s| !s.shared)
    }
}

/// Everything needed to materialise the workspace container.
#[derive(Debug, Clone)]
pub struct WorkspaceDescriptor {
    pub path: PathBuf,
    pub xcworkspace_path: PathBuf,
    pub workspace: Workspace,
    pub projects: Vec<ProjectDescriptor>,
    pub schemes: Vec<SchemeDescriptor>,
    pub side_effects: Vec<SideEffectDescriptor>,
}

pub struct DescriptorGenerator;

impl DescriptorGenerator {
    pub fn generate_project(&self, project: &Project, _graph: &Graph) -> ProjectDescriptor {
        let mut target_settings: IndexMap<String, SettingsDictionary> = IndexMap::new();
        for target in &project.targets {
            target_settings.insert(
                target.name.clone(),
                target_build_settings(project, target),
            );
        }
        let schemes = project
            .schemes
            .iter()
            .map(|scheme| SchemeDescriptor {
                scheme: scheme.clone(),
                shared: scheme.shared,
            })
            .collect();
        ProjectDescriptor {
            path: project.path.clone(),
            xcodeproj_path: project
                .path
                .join(format!("{}.xcodeproj", project.file_name)),
            project: project.clone(),
            target_settings,
            schemes,
            side_effects: Vec::new(),
        }
    }

    /// Generate the workspace descriptor; projects are emitted in
    /// deterministic path order, and `side_effects` is what the mapper
    /// pipelines accumulated.
    pub fn generate_workspace(
        &self,
        graph: &Graph,
        side_effects: Vec<SideEffectDescriptor>,
    ) -> WorkspaceDescriptor {
        let projects: Vec<ProjectDescriptor> = graph
            .sorted_projects()
            .into_iter()
            .map(|project| self.generate_project(project, graph))
            .collect();
        let schemes = graph
            .workspace
            .schemes
            .iter()
            .map(|scheme| SchemeDescriptor {
                scheme: scheme.clone(),
                shared: scheme.shared,
            })
            .collect();
        WorkspaceDescriptor {
            path: graph.workspace.path.clone(),
            xcworkspace_path: graph
                .workspace
                .path
                .join(format!("{}.xcworkspace", graph.workspace.name)),
            workspace: graph.workspace.clone(),
            projects,
            schemes,
            side_effects,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
