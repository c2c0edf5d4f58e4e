//! The generation pipeline.
//!
//! Fail-fast orchestration of the whole flow: config, external package
//! lowering, recursive manifest loading, conversion, graph load, mapping,
//! and descriptor generation. Nothing is written to disk here; the caller
//! hands the returned descriptor to a writer.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use crate::{
    convert::{convert_config, convert_dependencies_manifest, ManifestConverter},
    dependencies::{DependenciesGraph, DependenciesGraphGenerator},
    descriptors::{DescriptorGenerator, WorkspaceDescriptor},
    domain::{Config, Platform, Product, Project, SideEffectDescriptor, Workspace},
    error::{WeldError, WeldResult},
    graph::GraphLoader,
    manifest::{
        model::WorkspaceManifest, LoadedWorkspace, ManifestError, ManifestKind, ManifestLoading,
        RecursiveManifestLoader,
    },
    mappers::{default_graph_mappers, default_project_mappers, GraphMapping, ProjectMapping},
    paths,
    services::Services,
};

/// Directory the package manager resolves into, relative to the root.
const PACKAGES_DIRECTORY: &str = ".packages";

pub struct Generator<'a> {
    services: &'a Services,
    manifest_loader: &'a dyn ManifestLoading,
}

impl<'a> Generator<'a> {
    pub fn new(services: &'a Services, manifest_loader: &'a dyn ManifestLoading) -> Self {
        Self {
            services,
            manifest_loader,
        }
    }

    /// Run the full pipeline for the workspace or project rooted at `root`.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn generate(&self, root: &Path) -> WeldResult<WorkspaceDescriptor> {
        let root = paths::normalize(root);

        // 1. Configuration: nearest Config manifest walking up from the root.
        let config = self.load_config(&root)?;

        // 2. External dependencies, when a dependencies manifest declares them.
        let dependencies_graph = self.load_dependencies(&root, &config)?;

        // 3. Manifests, recursively.
        let loaded = self.load_manifests(&root, &dependencies_graph)?;
        info!(projects = loaded.projects.projects.len(), "manifests loaded");

        // 4. Conversion; every manifest must convert before mapping starts.
        let converter = ManifestConverter::new(self.services, &config);
        let workspace = converter.convert_workspace(&loaded)?;
        let mut projects: Vec<Project> = Vec::new();
        for (path, manifest) in &loaded.projects.projects {
            projects.push(converter.convert_project(manifest, path)?);
        }

        // 5. Synthetic external projects join the model set as-is.
        let workspace: Workspace =
            workspace.adding_projects(dependencies_graph.external_projects.keys().cloned());
        let external: Vec<Project> = dependencies_graph
            .external_projects
            .values()
            .cloned()
            .collect();

        // 6. Project mappers run before the graph is assembled so the graph
        //    validates the post-mapping shape (generated bundle targets
        //    included). External projects pass through unmapped.
        let pipeline = default_project_mappers(&config, self.services);
        let mut side_effects: Vec<SideEffectDescriptor> = Vec::new();
        let mut mapped: Vec<Project> = Vec::new();
        for project in projects {
            let (project, effects) = pipeline.map(project)?;
            side_effects.extend(effects);
            mapped.push(project);
        }
        mapped.extend(external);

        // 7. Graph load + graph mappers.
        let graph = GraphLoader::new(&dependencies_graph).load(workspace, mapped)?;
        let (graph, graph_effects) = default_graph_mappers(self.services).map(graph)?;
        side_effects.extend(graph_effects);

        // 8. Descriptors, last.
        Ok(DescriptorGenerator.generate_workspace(&graph, side_effects))
    }

    /// Walk up from `root` looking for a Config manifest; fall back to the
    /// default config at the filesystem root.
    fn load_config(&self, root: &Path) -> WeldResult<Config> {
        let mut current = Some(root.to_path_buf());
        while let Some(directory) = current {
            if self
                .manifest_loader
                .manifests_at(&directory)
                .contains(&ManifestKind::Config)
            {
                let manifest = self.manifest_loader.load_config(&directory)?;
                return Ok(convert_config(&manifest)?);
            }
            current = directory.parent().map(Path::to_path_buf);
        }
        debug!("no config manifest found, using defaults");
        Ok(Config::default())
    }

    fn load_dependencies(&self, root: &Path, _config: &Config) -> WeldResult<DependenciesGraph> {
        if !self
            .manifest_loader
            .manifests_at(root)
            .contains(&ManifestKind::Dependencies)
        {
            return Ok(DependenciesGraph::none());
        }
        let manifest = self.manifest_loader.load_dependencies(root)?;
        let (platforms, product_types): (Vec<Platform>, IndexMap<String, Product>) =
            convert_dependencies_manifest(&manifest)?;

        // Carthage runs strictly before mapping, never concurrently with it.
        if root.join("Cartfile").exists() {
            self.services.carthage.install(root, &platforms)?;
        }

        let packages_directory = root.join(PACKAGES_DIRECTORY);
        let graph = DependenciesGraphGenerator::new(self.services).generate(
            &packages_directory,
            &product_types,
            &platforms,
        )?;
        Ok(graph)
    }

    /// Load the workspace manifest at `root`, or synthesize a single-project
    /// workspace when only a project manifest is present.
    fn load_manifests(
        &self,
        root: &Path,
        dependencies_graph: &DependenciesGraph,
    ) -> WeldResult<LoadedWorkspace> {
        let recursive = RecursiveManifestLoader::new(self.manifest_loader, dependencies_graph);
        let kinds = self.manifest_loader.manifests_at(root);

        if kinds.contains(&ManifestKind::Workspace) {
            return Ok(recursive.load_workspace(root)?);
        }
        if kinds.contains(&ManifestKind::Project) {
            let projects = recursive.load_project(root)?;
            let name = projects
                .projects
                .get(&paths::normalize(root))
                .map(|manifest| manifest.name.clone())
                .unwrap_or_else(|| "Workspace".to_string());
            return Ok(LoadedWorkspace {
                path: paths::normalize(root),
                workspace: WorkspaceManifest {
                    name,
                    projects: Vec::new(),
                    additional_files: Vec::new(),
                    schemes: Vec::new(),
                },
                projects,
            });
        }
        Err(WeldError::Manifest(ManifestError::NotFound(
            root.to_path_buf(),
        )))
    }
}

/// Port the CLI hands the finished descriptor to.
pub trait DescriptorWriting: Send + Sync {
    /// Materialise the workspace. With `project_only`, the workspace
    /// container itself is skipped and only projects are written.
    fn write_workspace(
        &self,
        descriptor: &WorkspaceDescriptor,
        project_only: bool,
    ) -> WeldResult<()>;
}
