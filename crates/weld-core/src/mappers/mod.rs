//! The mapper pipelines.
//!
//! Project mappers transform one project at a time and run in a fixed
//! order; graph mappers run afterwards over the whole graph. Every mapper
//! is pure: it returns a new value plus the side effects the writer must
//! execute once all mapping has succeeded.

pub mod auto_schemes;
pub mod derived_data;
pub mod graph;
pub mod info_plist;
pub mod naming;
pub mod resources_bundle;
pub mod signing;
pub mod synthesized_accessors;

use crate::{
    domain::{Config, Project, SideEffectDescriptor},
    error::WeldResult,
    graph::Graph,
    services::Services,
};

pub use auto_schemes::AutogeneratedSchemesProjectMapper;
pub use derived_data::DeleteDerivedDirectoryProjectMapper;
pub use graph::{AutomationSchemeGraphMapper, CacheHitPruningGraphMapper};
pub use info_plist::GenerateInfoPlistProjectMapper;
pub use naming::ProjectNameAndOrganizationMapper;
pub use resources_bundle::ResourcesProjectMapper;
pub use signing::SigningMapper;
pub use synthesized_accessors::SynthesizedResourceInterfaceProjectMapper;

/// A transform over one project.
pub trait ProjectMapping: Send + Sync {
    fn map(&self, project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)>;
}

/// A transform over the whole graph.
pub trait GraphMapping: Send + Sync {
    fn map(&self, graph: Graph) -> WeldResult<(Graph, Vec<SideEffectDescriptor>)>;
}

/// Runs project mappers in declaration order, concatenating side effects.
pub struct SequentialProjectMapper {
    mappers: Vec<Box<dyn ProjectMapping>>,
}

impl SequentialProjectMapper {
    pub fn new(mappers: Vec<Box<dyn ProjectMapping>>) -> Self {
        Self { mappers }
    }
}

impl ProjectMapping for SequentialProjectMapper {
    fn map(&self, project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let mut project = project;
        let mut side_effects = Vec::new();
        for mapper in &self.mappers {
            let (mapped, effects) = mapper.map(project)?;
            project = mapped;
            side_effects.extend(effects);
        }
        Ok((project, side_effects))
    }
}

/// Runs graph mappers in declaration order, concatenating side effects.
pub struct SequentialGraphMapper {
    mappers: Vec<Box<dyn GraphMapping>>,
}

impl SequentialGraphMapper {
    pub fn new(mappers: Vec<Box<dyn GraphMapping>>) -> Self {
        Self { mappers }
    }
}

impl GraphMapping for SequentialGraphMapper {
    fn map(&self, graph: Graph) -> WeldResult<(Graph, Vec<SideEffectDescriptor>)> {
        let mut graph = graph;
        let mut side_effects = Vec::new();
        for mapper in &self.mappers {
            let (mapped, effects) = mapper.map(graph)?;
            graph = mapped;
            side_effects.extend(effects);
        }
        Ok((graph, side_effects))
    }
}

/// The stock project pipeline. Order matters: auto-schemes must see
/// user-declared schemes before naming rewrites the display name, and the
/// derived-directory delete must precede every mapper that writes into it.
pub fn default_project_mappers(config: &Config, services: &Services) -> SequentialProjectMapper {
    let mut mappers: Vec<Box<dyn ProjectMapping>> = Vec::new();
    if !config.autogenerated_schemes_disabled() {
        mappers.push(Box::new(AutogeneratedSchemesProjectMapper::new(
            config.code_coverage_enabled(),
        )));
    }
    mappers.push(Box::new(DeleteDerivedDirectoryProjectMapper));
    mappers.push(Box::new(ResourcesProjectMapper));
    mappers.push(Box::new(GenerateInfoPlistProjectMapper::new(
        services.info_plist_content.clone(),
    )));
    if !config.synthesized_resource_accessors_disabled() {
        mappers.push(Box::new(SynthesizedResourceInterfaceProjectMapper));
    }
    mappers.push(Box::new(ProjectNameAndOrganizationMapper::new(config)));
    mappers.push(Box::new(SigningMapper));
    SequentialProjectMapper::new(mappers)
}

/// The stock graph pipeline: cache-hit pruning, then automation-scheme
/// injection.
pub fn default_graph_mappers(services: &Services) -> SequentialGraphMapper {
    SequentialGraphMapper::new(vec![
        Box::new(CacheHitPruningGraphMapper::new(
            services.artifact_cache.clone(),
        )),
        Box::new(AutomationSchemeGraphMapper),
    ])
}
