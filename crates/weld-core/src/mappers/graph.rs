//! Whole-graph mappers: cache-hit pruning and automation-scheme injection.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    domain::{
        BuildAction, Scheme, SideEffectDescriptor, Target, TargetDependency, TargetReference,
        TestAction,
    },
    error::WeldResult,
    graph::{Graph, GraphNode},
    mappers::GraphMapping,
    services::ArtifactCaching,
};

// ── Cache-hit pruning ─────────────────────────────────────────────────────────

/// Replaces targets whose fingerprint matches a cached artefact with the
/// pre-built XCFramework, rewriting every edge that pointed at them.
pub struct CacheHitPruningGraphMapper {
    cache: Arc<dyn ArtifactCaching>,
}

impl CacheHitPruningGraphMapper {
    pub fn new(cache: Arc<dyn ArtifactCaching>) -> Self {
        Self { cache }
    }
}

/// Content fingerprint of a target: identity plus its source list.
pub fn target_fingerprint(target: &Target) -> String {
    let mut hasher = Sha256::new();
    hasher.update(target.name.as_bytes());
    hasher.update(target.platform.as_str().as_bytes());
    hasher.update(target.product.as_str().as_bytes());
    let mut sources = target.sources.clone();
    sources.sort();
    for source in sources {
        hasher.update(source.to_string_lossy().as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

impl GraphMapping for CacheHitPruningGraphMapper {
    fn map(&self, mut graph: Graph) -> WeldResult<(Graph, Vec<SideEffectDescriptor>)> {
        let mut replacements: IndexMap<(PathBuf, String), PathBuf> = IndexMap::new();
        for project in graph.projects.values() {
            for target in &project.targets {
                let fingerprint = target_fingerprint(target);
                if let Some(artifact) = self.cache.cached_xcframework(&fingerprint) {
                    debug!(target = %target.name, artifact = %artifact.display(), "cache hit");
                    replacements.insert((project.path.clone(), target.name.clone()), artifact);
                }
            }
        }
        if replacements.is_empty() {
            return Ok((graph, Vec::new()));
        }

        for project in graph.projects.values_mut() {
            let project_path = project.path.clone();
            project
                .targets
                .retain(|t| !replacements.contains_key(&(project_path.clone(), t.name.clone())));
            for target in &mut project.targets {
                for dependency in &mut target.dependencies {
                    let replacement = match dependency {
                        TargetDependency::Target { name } => {
                            replacements.get(&(project_path.clone(), name.clone()))
                        }
                        TargetDependency::Project { target, path } => {
                            replacements.get(&(path.clone(), target.clone()))
                        }
                        _ => None,
                    };
                    if let Some(artifact) = replacement {
                        *dependency = TargetDependency::Xcframework {
                            path: artifact.clone(),
                        };
                    }
                }
            }
            // Schemes must not reference targets that no longer exist.
            for scheme in &mut project.schemes {
                prune_scheme(scheme, &replacements);
            }
        }

        let mut dependencies: IndexMap<GraphNode, Vec<GraphNode>> = IndexMap::new();
        for (node, edges) in graph.dependencies {
            let GraphNode::Target { project_path, name } = &node else {
                dependencies.insert(node, edges);
                continue;
            };
            if replacements.contains_key(&(project_path.clone(), name.clone())) {
                continue;
            }
            let rewritten = edges
                .into_iter()
                .map(|edge| {
                    if let GraphNode::Target { project_path, name } = &edge {
                        if let Some(artifact) =
                            replacements.get(&(project_path.clone(), name.clone()))
                        {
                            return GraphNode::Xcframework {
                                path: artifact.clone(),
                            };
                        }
                    }
                    edge
                })
                .collect();
            dependencies.insert(node, rewritten);
        }
        graph.dependencies = dependencies;

        Ok((graph, Vec::new()))
    }
}

fn prune_scheme(scheme: &mut Scheme, replacements: &IndexMap<(PathBuf, String), PathBuf>) {
    let pruned = |reference: &TargetReference| {
        replacements.contains_key(&(reference.project_path.clone(), reference.name.clone()))
    };
    if let Some(build) = &mut scheme.build_action {
        build.targets.retain(|r| !pruned(r));
    }
    if let Some(test) = &mut scheme.test_action {
        test.targets.retain(|r| !pruned(r));
        test.code_coverage_targets.retain(|r| !pruned(r));
    }
    if let Some(run) = &mut scheme.run_action {
        if run.executable.as_ref().is_some_and(|r| pruned(r)) {
            run.executable = None;
        }
    }
}

// ── Automation scheme ─────────────────────────────────────────────────────────

/// Injects a `<Workspace>-Project` scheme enumerating every target and
/// test target, for scripted building and testing.
pub struct AutomationSchemeGraphMapper;

impl GraphMapping for AutomationSchemeGraphMapper {
    fn map(&self, mut graph: Graph) -> WeldResult<(Graph, Vec<SideEffectDescriptor>)> {
        let name = format!("{}-Project", graph.workspace.name);
        if graph.workspace.schemes.iter().any(|s| s.name == name) {
            return Ok((graph, Vec::new()));
        }

        let mut build_targets: Vec<TargetReference> = Vec::new();
        let mut test_targets: Vec<TargetReference> = Vec::new();
        for project in graph.sorted_projects() {
            let mut targets: Vec<&Target> = project.targets.iter().collect();
            targets.sort_by(|a, b| a.name.cmp(&b.name));
            for target in targets {
                let reference = TargetReference::new(&project.path, &target.name);
                if target.product.is_tests() {
                    test_targets.push(reference.clone());
                }
                build_targets.push(reference);
            }
        }

        let mut scheme = Scheme::new(name);
        scheme.build_action = Some(BuildAction::new(build_targets));
        scheme.test_action = Some(TestAction {
            targets: test_targets,
            build_configuration: "Debug".to_string(),
            coverage: false,
            code_coverage_targets: Vec::new(),
            arguments: None,
            diagnostics_options: Vec::new(),
        });
        graph.workspace.schemes.push(scheme);

        Ok((graph, Vec::new()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dependencies::DependenciesGraph,
        domain::{Platform, Product, Project, Workspace},
        graph::GraphLoader,
    };
    use std::path::Path;

    fn graph_with(projects: Vec<Project>) -> Graph {
        let workspace = Workspace::new(
            "/ws",
            "WS",
            projects.iter().map(|p| p.path.clone()),
        );
        GraphLoader::new(&DependenciesGraph::none())
            .load(workspace, projects)
            .unwrap()
    }

    fn project_with(path: &str, targets: Vec<Target>) -> Project {
        let name = Path::new(path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        let mut project = Project::new(path, name);
        project.targets = targets;
        project
    }

    #[test]
    fn automation_scheme_lists_all_targets_and_test_targets() {
        let graph = graph_with(vec![
            project_with(
                "/ws/App",
                vec![
                    Target::new("App", Platform::Ios, Product::App),
                    Target::new("AppTests", Platform::Ios, Product::UnitTests),
                ],
            ),
            project_with(
                "/ws/Kit",
                vec![Target::new("Kit", Platform::Ios, Product::Framework)],
            ),
        ]);
        let (mapped, _) = AutomationSchemeGraphMapper.map(graph).unwrap();

        let scheme = mapped
            .workspace
            .schemes
            .iter()
            .find(|s| s.name == "WS-Project")
            .unwrap();
        let build: Vec<_> = scheme
            .build_action
            .as_ref()
            .unwrap()
            .targets
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(build, vec!["App", "AppTests", "Kit"]);
        let tests: Vec<_> = scheme
            .test_action
            .as_ref()
            .unwrap()
            .targets
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(tests, vec!["AppTests"]);
    }

    #[test]
    fn automation_scheme_is_not_duplicated() {
        let graph = graph_with(vec![project_with(
            "/ws/App",
            vec![Target::new("App", Platform::Ios, Product::App)],
        )]);
        let (once, _) = AutomationSchemeGraphMapper.map(graph).unwrap();
        let (twice, _) = AutomationSchemeGraphMapper.map(once).unwrap();
        let count = twice
            .workspace
            .schemes
            .iter()
            .filter(|s| s.name == "WS-Project")
            .count();
        assert_eq!(count, 1);
    }

    struct SingleHitCache {
        fingerprint: String,
        artifact: PathBuf,
    }

    impl ArtifactCaching for SingleHitCache {
        fn cached_xcframework(&self, fingerprint: &str) -> Option<PathBuf> {
            (fingerprint == self.fingerprint).then(|| self.artifact.clone())
        }
    }

    #[test]
    fn cache_hits_replace_targets_with_xcframework_edges() {
        let kit = Target::new("Kit", Platform::Ios, Product::Framework);
        let mut app = Target::new("App", Platform::Ios, Product::App);
        app.dependencies = vec![TargetDependency::target("Kit")];
        let graph = graph_with(vec![project_with("/ws/P", vec![app, kit.clone()])]);

        let cache = SingleHitCache {
            fingerprint: target_fingerprint(&kit),
            artifact: PathBuf::from("/cache/Kit.xcframework"),
        };
        let (mapped, _) = CacheHitPruningGraphMapper::new(Arc::new(cache))
            .map(graph)
            .unwrap();

        let project = mapped.project(Path::new("/ws/P")).unwrap();
        assert!(project.target("Kit").is_none());
        assert_eq!(
            project.target("App").unwrap().dependencies,
            vec![TargetDependency::Xcframework {
                path: PathBuf::from("/cache/Kit.xcframework"),
            }]
        );
        assert_eq!(
            mapped.target_dependencies(Path::new("/ws/P"), "App"),
            &[GraphNode::Xcframework {
                path: PathBuf::from("/cache/Kit.xcframework"),
            }]
        );
    }

    #[test]
    fn without_cache_hits_the_graph_is_unchanged() {
        let graph = graph_with(vec![project_with(
            "/ws/P",
            vec![Target::new("App", Platform::Ios, Product::App)],
        )]);
        let before = graph.projects.clone();
        let (mapped, _) = CacheHitPruningGraphMapper::new(Arc::new(crate::services::NoCache))
            .map(graph)
            .unwrap();
        assert_eq!(mapped.projects, before);
    }
}
