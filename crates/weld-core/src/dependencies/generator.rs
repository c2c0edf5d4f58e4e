//! Lowering a resolved package workspace into the project model.
//!
//! For every package in the workspace state, a synthetic [`Project`] is
//! synthesized whose targets mirror the package's regular targets. Linker
//! settings become SDK dependency edges rather than build settings, and
//! binary targets resolve to the pre-built XCFramework under `artifacts/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::{
    dependencies::{
        graph::DependenciesGraph,
        package_info::{
            PackageInfo, PackageLibraryKind, PackageProductType, PackageSettingName,
            PackageSettingTool, PackageTarget, PackageTargetDependency, PackageTargetKind,
        },
        DependenciesError,
    },
    domain::{
        DeploymentTarget, Platform, Product, Project, ResourceFileElement, SdkStatus,
        SettingValue, Settings, SettingsDictionary, Target, TargetDependency,
    },
    paths,
    services::Services,
};

/// One resolved package: name, on-disk folder, and decoded description.
struct ResolvedPackage {
    name: String,
    folder: PathBuf,
    info: PackageInfo,
}

/// Generates a [`DependenciesGraph`] from a package workspace directory.
pub struct DependenciesGraphGenerator<'a> {
    services: &'a Services,
}

impl<'a> DependenciesGraphGenerator<'a> {
    pub fn new(services: &'a Services) -> Self {
        Self { services }
    }

    /// Lower the package workspace at `directory`.
    ///
    /// `product_types` overrides the derived product per package target
    /// name; `platforms` is the user-configured platform set.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub fn generate(
        &self,
        directory: &Path,
        product_types: &IndexMap<String, Product>,
        platforms: &[Platform],
    ) -> Result<DependenciesGraph, DependenciesError> {
        let state = self.services.package_loader.load_workspace_state(directory)?;

        let mut packages: Vec<ResolvedPackage> = Vec::new();
        for dependency in &state.object.dependencies {
            let package_ref = &dependency.package_ref;
            let folder = match package_ref.kind.as_str() {
                "remote" => directory.join("checkouts").join(&package_ref.name),
                "local" => PathBuf::from(package_ref.local_path().unwrap_or_default()),
                other => {
                    return Err(DependenciesError::UnsupportedDependencyKind(
                        other.to_string(),
                    ))
                }
            };
            let info = self.services.package_loader.load_package_info(&folder)?;
            packages.push(ResolvedPackage {
                name: package_ref.name.clone(),
                folder,
                info,
            });
        }

        let product_to_package = self.product_to_package(&packages);
        let target_to_framework = target_to_framework(directory, &packages);

        let mut graph = DependenciesGraph::none();
        for package in &packages {
            let project = self.synthesize_project(
                package,
                &packages,
                &product_to_package,
                &target_to_framework,
                product_types,
                platforms,
            )?;

            for product in &package.info.products {
                if !matches!(product.product_type, PackageProductType::Library { .. }) {
                    continue;
                }
                let mut edges: Vec<TargetDependency> = Vec::new();
                for target_name in &product.targets {
                    if let Some(framework) = target_to_framework.get(target_name) {
                        edges.push(TargetDependency::Xcframework {
                            path: framework.clone(),
                        });
                    } else {
                        edges.push(TargetDependency::Project {
                            target: target_name.clone(),
                            path: package.folder.clone(),
                        });
                    }
                }
                graph
                    .external_dependencies
                    .insert(product.name.clone(), edges);
            }

            if !project.targets.is_empty() {
                graph.external_projects.insert(package.folder.clone(), project);
            }
        }

        Ok(graph)
    }

    /// Product-name → package-name table, last writer wins.
    fn product_to_package(&self, packages: &[ResolvedPackage]) -> IndexMap<String, String> {
        let mut table: IndexMap<String, String> = IndexMap::new();
        for package in packages {
            for product in &package.info.products {
                if let Some(previous) =
                    table.insert(product.name.clone(), package.name.clone())
                {
                    if previous != package.name {
                        self.services.reporter.warning(&format!(
                            "Product '{}' is declared by both '{}' and '{}'; '{}' wins",
                            product.name, previous, package.name, package.name
                        ));
                    }
                }
            }
        }
        table
    }

    fn synthesize_project(
        &self,
        package: &ResolvedPackage,
        packages: &[ResolvedPackage],
        product_to_package: &IndexMap<String, String>,
        target_to_framework: &IndexMap<String, PathBuf>,
        product_types: &IndexMap<String, Product>,
        platforms: &[Platform],
    ) -> Result<Project, DependenciesError> {
        let mut project = Project::new(&package.folder, &package.name);
        project.resource_synthesizers = Vec::new();

        for target in &package.info.targets {
            if target.kind != PackageTargetKind::Regular {
                debug!(
                    target = %target.name,
                    kind = ?target.kind,
                    "ignoring non-regular package target"
                );
                continue;
            }
            project.targets.push(self.synthesize_target(
                package,
                target,
                packages,
                product_to_package,
                target_to_framework,
                product_types,
                platforms,
            )?);
        }

        Ok(project)
    }

    #[allow(clippy::too_many_arguments)]
    fn synthesize_target(
        &self,
        package: &ResolvedPackage,
        target: &PackageTarget,
        packages: &[ResolvedPackage],
        product_to_package: &IndexMap<String, String>,
        target_to_framework: &IndexMap<String, PathBuf>,
        product_types: &IndexMap<String, Product>,
        platforms: &[Platform],
    ) -> Result<Target, DependenciesError> {
        let (platform, deployment_target) =
            choose_platform(&package.name, &package.info, platforms)?;
        let product = derive_product(&target.name, &package.info, product_types);

        let mut model = Target::new(&target.name, platform, product);
        model.bundle_id = format!("org.weld.external.{}", target.name);
        model.deployment_target = deployment_target;

        let target_dir = target_directory(&package.folder, target);
        model.sources = expand_sources(&target_dir, target);
        model.resources = expand_resources(&target_dir, target);

        let mut dependencies = self.lower_dependencies(
            package,
            target,
            packages,
            product_to_package,
            target_to_framework,
        )?;
        let settings = lower_settings(target, &mut dependencies)?;
        model.dependencies = dependencies;
        model.settings = settings;

        Ok(model)
    }

    /// Flatten a package target's dependency list into model edges.
    fn lower_dependencies(
        &self,
        package: &ResolvedPackage,
        target: &PackageTarget,
        packages: &[ResolvedPackage],
        product_to_package: &IndexMap<String, String>,
        target_to_framework: &IndexMap<String, PathBuf>,
    ) -> Result<Vec<TargetDependency>, DependenciesError> {
        let mut edges: Vec<TargetDependency> = Vec::new();
        for dependency in &target.dependencies {
            match dependency {
                PackageTargetDependency::Target { name } => {
                    edges.push(local_target_edge(name, target_to_framework));
                }
                PackageTargetDependency::Product { name, package: declared } => {
                    let owner = declared
                        .clone()
                        .or_else(|| product_to_package.get(name).cloned())
                        .ok_or_else(|| DependenciesError::UnknownProductDependency {
                            product: name.clone(),
                            package: package.name.clone(),
                        })?;
                    edges.extend(product_edges(name, &owner, packages)?);
                }
                PackageTargetDependency::ByName { name } => {
                    if package.info.target(name).is_some() {
                        edges.push(local_target_edge(name, target_to_framework));
                    } else if let Some(owner) = product_to_package.get(name) {
                        edges.extend(product_edges(name, owner, packages)?);
                    } else {
                        return Err(DependenciesError::UnknownByNameDependency(name.clone()));
                    }
                }
            }
        }
        Ok(edges)
    }
}

/// A dependency on a target of the current package: binary targets point
/// at their pre-built framework, source targets at the target itself.
fn local_target_edge(
    name: &str,
    target_to_framework: &IndexMap<String, PathBuf>,
) -> TargetDependency {
    match target_to_framework.get(name) {
        Some(framework) => TargetDependency::Xcframework {
            path: framework.clone(),
        },
        None => TargetDependency::Target {
            name: name.to_string(),
        },
    }
}

/// Expand a product dependency into project edges onto its targets.
fn product_edges(
    product: &str,
    owner: &str,
    packages: &[ResolvedPackage],
) -> Result<Vec<TargetDependency>, DependenciesError> {
    let package = packages
        .iter()
        .find(|p| p.name == owner)
        .ok_or_else(|| DependenciesError::UnknownProductDependency {
            product: product.to_string(),
            package: owner.to_string(),
        })?;
    let declared =
        package
            .info
            .product(product)
            .ok_or_else(|| DependenciesError::UnknownProductDependency {
                product: product.to_string(),
                package: owner.to_string(),
            })?;
    Ok(declared
        .targets
        .iter()
        .map(|target| TargetDependency::Project {
            target: target.clone(),
            path: PathBuf::from(format!("../{owner}")),
        })
        .collect())
}

/// Intersect configured and declared platforms, preferring iOS.
fn choose_platform(
    package: &str,
    info: &PackageInfo,
    configured: &[Platform],
) -> Result<(Platform, Option<DeploymentTarget>), DependenciesError> {
    let mut declared: Vec<Platform> = Vec::new();
    for platform in &info.platforms {
        declared.push(platform.platform_name.parse().map_err(|_| {
            DependenciesError::UnknownPlatform {
                name: platform.platform_name.clone(),
            }
        })?);
    }
    let candidates: Vec<Platform> = if declared.is_empty() {
        Platform::ALL.to_vec()
    } else {
        declared.clone()
    };

    // Deterministic: walk the canonical platform order.
    let intersection: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|p| configured.contains(p) && candidates.contains(p))
        .collect();

    let platform = if intersection.contains(&Platform::Ios) {
        Platform::Ios
    } else {
        *intersection
            .first()
            .ok_or_else(|| DependenciesError::NoSupportedPlatforms {
                package: package.to_string(),
                configured: configured.to_vec(),
                declared: declared.clone(),
            })?
    };

    let deployment_target = if info.platforms.is_empty() {
        None
    } else {
        info.platforms
            .iter()
            .find(|p| p.platform_name.parse::<Platform>() == Ok(platform))
            .map(|p| DeploymentTarget::for_platform(platform, p.version.clone()))
    };

    Ok((platform, deployment_target))
}

/// The target's product: user override first, then the product that vends
/// the target, defaulting to a static framework.
fn derive_product(
    target: &str,
    info: &PackageInfo,
    product_types: &IndexMap<String, Product>,
) -> Product {
    if let Some(product) = product_types.get(target) {
        return *product;
    }
    for product in &info.products {
        if !product.targets.iter().any(|t| t == target) {
            continue;
        }
        match product.product_type {
            PackageProductType::Library {
                linking: PackageLibraryKind::Static | PackageLibraryKind::Automatic,
            } => return Product::StaticFramework,
            PackageProductType::Library {
                linking: PackageLibraryKind::Dynamic,
            } => return Product::Framework,
            // Non-library products do not determine the target's product.
            PackageProductType::Executable
            | PackageProductType::Plugin
            | PackageProductType::Test => continue,
        }
    }
    Product::StaticFramework
}

fn target_directory(folder: &Path, target: &PackageTarget) -> PathBuf {
    match &target.path {
        Some(path) => folder.join(path),
        None => folder.join("Sources").join(&target.name),
    }
}

fn expand_sources(target_dir: &Path, target: &PackageTarget) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match &target.sources {
        None => paths::glob(target_dir, "**"),
        Some(declared) => declared
            .iter()
            .flat_map(|entry| {
                let resolved = target_dir.join(entry);
                if paths::is_folder(&resolved) {
                    paths::glob(target_dir, &format!("{entry}/**"))
                } else {
                    vec![resolved]
                }
            })
            .collect(),
    };
    files.retain(|path| !paths::is_folder(path));
    for exclude in &target.exclude {
        let prefix = target_dir.join(exclude);
        files.retain(|path| !path.starts_with(&prefix));
    }
    files
}

fn expand_resources(target_dir: &Path, target: &PackageTarget) -> Vec<ResourceFileElement> {
    let mut resources: Vec<ResourceFileElement> = Vec::new();
    for resource in &target.resources {
        let resolved = target_dir.join(&resource.path);
        if resolved.extension().is_none() {
            resources.extend(
                paths::glob(&resolved, "**")
                    .into_iter()
                    .filter(|p| !paths::is_folder(p))
                    .map(ResourceFileElement::File),
            );
        } else {
            resources.push(ResourceFileElement::File(resolved));
        }
    }
    resources
}

/// Lower package build settings into grouped build-setting entries, turning
/// linker settings into SDK dependency edges.
fn lower_settings(
    target: &PackageTarget,
    dependencies: &mut Vec<TargetDependency>,
) -> Result<Option<Settings>, DependenciesError> {
    let mut header_search_paths: Vec<String> = Vec::new();
    let mut defines: BTreeMap<String, String> = BTreeMap::new();
    let mut c_flags: Vec<String> = Vec::new();
    let mut cxx_flags: Vec<String> = Vec::new();
    let mut swift_conditions: Vec<String> = Vec::new();
    let mut swift_flags: Vec<String> = Vec::new();

    for setting in &target.settings {
        let first = setting.value.first().cloned().unwrap_or_default();
        match (setting.tool, setting.name) {
            (
                PackageSettingTool::C | PackageSettingTool::Cxx,
                PackageSettingName::HeaderSearchPath,
            ) => header_search_paths.push(first),
            (PackageSettingTool::C | PackageSettingTool::Cxx, PackageSettingName::Define) => {
                let (name, value) = split_define(&first);
                defines.insert(name, value);
            }
            (PackageSettingTool::C, PackageSettingName::UnsafeFlags) => {
                c_flags.extend(setting.value.iter().cloned());
            }
            (PackageSettingTool::Cxx, PackageSettingName::UnsafeFlags) => {
                cxx_flags.extend(setting.value.iter().cloned());
            }
            (PackageSettingTool::Swift, PackageSettingName::Define) => {
                swift_conditions.push(first);
            }
            (PackageSettingTool::Swift, PackageSettingName::UnsafeFlags) => {
                swift_flags.extend(setting.value.iter().cloned());
            }
            (PackageSettingTool::Linker, PackageSettingName::LinkedFramework) => {
                dependencies.push(TargetDependency::sdk(
                    format!("{first}.framework"),
                    SdkStatus::Required,
                ));
            }
            (PackageSettingTool::Linker, PackageSettingName::LinkedLibrary) => {
                dependencies.push(TargetDependency::sdk(
                    format!("{first}.tbd"),
                    SdkStatus::Required,
                ));
            }
            (tool, name) => {
                return Err(DependenciesError::UnsupportedSetting {
                    tool: tool.as_str().to_string(),
                    name: name.as_str().to_string(),
                })
            }
        }
    }

    let mut base: SettingsDictionary = IndexMap::new();
    if !header_search_paths.is_empty() {
        base.insert(
            "HEADER_SEARCH_PATHS".to_string(),
            SettingValue::Array(header_search_paths),
        );
    }
    if !defines.is_empty() {
        base.insert(
            "GCC_PREPROCESSOR_DEFINITIONS".to_string(),
            SettingValue::Array(
                defines
                    .into_iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect(),
            ),
        );
    }
    if !c_flags.is_empty() {
        base.insert("OTHER_CFLAGS".to_string(), SettingValue::Array(c_flags));
    }
    if !cxx_flags.is_empty() {
        base.insert(
            "OTHER_CPLUSPLUSFLAGS".to_string(),
            SettingValue::Array(cxx_flags),
        );
    }
    if !swift_conditions.is_empty() {
        base.insert(
            "SWIFT_ACTIVE_COMPILATION_CONDITIONS".to_string(),
            SettingValue::Array(swift_conditions),
        );
    }
    if !swift_flags.is_empty() {
        base.insert(
            "OTHER_SWIFT_FLAGS".to_string(),
            SettingValue::Array(swift_flags),
        );
    }

    if base.is_empty() {
        return Ok(None);
    }
    let mut settings = Settings::default_configurations();
    settings.base = base;
    Ok(Some(settings))
}

/// `NAME=VALUE` with `VALUE` defaulting to `1` when no `=` is present.
fn split_define(raw: &str) -> (String, String) {
    match raw.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (raw.to_string(), "1".to_string()),
    }
}

fn target_to_framework(
    directory: &Path,
    packages: &[ResolvedPackage],
) -> IndexMap<String, PathBuf> {
    let artifacts = directory.join("artifacts");
    let mut table: IndexMap<String, PathBuf> = IndexMap::new();
    for package in packages {
        for target in &package.info.targets {
            if target.kind == PackageTargetKind::Binary {
                table.insert(
                    target.name.clone(),
                    artifacts
                        .join(&package.name)
                        .join(format!("{}.xcframework", target.name)),
                );
            }
        }
    }
    table
}

// ── Tests ─────────────────────────────────────────────────────────────────────
