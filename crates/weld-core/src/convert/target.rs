//! Target manifest lowering: platform/product validation, glob expansion,
//! and dependency conversion.

use std::path::{Path, PathBuf};

use crate::{
    convert::{settings::convert_target_settings, ConversionError},
    domain::{
        ActionOrder, CoreDataModel, DeploymentTarget, Device, DomainError, Headers, InfoPlist,
        LaunchArgument, Platform, ResourceFileElement, SdkStatus, Target, TargetAction,
        TargetDependency,
    },
    manifest::model::{
        DependencyManifest, DeploymentTargetManifest, GlobList, InfoPlistManifest,
        ResourceElementManifest, TargetManifest,
    },
    paths,
    services::Reporter,
};

const HEADER_EXTENSIONS: [&str; 4] = ["h", "hh", "hpp", "ipp"];

pub fn convert_target(
    manifest: &TargetManifest,
    directory: &Path,
    config: &crate::domain::Config,
    reporter: &dyn Reporter,
) -> Result<Target, ConversionError> {
    let platform = convert_platform(&manifest.platform)?;
    let product = manifest.product.parse().map_err(ConversionError::Domain)?;

    let mut target = Target::new(&manifest.name, platform, product);
    target.bundle_id = manifest.bundle_id.clone();
    target.deployment_target = manifest
        .deployment_target
        .as_ref()
        .map(|dt| convert_deployment_target(dt))
        .transpose()?;

    target.info_plist = manifest.info_plist.as_ref().map(|plist| match plist {
        InfoPlistManifest::File(path) => {
            InfoPlist::File(paths::normalize(&directory.join(path)))
        }
        InfoPlistManifest::Dictionary(extra) => InfoPlist::Dictionary(extra.clone()),
    });
    target.entitlements = manifest
        .entitlements
        .as_ref()
        .map(|path| paths::normalize(&directory.join(path)));

    target.sources = convert_sources(&manifest.sources, directory, reporter)?;
    target.resources = convert_resources(&manifest.resources, directory, reporter);
    target.headers = manifest
        .headers
        .as_ref()
        .map(|headers| Headers {
            public: header_files(headers.public.as_ref(), directory),
            private: header_files(headers.private.as_ref(), directory),
            project: header_files(headers.project.as_ref(), directory),
        });

    target.dependencies = manifest
        .dependencies
        .iter()
        .map(|dependency| convert_dependency(dependency, directory))
        .collect::<Result<_, _>>()?;

    target.settings = convert_target_settings(manifest.settings.as_ref(), directory)?;
    target.environment = manifest.environment.clone();
    target.launch_arguments = manifest
        .launch_arguments
        .iter()
        .map(|arg| LaunchArgument {
            name: arg.name.clone(),
            enabled: arg.enabled,
        })
        .collect();
    target.core_data_models = manifest
        .core_data_models
        .iter()
        .map(|model| CoreDataModel {
            path: paths::normalize(&directory.join(&model.path)),
            current_version: model.current_version.clone(),
        })
        .collect();

    let show_env_default = !config
        .generation_options()
        .iter()
        .any(|o| matches!(o, crate::domain::GenerationOption::DisableShowEnvironmentVarsInScriptPhases));
    target.actions = manifest
        .actions
        .iter()
        .map(|action| {
            let order = match action.order.as_str() {
                "pre" => Ok(ActionOrder::Pre),
                "post" => Ok(ActionOrder::Post),
                other => Err(DomainError::InvalidValue {
                    reason: format!("unknown action order '{other}'"),
                }),
            }?;
            Ok(TargetAction {
                name: action.name.clone(),
                order,
                script: action.script.clone(),
                show_environment_vars: action.show_environment_vars.unwrap_or(show_env_default),
            })
        })
        .collect::<Result<_, ConversionError>>()?;

    Ok(target)
}

/// watchOS manifests are rejected until the platform is fully supported;
/// the model keeps the variant for host-app scheme rules.
fn convert_platform(raw: &str) -> Result<Platform, ConversionError> {
    let platform: Platform = raw.parse().map_err(ConversionError::Domain)?;
    if platform == Platform::Watchos {
        return Err(ConversionError::FeatureNotYetSupported {
            description: "watchOS platform".to_string(),
        });
    }
    Ok(platform)
}

fn convert_deployment_target(
    manifest: &DeploymentTargetManifest,
) -> Result<DeploymentTarget, ConversionError> {
    let platform: Platform = manifest.platform.parse().map_err(ConversionError::Domain)?;
    if manifest.devices.is_empty() || platform != Platform::Ios {
        return Ok(DeploymentTarget::for_platform(platform, &manifest.version));
    }
    let devices = manifest
        .devices
        .iter()
        .map(|device| match device.as_str() {
            "iphone" => Ok(Device::Iphone),
            "ipad" => Ok(Device::Ipad),
            "mac" => Ok(Device::Mac),
            other => Err(DomainError::InvalidValue {
                reason: format!("unknown device '{other}'"),
            }),
        })
        .collect::<Result<_, _>>()?;
    Ok(DeploymentTarget::Ios {
        version: manifest.version.clone(),
        devices,
    })
}

/// Source globs go through the throwing variant: a missing root directory
/// aborts the run, an empty match only warns.
fn convert_sources(
    globs: &[String],
    directory: &Path,
    reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>, ConversionError> {
    let mut sources = Vec::new();
    for pattern in globs {
        let matches = paths::throwing_glob(directory, pattern)?;
        let files: Vec<PathBuf> = matches
            .into_iter()
            .filter(|path| !paths::is_folder(path))
            .collect();
        if files.is_empty() {
            reporter.warning(&format!(
                "No files found at: {}",
                directory.join(pattern).display()
            ));
            continue;
        }
        sources.extend(files);
    }
    Ok(sources)
}

fn convert_resources(
    elements: &[ResourceElementManifest],
    directory: &Path,
    reporter: &dyn Reporter,
) -> Vec<ResourceFileElement> {
    let mut resources = Vec::new();
    for element in elements {
        match element {
            ResourceElementManifest::Glob(pattern) => {
                resources.extend(expand_resource_glob(pattern, &[], directory, reporter));
            }
            ResourceElementManifest::GlobWithExcludes { glob, excluding } => {
                resources.extend(expand_resource_glob(glob, excluding, directory, reporter));
            }
            ResourceElementManifest::FolderReference { folder_reference } => {
                let resolved = paths::normalize(&directory.join(folder_reference));
                if !resolved.exists() {
                    reporter.warning(&format!("{} does not exist", resolved.display()));
                    continue;
                }
                if !paths::is_folder(&resolved) {
                    reporter.warning(&format!(
                        "{} is not a directory - folder reference paths need to point to directories",
                        resolved.display()
                    ));
                    continue;
                }
                resources.push(ResourceFileElement::FolderReference(resolved));
            }
        }
    }
    resources
}

fn expand_resource_glob(
    pattern: &str,
    excluding: &[String],
    directory: &Path,
    reporter: &dyn Reporter,
) -> Vec<ResourceFileElement> {
    let resolved = directory.join(pattern);
    if paths::is_folder(&resolved) {
        reporter.warning(&format!(
            "{} is a directory, try using: '{}/**' to list its files",
            resolved.display(),
            resolved.display()
        ));
        return Vec::new();
    }

    let mut matches: Vec<PathBuf> = paths::glob(directory, pattern)
        .into_iter()
        .filter(|path| !paths::is_folder(path))
        .collect();
    if matches.is_empty() {
        reporter.warning(&format!("No files found at: {}", resolved.display()));
        return Vec::new();
    }
    for exclude in excluding {
        let excluded = paths::glob(directory, exclude);
        matches.retain(|path| !excluded.contains(path));
    }
    matches.into_iter().map(ResourceFileElement::File).collect()
}

/// Expand a header glob list, keeping only header-like extensions.
fn header_files(globs: Option<&GlobList>, directory: &Path) -> Vec<PathBuf> {
    let Some(globs) = globs else {
        return Vec::new();
    };
    let mut files = Vec::new();
    for pattern in globs.globs() {
        files.extend(paths::glob(directory, pattern).into_iter().filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
        }));
    }
    files
}

fn convert_dependency(
    manifest: &DependencyManifest,
    directory: &Path,
) -> Result<TargetDependency, ConversionError> {
    let resolve = |path: &str| paths::normalize(&directory.join(path));
    Ok(match manifest {
        DependencyManifest::Target { name } => TargetDependency::Target { name: name.clone() },
        DependencyManifest::Project { target, path } => TargetDependency::Project {
            target: target.clone(),
            path: resolve(path),
        },
        DependencyManifest::Framework { path } => TargetDependency::Framework {
            path: resolve(path),
        },
        DependencyManifest::Xcframework { path } => TargetDependency::Xcframework {
            path: resolve(path),
        },
        DependencyManifest::Library {
            path,
            public_headers,
            swift_module_map,
        } => TargetDependency::Library {
            path: resolve(path),
            public_headers: public_headers.as_deref().map(resolve),
            swift_module_map: swift_module_map.as_deref().map(resolve),
        },
        DependencyManifest::Sdk { name, status } => {
            let status = match status.as_deref() {
                None | Some("required") => SdkStatus::Required,
                Some("optional") => SdkStatus::Optional,
                Some(other) => {
                    return Err(DomainError::InvalidValue {
                        reason: format!("unknown sdk status '{other}'"),
                    }
                    .into())
                }
            };
            TargetDependency::Sdk {
                name: name.clone(),
                status,
            }
        }
        DependencyManifest::Package { product } => TargetDependency::Package {
            product: product.clone(),
        },
        DependencyManifest::Cocoapods { path } => TargetDependency::Cocoapods {
            path: resolve(path),
        },
        DependencyManifest::External { name } => TargetDependency::External { name: name.clone() },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::convert::tests::{target_manifest, CollectingReporter};
    use crate::domain::Config;
    use crate::manifest::model::HeadersManifest;
    use crate::services::NullReporter;

    #[test]
    fn watchos_platform_is_not_yet_supported() {
        let mut manifest = target_manifest("Watch");
        manifest.platform = "watchos".to_string();
        let result = convert_target(
            &manifest,
            Path::new("/ws/App"),
            &Config::default(),
            &NullReporter,
        );
        assert!(matches!(
            result,
            Err(ConversionError::FeatureNotYetSupported { description })
                if description == "watchOS platform"
        ));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let mut manifest = target_manifest("App");
        manifest.platform = "linux".to_string();
        let result = convert_target(
            &manifest,
            Path::new("/ws/App"),
            &Config::default(),
            &NullReporter,
        );
        assert!(matches!(
            result,
            Err(ConversionError::Domain(DomainError::UnknownPlatform { .. }))
        ));
    }

    #[test]
    fn missing_source_glob_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = target_manifest("App");
        manifest.sources = vec!["Missing/**".to_string()];
        let result = convert_target(&manifest, dir.path(), &Config::default(), &NullReporter);
        assert!(matches!(result, Err(ConversionError::Glob(_))));
    }

    #[test]
    fn header_globs_keep_only_header_extensions() {
        // public/A1.h and public/A2.h with .m siblings; only headers stay.
        let dir = tempfile::tempdir().unwrap();
        for sub in ["public", "private", "project"] {
            fs::create_dir_all(dir.path().join("Sources").join(sub)).unwrap();
        }
        fs::write(dir.path().join("Sources/public/A1.h"), "").unwrap();
        fs::write(dir.path().join("Sources/public/A2.h"), "").unwrap();
        fs::write(dir.path().join("Sources/public/A1.m"), "").unwrap();
        fs::write(dir.path().join("Sources/public/A2.m"), "").unwrap();
        fs::write(dir.path().join("Sources/project/B.h"), "").unwrap();

        let mut manifest = target_manifest("Kit");
        manifest.headers = Some(HeadersManifest {
            public: Some(GlobList::Single("Sources/public/**".to_string())),
            private: Some(GlobList::Single("Sources/private/**".to_string())),
            project: Some(GlobList::Single("Sources/project/**".to_string())),
        });
        let target =
            convert_target(&manifest, dir.path(), &Config::default(), &NullReporter).unwrap();

        let headers = target.headers.unwrap();
        assert_eq!(
            headers.public,
            vec![
                dir.path().join("Sources/public/A1.h"),
                dir.path().join("Sources/public/A2.h"),
            ]
        );
        assert!(headers.private.is_empty());
        assert_eq!(headers.project, vec![dir.path().join("Sources/project/B.h")]);
    }

    #[test]
    fn resource_excludes_filter_matched_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resources/private")).unwrap();
        fs::write(dir.path().join("Resources/a.json"), "{}").unwrap();
        fs::write(dir.path().join("Resources/private/b.json"), "{}").unwrap();

        let mut manifest = target_manifest("App");
        manifest.resources = vec![ResourceElementManifest::GlobWithExcludes {
            glob: "Resources/**".to_string(),
            excluding: vec!["Resources/private/**".to_string()],
        }];
        let target =
            convert_target(&manifest, dir.path(), &Config::default(), &NullReporter).unwrap();

        assert_eq!(
            target.resources,
            vec![ResourceFileElement::File(dir.path().join("Resources/a.json"))]
        );
    }

    #[test]
    fn dependencies_resolve_paths_against_the_manifest_directory() {
        let mut manifest = target_manifest("App");
        manifest.dependencies = vec![
            DependencyManifest::Project {
                target: "Kit".to_string(),
                path: "../Kit".to_string(),
            },
            DependencyManifest::Sdk {
                name: "CoreData.framework".to_string(),
                status: None,
            },
        ];
        let target = convert_target(
            &manifest,
            Path::new("/ws/App"),
            &Config::default(),
            &NullReporter,
        )
        .unwrap();
        assert_eq!(
            target.dependencies,
            vec![
                TargetDependency::Project {
                    target: "Kit".to_string(),
                    path: PathBuf::from("/ws/Kit"),
                },
                TargetDependency::sdk("CoreData.framework", SdkStatus::Required),
            ]
        );
    }

    #[test]
    fn empty_source_glob_warns_but_converts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sources")).unwrap();

        let reporter = CollectingReporter::new();
        let mut manifest = target_manifest("App");
        manifest.sources = vec!["Sources/**".to_string()];
        let target =
            convert_target(&manifest, dir.path(), &Config::default(), reporter.as_ref()).unwrap();

        assert!(target.sources.is_empty());
        assert!(reporter.messages()[0].starts_with("No files found at:"));
    }
}
