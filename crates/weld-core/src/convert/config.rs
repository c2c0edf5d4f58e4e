//! Config and dependencies-manifest lowering.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::{
    convert::ConversionError,
    dependencies::DependenciesError,
    domain::{
        Cache, Cloud, CloudOption, CompatibleIdeVersions, Config, DomainError, GenerationOption,
        Platform, PluginLocation, Product,
    },
    manifest::model::{
        ConfigManifest, DependenciesManifest, GenerationOptionManifest, PluginLocationManifest,
    },
};

/// Lower a config manifest. Duplicate single-occurrence options are
/// discarded by [`Config::new`].
pub fn convert_config(manifest: &ConfigManifest) -> Result<Config, ConversionError> {
    let options = manifest.generation_options.iter().map(|option| match option {
        GenerationOptionManifest::XcodeProjectName { value } => {
            GenerationOption::XcodeProjectName(value.clone())
        }
        GenerationOptionManifest::OrganizationName { value } => {
            GenerationOption::OrganizationName(value.clone())
        }
        GenerationOptionManifest::DevelopmentRegion { value } => {
            GenerationOption::DevelopmentRegion(value.clone())
        }
        GenerationOptionManifest::DisableAutogeneratedSchemes => {
            GenerationOption::DisableAutogeneratedSchemes
        }
        GenerationOptionManifest::DisableSynthesizedResourceAccessors => {
            GenerationOption::DisableSynthesizedResourceAccessors
        }
        GenerationOptionManifest::DisableShowEnvironmentVarsInScriptPhases => {
            GenerationOption::DisableShowEnvironmentVarsInScriptPhases
        }
        GenerationOptionManifest::EnableCodeCoverage => GenerationOption::EnableCodeCoverage,
        GenerationOptionManifest::ResolveDependenciesWithSystemScm => {
            GenerationOption::ResolveDependenciesWithSystemScm
        }
        GenerationOptionManifest::DisablePackageVersionLocking => {
            GenerationOption::DisablePackageVersionLocking
        }
        GenerationOptionManifest::TemplateMacros { value } => {
            GenerationOption::TemplateMacros(value.clone())
        }
        GenerationOptionManifest::SwiftToolsVersion { value } => {
            GenerationOption::SwiftToolsVersion(value.clone())
        }
    });

    let compatible_ide_versions = match &manifest.compatible_ide_versions {
        None => CompatibleIdeVersions::All,
        Some(versions) => CompatibleIdeVersions::List(versions.clone()),
    };

    let cloud = manifest
        .cloud
        .as_ref()
        .map(|cloud| {
            let options = cloud
                .options
                .iter()
                .map(|option| match option.as_str() {
                    "insights" => Ok(CloudOption::Insights),
                    other => Err(DomainError::InvalidValue {
                        reason: format!("unknown cloud option '{other}'"),
                    }),
                })
                .collect::<Result<_, _>>()?;
            Ok::<_, DomainError>(Cloud {
                url: cloud.url.clone(),
                project_id: cloud.project_id.clone(),
                options,
            })
        })
        .transpose()?;

    let cache = manifest.cache.as_ref().map(|cache| Cache {
        path: cache.path.as_ref().map(PathBuf::from),
    });

    let plugins = manifest
        .plugins
        .iter()
        .map(|plugin| match plugin {
            PluginLocationManifest::Local { path } => PluginLocation::Local {
                path: PathBuf::from(path),
            },
            PluginLocationManifest::Git { url, tag } => PluginLocation::Git {
                url: url.clone(),
                tag: tag.clone(),
            },
        })
        .collect();

    Ok(Config::new(
        options,
        compatible_ide_versions,
        cloud,
        cache,
        plugins,
    ))
}

/// Lower the dependencies manifest into the generator's inputs: the
/// configured platform set and the product-type override map.
pub fn convert_dependencies_manifest(
    manifest: &DependenciesManifest,
) -> Result<(Vec<Platform>, IndexMap<String, Product>), DependenciesError> {
    let mut platforms = Vec::new();
    for raw in &manifest.platforms {
        let platform: Platform =
            raw.parse()
                .map_err(|_| DependenciesError::UnknownPlatform { name: raw.clone() })?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        platforms = Platform::ALL.to_vec();
    }

    let mut product_types = IndexMap::new();
    for (target, raw) in &manifest.product_types {
        let product: Product = raw.parse().map_err(|_| {
            DependenciesError::UnknownProductDependency {
                product: raw.clone(),
                package: target.clone(),
            }
        })?;
        product_types.insert(target.clone(), product);
    }
    Ok((platforms, product_types))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_options_keep_the_first_occurrence() {
        let manifest = ConfigManifest {
            generation_options: vec![
                GenerationOptionManifest::OrganizationName {
                    value: "TestOrg".to_string(),
                },
                GenerationOptionManifest::OrganizationName {
                    value: "OtherOrg".to_string(),
                },
                GenerationOptionManifest::EnableCodeCoverage,
            ],
            ..Default::default()
        };
        let config = convert_config(&manifest).unwrap();
        assert_eq!(config.organization_name(), Some("TestOrg"));
        assert!(config.code_coverage_enabled());
    }

    #[test]
    fn empty_dependency_platforms_default_to_all() {
        let (platforms, _) = convert_dependencies_manifest(&DependenciesManifest::default()).unwrap();
        assert_eq!(platforms, Platform::ALL.to_vec());
    }

    #[test]
    fn product_type_overrides_are_parsed() {
        let mut manifest = DependenciesManifest::default();
        manifest.platforms = vec!["ios".to_string()];
        manifest
            .product_types
            .insert("Net".to_string(), "framework".to_string());
        let (platforms, overrides) = convert_dependencies_manifest(&manifest).unwrap();
        assert_eq!(platforms, vec![Platform::Ios]);
        assert_eq!(overrides.get("Net"), Some(&Product::Framework));
    }
}
