//! Settings manifest lowering.

use std::path::Path;

use indexmap::IndexMap;

use crate::{
    convert::ConversionError,
    domain::{
        BuildConfiguration, BuildVariant, Configuration, DomainError, SettingValue, Settings,
        SettingsDictionary,
    },
    manifest::model::{SettingValueManifest, SettingsManifest},
    paths,
};

/// Lower a settings manifest; absent settings become the conventional
/// Debug/Release pair.
pub fn convert_settings(
    manifest: Option<&SettingsManifest>,
    directory: &Path,
) -> Result<Settings, ConversionError> {
    let Some(manifest) = manifest else {
        return Ok(Settings::default_configurations());
    };

    let base = convert_dictionary(&manifest.base);
    let mut configurations = Vec::new();
    for configuration in &manifest.configurations {
        let variant = parse_variant(&configuration.variant)?;
        let build_configuration = BuildConfiguration {
            name: configuration.name.clone(),
            variant,
        };
        let overlay = Configuration {
            settings: convert_dictionary(&configuration.settings),
            xcconfig: configuration
                .xcconfig
                .as_ref()
                .map(|path| paths::normalize(&directory.join(path))),
        };
        configurations.push((build_configuration, Some(overlay)));
    }

    if configurations.is_empty() {
        let mut settings = Settings::default_configurations();
        settings.base = base;
        return Ok(settings);
    }
    Ok(Settings::new(base, configurations)?)
}

/// Lower target-level settings; absent settings stay absent.
pub fn convert_target_settings(
    manifest: Option<&SettingsManifest>,
    directory: &Path,
) -> Result<Option<Settings>, ConversionError> {
    match manifest {
        None => Ok(None),
        Some(m) => convert_settings(Some(m), directory).map(Some),
    }
}

fn convert_dictionary(
    manifest: &IndexMap<String, SettingValueManifest>,
) -> SettingsDictionary {
    manifest
        .iter()
        .map(|(key, value)| {
            let value = match value {
                SettingValueManifest::String(s) => SettingValue::String(s.clone()),
                SettingValueManifest::Array(items) => SettingValue::Array(items.clone()),
            };
            (key.clone(), value)
        })
        .collect()
}

fn parse_variant(raw: &str) -> Result<BuildVariant, ConversionError> {
    match raw {
        "debug" => Ok(BuildVariant::Debug),
        "release" => Ok(BuildVariant::Release),
        other => Err(DomainError::InvalidValue {
            reason: format!("unknown build variant '{other}'"),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::model::ConfigurationManifest;

    #[test]
    fn absent_settings_default_to_debug_release() {
        let settings = convert_settings(None, Path::new("/p")).unwrap();
        let names: Vec<_> = settings
            .ordered_configurations()
            .iter()
            .map(|(c, _)| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Debug", "Release"]);
    }

    #[test]
    fn xcconfig_paths_resolve_against_the_manifest_directory() {
        let manifest = SettingsManifest {
            base: IndexMap::new(),
            configurations: vec![ConfigurationManifest {
                name: "Debug".to_string(),
                variant: "debug".to_string(),
                settings: IndexMap::new(),
                xcconfig: Some("Configs/Debug.xcconfig".to_string()),
            }],
        };
        let settings = convert_settings(Some(&manifest), Path::new("/ws/App")).unwrap();
        let (_, overlay) = settings.ordered_configurations()[0];
        assert_eq!(
            overlay.unwrap().xcconfig.as_deref(),
            Some(Path::new("/ws/App/Configs/Debug.xcconfig"))
        );
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let manifest = SettingsManifest {
            base: IndexMap::new(),
            configurations: vec![ConfigurationManifest {
                name: "Odd".to_string(),
                variant: "profile".to_string(),
                settings: IndexMap::new(),
                xcconfig: None,
            }],
        };
        assert!(convert_settings(Some(&manifest), Path::new("/p")).is_err());
    }
}
