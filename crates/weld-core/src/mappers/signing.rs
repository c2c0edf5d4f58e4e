//! Code-signing settings from the project's `Signing` directory.
//!
//! Certificates (`*.p12`) switch the project to manual signing;
//! provisioning profiles named `Target.Configuration.mobileprovision` pin
//! the profile specifier on that target's configuration.

use std::path::Path;

use crate::{
    domain::{Project, SettingValue, Settings, SideEffectDescriptor},
    error::WeldResult,
    mappers::ProjectMapping,
    paths,
};

pub struct SigningMapper;

impl ProjectMapping for SigningMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let signing_directory = project.path.join("Signing");
        if !paths::is_folder(&signing_directory) {
            return Ok((project, Vec::new()));
        }

        let certificates = paths::glob(&signing_directory, "*.p12");
        let profiles = paths::glob(&signing_directory, "*.mobileprovision");
        if certificates.is_empty() && profiles.is_empty() {
            return Ok((project, Vec::new()));
        }

        for target in &mut project.targets {
            let settings = target
                .settings
                .get_or_insert_with(Settings::default_configurations);
            if !certificates.is_empty() {
                settings
                    .base
                    .insert("CODE_SIGN_STYLE".to_string(), SettingValue::from("Manual"));
            }
            for profile in &profiles {
                let Some(file_name) = profile.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some((target_name, configuration)) =
                    paths::extract_target_and_configuration_name(file_name)
                else {
                    continue;
                };
                if target_name != target.name {
                    continue;
                }
                settings.set_configuration_setting(
                    &configuration,
                    "PROVISIONING_PROFILE_SPECIFIER",
                    SettingValue::String(profile_stem(file_name)),
                );
            }
        }

        Ok((project, Vec::new()))
    }
}

fn profile_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string())
}
