//! Lowering manifest values into the typed model.
//!
//! The converter resolves every relative path against the manifest's
//! directory, expands globs, and downgrades empty-glob and folder-reference
//! problems to reporter warnings. Everything else is fatal and aborts the
//! run before any model is produced.

mod config;
mod scheme;
mod settings;
mod target;

use std::path::Path;

use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{Config, DomainError, FileElement, Project, ResourceSynthesizer, Workspace},
    manifest::{
        model::{FileElementManifest, ProjectManifest},
        LoadedWorkspace,
    },
    paths::{self, GlobError},
    services::Services,
};

pub use config::{convert_config, convert_dependencies_manifest};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("feature not yet supported: {description}")]
    FeatureNotYetSupported { description: String },

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Converts loaded manifests into model values.
pub struct ManifestConverter<'a> {
    services: &'a Services,
    config: &'a Config,
}

impl<'a> ManifestConverter<'a> {
    pub fn new(services: &'a Services, config: &'a Config) -> Self {
        Self { services, config }
    }

    /// Lower a workspace manifest, with the loaded project directories as
    /// its project list.
    pub fn convert_workspace(&self, loaded: &LoadedWorkspace) -> Result<Workspace, ConversionError> {
        let mut workspace = Workspace::new(
            &loaded.path,
            &loaded.workspace.name,
            loaded.projects.projects.keys().cloned(),
        );
        workspace.additional_files =
            self.convert_file_elements(&loaded.workspace.additional_files, &loaded.path);
        for manifest in &loaded.workspace.schemes {
            workspace
                .schemes
                .push(scheme::convert_scheme(manifest, &loaded.path));
        }
        Ok(workspace)
    }

    /// Lower one project manifest rooted at `directory`.
    #[instrument(skip_all, fields(project = %manifest.name))]
    pub fn convert_project(
        &self,
        manifest: &ProjectManifest,
        directory: &Path,
    ) -> Result<Project, ConversionError> {
        let mut project = Project::new(directory, &manifest.name);
        project.organization_name = manifest.organization_name.clone();
        project.settings = settings::convert_settings(manifest.settings.as_ref(), directory)?;

        for target_manifest in &manifest.targets {
            if project.target(&target_manifest.name).is_some() {
                return Err(DomainError::DuplicateTarget {
                    project: manifest.name.clone(),
                    name: target_manifest.name.clone(),
                }
                .into());
            }
            let target = target::convert_target(
                target_manifest,
                directory,
                self.config,
                self.services.reporter.as_ref(),
            )?;
            project.targets.push(target);
        }

        for scheme_manifest in &manifest.schemes {
            project
                .schemes
                .push(scheme::convert_scheme(scheme_manifest, directory));
        }

        project.additional_files =
            self.convert_file_elements(&manifest.additional_files, directory);
        if let Some(synthesizers) = &manifest.resource_synthesizers {
            project.resource_synthesizers = synthesizers
                .iter()
                .filter_map(|name| parse_synthesizer(name))
                .collect();
        }

        Ok(project)
    }

    /// Expand loose file elements, downgrading problems to warnings.
    fn convert_file_elements(
        &self,
        elements: &[FileElementManifest],
        directory: &Path,
    ) -> Vec<FileElement> {
        let mut converted = Vec::new();
        for element in elements {
            match element {
                FileElementManifest::Glob(pattern) => {
                    let resolved = directory.join(pattern);
                    if paths::is_folder(&resolved) {
                        self.services.reporter.warning(&format!(
                            "{} is a directory, try using: '{}/**' to list its files",
                            resolved.display(),
                            resolved.display()
                        ));
                        continue;
                    }
                    let matches = paths::glob(directory, pattern);
                    if matches.is_empty() {
                        self.services
                            .reporter
                            .warning(&format!("No files found at: {}", resolved.display()));
                        continue;
                    }
                    converted.extend(
                        matches
                            .into_iter()
                            .filter(|p| !paths::is_folder(p))
                            .map(FileElement::File),
                    );
                }
                FileElementManifest::FolderReference { folder_reference } => {
                    let resolved = paths::normalize(&directory.join(folder_reference));
                    if !resolved.exists() {
                        self.services
                            .reporter
                            .warning(&format!("{} does not exist", resolved.display()));
                        continue;
                    }
                    if !paths::is_folder(&resolved) {
                        self.services.reporter.warning(&format!(
                            "{} is not a directory - folder reference paths need to point to directories",
                            resolved.display()
                        ));
                        continue;
                    }
                    converted.push(FileElement::FolderReference(resolved));
                }
            }
        }
        converted
    }
}

fn parse_synthesizer(name: &str) -> Option<ResourceSynthesizer> {
    match name {
        "assets" => Some(ResourceSynthesizer::Assets),
        "strings" => Some(ResourceSynthesizer::Strings),
        "fonts" => Some(ResourceSynthesizer::Fonts),
        "plists" => Some(ResourceSynthesizer::Plists),
        "interface_builder" => Some(ResourceSynthesizer::InterfaceBuilder),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};

    use crate::manifest::model::TargetManifest;
    use crate::services::Reporter;
    use indexmap::IndexMap;

    pub(crate) struct CollectingReporter(pub Mutex<Vec<String>>);

    impl CollectingReporter {
        pub fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        pub fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Reporter for CollectingReporter {
        fn warning(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    pub(crate) fn target_manifest(name: &str) -> TargetManifest {
        TargetManifest {
            name: name.to_string(),
            platform: "ios".to_string(),
            product: "app".to_string(),
            bundle_id: format!("io.weld.{name}"),
            deployment_target: None,
            info_plist: None,
            entitlements: None,
            sources: Vec::new(),
            resources: Vec::new(),
            headers: None,
            dependencies: Vec::new(),
            settings: None,
            environment: IndexMap::new(),
            launch_arguments: Vec::new(),
            core_data_models: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn empty_project(name: &str) -> ProjectManifest {
        ProjectManifest {
            name: name.to_string(),
            organization_name: None,
            settings: None,
            targets: Vec::new(),
            schemes: Vec::new(),
            additional_files: Vec::new(),
            resource_synthesizers: None,
        }
    }

    #[test]
    fn empty_project_converts_to_zero_targets_and_schemes() {
        let services = Services::test_default();
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);
        let project = converter
            .convert_project(&empty_project("SomeProject"), Path::new("/ws/SomeProject"))
            .unwrap();
        assert_eq!(project.name, "SomeProject");
        assert!(project.targets.is_empty());
        assert!(project.schemes.is_empty());
    }

    #[test]
    fn duplicate_target_names_are_rejected() {
        let services = Services::test_default();
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);
        let mut manifest = empty_project("App");
        manifest.targets = vec![target_manifest("App"), target_manifest("App")];
        let result = converter.convert_project(&manifest, Path::new("/ws/App"));
        assert!(matches!(
            result,
            Err(ConversionError::Domain(DomainError::DuplicateTarget { name, .. })) if name == "App"
        ));
    }

    #[test]
    fn directory_passed_as_file_glob_warns_and_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Docs")).unwrap();

        let reporter = CollectingReporter::new();
        let services = Services::test_default().with_reporter(reporter.clone());
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);

        let mut manifest = empty_project("App");
        manifest.additional_files = vec![FileElementManifest::Glob("Docs".to_string())];
        let project = converter.convert_project(&manifest, dir.path()).unwrap();

        assert!(project.additional_files.is_empty());
        let messages = reporter.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("is a directory, try using:"));
        assert!(messages[0].contains("/**"));
    }

    #[test]
    fn empty_glob_warns_and_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = CollectingReporter::new();
        let services = Services::test_default().with_reporter(reporter.clone());
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);

        let mut manifest = empty_project("App");
        manifest.additional_files = vec![FileElementManifest::Glob("*.md".to_string())];
        let project = converter.convert_project(&manifest, dir.path()).unwrap();

        assert!(project.additional_files.is_empty());
        assert!(reporter.messages()[0].starts_with("No files found at:"));
    }

    #[test]
    fn folder_reference_to_file_warns_and_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "hello").unwrap();

        let reporter = CollectingReporter::new();
        let services = Services::test_default().with_reporter(reporter.clone());
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);

        let mut manifest = empty_project("App");
        manifest.additional_files = vec![FileElementManifest::FolderReference {
            folder_reference: "README.md".to_string(),
        }];
        let project = converter.convert_project(&manifest, dir.path()).unwrap();

        assert!(project.additional_files.is_empty());
        assert!(reporter.messages()[0].contains("is not a directory"));
    }

    #[test]
    fn missing_folder_reference_warns_and_is_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = CollectingReporter::new();
        let services = Services::test_default().with_reporter(reporter.clone());
        let config = Config::default();
        let converter = ManifestConverter::new(&services, &config);

        let mut manifest = empty_project("App");
        manifest.additional_files = vec![FileElementManifest::FolderReference {
            folder_reference: "Gone".to_string(),
        }];
        let project = converter.convert_project(&manifest, dir.path()).unwrap();

        assert!(project.additional_files.is_empty());
        assert!(reporter.messages()[0].contains("does not exist"));
    }
}
