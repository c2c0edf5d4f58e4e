//! JSON manifest loading.
//!
//! One file per kind (`Project.json`, `Workspace.json`, `Config.json`,
//! `Dependencies.json`, `Template.json`), decoded with serde. Parsing is
//! value-level; no user code ever executes.

use std::collections::BTreeSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use weld_core::manifest::{
    model::{
        ConfigManifest, DependenciesManifest, ProjectManifest, TemplateManifest,
        WorkspaceManifest,
    },
    ManifestError, ManifestKind, ManifestLoading,
};

/// Production manifest loader reading JSON files with `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifestLoader;

impl JsonManifestLoader {
    pub fn new() -> Self {
        Self
    }

    fn load<T: DeserializeOwned>(
        &self,
        directory: &Path,
        kind: ManifestKind,
    ) -> Result<T, ManifestError> {
        let path = directory.join(kind.file_name());
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| ManifestError::NotFound(path.clone()))?;
        serde_json::from_str(&contents).map_err(|e| ManifestError::Decoding {
            path,
            reason: e.to_string(),
        })
    }
}

impl ManifestLoading for JsonManifestLoader {
    fn load_project(&self, directory: &Path) -> Result<ProjectManifest, ManifestError> {
        self.load(directory, ManifestKind::Project)
    }

    fn load_workspace(&self, directory: &Path) -> Result<WorkspaceManifest, ManifestError> {
        self.load(directory, ManifestKind::Workspace)
    }

    fn load_config(&self, directory: &Path) -> Result<ConfigManifest, ManifestError> {
        self.load(directory, ManifestKind::Config)
    }

    fn load_dependencies(&self, directory: &Path) -> Result<DependenciesManifest, ManifestError> {
        self.load(directory, ManifestKind::Dependencies)
    }

    fn load_template(&self, directory: &Path) -> Result<TemplateManifest, ManifestError> {
        self.load(directory, ManifestKind::Template)
    }

    fn manifests_at(&self, directory: &Path) -> BTreeSet<ManifestKind> {
        ManifestKind::ALL
            .into_iter()
            .filter(|kind| directory.join(kind.file_name()).is_file())
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_manifest_reports_not_found_with_the_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonManifestLoader.load_project(dir.path()).unwrap_err();
        assert_eq!(
            err,
            ManifestError::NotFound(dir.path().join("Project.json"))
        );
    }

    #[test]
    fn decodes_a_minimal_project_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Project.json"),
            r#"{
                "name": "App",
                "targets": [{
                    "name": "App",
                    "platform": "ios",
                    "product": "app",
                    "bundle_id": "io.example.app",
                    "sources": ["Sources/**"],
                    "dependencies": [{"type": "target", "name": "Kit"}]
                }]
            }"#,
        )
        .unwrap();

        let manifest = JsonManifestLoader.load_project(dir.path()).unwrap();
        assert_eq!(manifest.name, "App");
        assert_eq!(manifest.targets.len(), 1);
        assert_eq!(manifest.targets[0].sources, vec!["Sources/**"]);
    }

    #[test]
    fn malformed_json_reports_a_decoding_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Workspace.json"), "{not json").unwrap();
        let err = JsonManifestLoader.load_workspace(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::Decoding { .. }));
    }

    #[test]
    fn manifests_at_reports_present_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Project.json"), "{\"name\": \"A\"}").unwrap();
        fs::write(dir.path().join("Config.json"), "{}").unwrap();

        let kinds = JsonManifestLoader.manifests_at(dir.path());
        assert!(kinds.contains(&ManifestKind::Project));
        assert!(kinds.contains(&ManifestKind::Config));
        assert!(!kinds.contains(&ManifestKind::Workspace));
    }

    #[test]
    fn untagged_info_plist_accepts_path_or_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Project.json"),
            r#"{
                "name": "App",
                "targets": [
                    {
                        "name": "A",
                        "platform": "ios",
                        "product": "app",
                        "bundle_id": "io.example.a",
                        "info_plist": "Info.plist"
                    },
                    {
                        "name": "B",
                        "platform": "ios",
                        "product": "app",
                        "bundle_id": "io.example.b",
                        "info_plist": {"CFBundleVersion": "7"}
                    }
                ]
            }"#,
        )
        .unwrap();

        let manifest = JsonManifestLoader.load_project(dir.path()).unwrap();
        use weld_core::manifest::model::InfoPlistManifest;
        assert!(matches!(
            manifest.targets[0].info_plist,
            Some(InfoPlistManifest::File(_))
        ));
        assert!(matches!(
            manifest.targets[1].info_plist,
            Some(InfoPlistManifest::Dictionary(_))
        ));
    }
}
