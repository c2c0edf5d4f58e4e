//! JSON package loading.
//!
//! Reads the package manager's `workspace-state.json` and, per package
//! folder, the dumped package description (`Package.info.json`).

use std::path::Path;

use weld_core::dependencies::{
    DependenciesError, PackageInfo, PackageLoading, WorkspaceState,
};

const STATE_FILE: &str = "workspace-state.json";
const PACKAGE_INFO_FILE: &str = "Package.info.json";

/// Production package loader reading dumped JSON descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPackageLoader;

impl JsonPackageLoader {
    pub fn new() -> Self {
        Self
    }
}

impl PackageLoading for JsonPackageLoader {
    fn load_workspace_state(&self, directory: &Path) -> Result<WorkspaceState, DependenciesError> {
        let path = directory.join(STATE_FILE);
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| DependenciesError::WorkspaceStateNotFound(path.clone()))?;
        serde_json::from_str(&contents).map_err(|e| DependenciesError::StateDecoding {
            path,
            reason: e.to_string(),
        })
    }

    fn load_package_info(&self, directory: &Path) -> Result<PackageInfo, DependenciesError> {
        let path = directory.join(PACKAGE_INFO_FILE);
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| DependenciesError::PackageInfoNotFound(path.clone()))?;
        serde_json::from_str(&contents).map_err(|e| DependenciesError::PackageInfoDecoding {
            path,
            reason: e.to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn decodes_a_workspace_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(STATE_FILE),
            r#"{
                "version": 5,
                "object": {
                    "dependencies": [
                        {
                            "packageRef": {
                                "identity": "alamofire",
                                "kind": "remote",
                                "location": "https://github.com/Alamofire/Alamofire",
                                "name": "Alamofire"
                            },
                            "subpath": "Alamofire"
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let state = JsonPackageLoader.load_workspace_state(dir.path()).unwrap();
        assert_eq!(state.object.dependencies.len(), 1);
        assert_eq!(state.object.dependencies[0].package_ref.name, "Alamofire");
        assert_eq!(state.object.dependencies[0].package_ref.kind, "remote");
    }

    #[test]
    fn decodes_a_package_description() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PACKAGE_INFO_FILE),
            r#"{
                "platforms": [{"platform_name": "ios", "version": "13.0"}],
                "products": [
                    {
                        "name": "Alamofire",
                        "product_type": {"kind": "library", "linking": "automatic"},
                        "targets": ["Alamofire"]
                    }
                ],
                "targets": [
                    {
                        "name": "Alamofire",
                        "kind": "regular",
                        "dependencies": [{"type": "by_name", "name": "Logging"}],
                        "settings": [
                            {"tool": "linker", "name": "linked_framework", "value": ["CFNetwork"]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let info = JsonPackageLoader.load_package_info(dir.path()).unwrap();
        assert_eq!(info.platforms[0].platform_name, "ios");
        assert_eq!(info.products[0].targets, vec!["Alamofire"]);
        assert_eq!(info.targets[0].settings[0].value, vec!["CFNetwork"]);
    }

    #[test]
    fn missing_state_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonPackageLoader
            .load_workspace_state(dir.path())
            .unwrap_err();
        assert_eq!(
            err,
            DependenciesError::WorkspaceStateNotFound(dir.path().join(STATE_FILE))
        );
    }
}
