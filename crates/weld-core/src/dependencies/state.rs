//! The package manager's resolved workspace state.
//!
//! Decoded from `workspace-state.json` in the package workspace directory.
//! Only the fields the generator consumes are modelled.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspaceState {
    pub object: WorkspaceStateObject,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspaceStateObject {
    #[serde(default)]
    pub dependencies: Vec<StateDependency>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateDependency {
    #[serde(rename = "packageRef")]
    pub package_ref: PackageRef,
    #[serde(default)]
    pub subpath: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageRef {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub identity: Option<String>,
    /// Remote URL for `remote` packages, absolute path for `local` ones.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl PackageRef {
    /// The declared on-disk location of a local package.
    pub fn local_path(&self) -> Option<&str> {
        self.path.as_deref().or(self.location.as_deref())
    }
}
