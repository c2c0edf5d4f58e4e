//! Third-party package descriptions and the port that loads them.

use std::path::Path;

use serde::Deserialize;

use crate::dependencies::{state::WorkspaceState, DependenciesError};

/// A package's declared platforms, products, and targets.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct PackageInfo {
    #[serde(default)]
    pub platforms: Vec<PackagePlatform>,
    #[serde(default)]
    pub products: Vec<PackageProduct>,
    #[serde(default)]
    pub targets: Vec<PackageTarget>,
}

impl PackageInfo {
    pub fn target(&self, name: &str) -> Option<&PackageTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn product(&self, name: &str) -> Option<&PackageProduct> {
        self.products.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackagePlatform {
    pub platform_name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageLibraryKind {
    Static,
    Dynamic,
    Automatic,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackageProductType {
    Library { linking: PackageLibraryKind },
    Executable,
    Plugin,
    Test,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageProduct {
    pub name: String,
    pub product_type: PackageProductType,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageTargetKind {
    Regular,
    Binary,
    Test,
    System,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageResource {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PackageTargetDependency {
    Target {
        name: String,
    },
    Product {
        name: String,
        #[serde(default)]
        package: Option<String>,
    },
    ByName {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageSettingTool {
    C,
    Cxx,
    Swift,
    Linker,
}

impl PackageSettingTool {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cxx => "cxx",
            Self::Swift => "swift",
            Self::Linker => "linker",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackageSettingName {
    HeaderSearchPath,
    Define,
    UnsafeFlags,
    LinkedFramework,
    LinkedLibrary,
}

impl PackageSettingName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HeaderSearchPath => "header_search_path",
            Self::Define => "define",
            Self::UnsafeFlags => "unsafe_flags",
            Self::LinkedFramework => "linked_framework",
            Self::LinkedLibrary => "linked_library",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageTargetSetting {
    pub tool: PackageSettingTool,
    pub name: PackageSettingName,
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageTarget {
    pub name: String,
    pub kind: PackageTargetKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Vec<PackageResource>,
    #[serde(default)]
    pub dependencies: Vec<PackageTargetDependency>,
    #[serde(default)]
    pub settings: Vec<PackageTargetSetting>,
}

/// Port for reading the package manager's on-disk artefacts.
///
/// `load_package_info` wraps whatever the package manager offers for
/// dumping a package description; the JSON implementation lives in
/// `weld-adapters`.
pub trait PackageLoading: Send + Sync {
    fn load_workspace_state(&self, directory: &Path) -> Result<WorkspaceState, DependenciesError>;

    fn load_package_info(&self, directory: &Path) -> Result<PackageInfo, DependenciesError>;
}

/// A loader for workspaces without package dependencies.
pub struct NoPackages;

impl PackageLoading for NoPackages {
    fn load_workspace_state(&self, directory: &Path) -> Result<WorkspaceState, DependenciesError> {
        Err(DependenciesError::WorkspaceStateNotFound(
            directory.to_path_buf(),
        ))
    }

    fn load_package_info(&self, directory: &Path) -> Result<PackageInfo, DependenciesError> {
        Err(DependenciesError::PackageInfoNotFound(
            directory.to_path_buf(),
        ))
    }
}
