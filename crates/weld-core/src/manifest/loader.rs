//! The manifest-loading port.
//!
//! Parsing is value-level: implementations decode a file into the manifest
//! types and never execute user code. The JSON implementation lives in
//! `weld-adapters`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::model::{
    ConfigManifest, DependenciesManifest, ProjectManifest, TemplateManifest, WorkspaceManifest,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not decode manifest at {}: {reason}", .path.display())]
    Decoding { path: PathBuf, reason: String },
}

/// The manifest kinds a directory can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ManifestKind {
    Project,
    Workspace,
    Config,
    Dependencies,
    Template,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 5] = [
        Self::Project,
        Self::Workspace,
        Self::Config,
        Self::Dependencies,
        Self::Template,
    ];

    /// The manifest's on-disk file name.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Project => "Project.json",
            Self::Workspace => "Workspace.json",
            Self::Config => "Config.json",
            Self::Dependencies => "Dependencies.json",
            Self::Template => "Template.json",
        }
    }
}

/// Port for loading manifests from a directory.
///
/// Every operation takes the directory containing the manifest, not the
/// manifest file itself, and fails with [`ManifestError::NotFound`] when
/// the expected file is absent.
pub trait ManifestLoading: Send + Sync {
    fn load_project(&self, directory: &Path) -> Result<ProjectManifest, ManifestError>;

    fn load_workspace(&self, directory: &Path) -> Result<WorkspaceManifest, ManifestError>;

    fn load_config(&self, directory: &Path) -> Result<ConfigManifest, ManifestError>;

    fn load_dependencies(&self, directory: &Path) -> Result<DependenciesManifest, ManifestError>;

    fn load_template(&self, directory: &Path) -> Result<TemplateManifest, ManifestError>;

    /// Which manifest kinds exist in `directory`.
    fn manifests_at(&self, directory: &Path) -> BTreeSet<ManifestKind>;
}
