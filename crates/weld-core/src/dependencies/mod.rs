//! External-dependencies resolution: lowering a resolved package workspace
//! into synthetic projects, targets, and linker edges.

pub mod generator;
pub mod graph;
pub mod package_info;
pub mod state;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Platform;

pub use generator::DependenciesGraphGenerator;
pub use graph::DependenciesGraph;
pub use package_info::{NoPackages, PackageInfo, PackageLoading};
pub use state::WorkspaceState;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DependenciesError {
    #[error("no package workspace state found at {}", .0.display())]
    WorkspaceStateNotFound(PathBuf),

    #[error("could not decode package workspace state at {}: {reason}", .path.display())]
    StateDecoding { path: PathBuf, reason: String },

    #[error("no package description found at {}", .0.display())]
    PackageInfoNotFound(PathBuf),

    #[error("could not decode package description at {}: {reason}", .path.display())]
    PackageInfoDecoding { path: PathBuf, reason: String },

    #[error("unsupported package dependency kind '{0}'")]
    UnsupportedDependencyKind(String),

    #[error("could not resolve by-name dependency '{0}' against any package target or product")]
    UnknownByNameDependency(String),

    #[error("unknown product '{product}' required by package '{package}'")]
    UnknownProductDependency { product: String, package: String },

    #[error("unknown platform '{name}'")]
    UnknownPlatform { name: String },

    #[error(
        "package '{package}' supports none of the configured platforms \
         (configured: {}; declared: {})",
        format_platforms(.configured),
        format_platforms(.declared)
    )]
    NoSupportedPlatforms {
        package: String,
        configured: Vec<Platform>,
        declared: Vec<Platform>,
    },

    #[error("unsupported package setting ({tool}, {name})")]
    UnsupportedSetting { tool: String, name: String },

    #[error("no Cartfile found at {}", .0.display())]
    CartfileNotFound(PathBuf),

    #[error("carthage was not found in the environment")]
    CarthageNotFound,

    #[error("carthage failed: {0}")]
    CarthageFailed(String),
}

fn format_platforms(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        return "none".to_string();
    }
    platforms
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Port for the optional Carthage install step.
///
/// Invoked between pipeline stages, never concurrently with mapping. The
/// system implementation shells out; tests inject [`NullCarthage`].
pub trait CarthageInteracting: Send + Sync {
    /// Fetch and build Carthage dependencies declared at `root`.
    fn install(&self, root: &Path, platforms: &[Platform]) -> Result<(), DependenciesError>;
}

/// No-op Carthage interactor for workspaces that do not use it.
pub struct NullCarthage;

impl CarthageInteracting for NullCarthage {
    fn install(&self, _root: &Path, _platforms: &[Platform]) -> Result<(), DependenciesError> {
        Ok(())
    }
}
