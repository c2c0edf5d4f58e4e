//! Unified error handling for the core.
//!
//! Each component owns its error enum; this module folds them into one
//! [`WeldError`] with the category and suggestion machinery the CLI uses
//! for display and exit codes.

use thiserror::Error;

use crate::{
    convert::ConversionError,
    dependencies::DependenciesError,
    domain::DomainError,
    graph::GraphError,
    manifest::ManifestError,
    paths::GlobError,
};

/// Root error type for generation.
#[derive(Debug, Error, Clone)]
pub enum WeldError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Dependencies(#[from] DependenciesError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Deferred filesystem work failed while executing side effects or
    /// writing descriptors.
    #[error("could not write {path}: {reason}")]
    Write { path: String, reason: String },

    /// Unexpected internal errors (bugs).
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Error categories for display styling and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The manifests are invalid or inconsistent.
    Validation,
    /// Something the manifests reference could not be found.
    NotFound,
    /// The environment or configuration is unusable.
    Configuration,
    /// A bug or system failure.
    Internal,
}

impl WeldError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Manifest(ManifestError::NotFound(_)) => ErrorCategory::NotFound,
            Self::Manifest(ManifestError::Decoding { .. }) => ErrorCategory::Validation,
            Self::Glob(_) => ErrorCategory::Validation,
            Self::Conversion(_) => ErrorCategory::Validation,
            Self::Graph(GraphError::MissingFile { .. }) => ErrorCategory::NotFound,
            Self::Graph(_) => ErrorCategory::Validation,
            Self::Dependencies(DependenciesError::CarthageNotFound) => {
                ErrorCategory::Configuration
            }
            Self::Dependencies(DependenciesError::CartfileNotFound(_)) => ErrorCategory::NotFound,
            Self::Dependencies(_) => ErrorCategory::Validation,
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Write { .. } => ErrorCategory::Internal,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Manifest(ManifestError::NotFound(path)) => vec![
                format!("No manifest found at {}", path.display()),
                "Run from a directory containing Project.json or Workspace.json".into(),
                "Or pass --path pointing at one".into(),
            ],
            Self::Glob(GlobError::NonExistentDirectory { resolved_root, .. }) => vec![
                format!("The directory {} does not exist", resolved_root.display()),
                "Check the glob's non-wildcard prefix against your source layout".into(),
            ],
            Self::Graph(GraphError::CyclicDependency { .. }) => vec![
                "Break the cycle by extracting shared code into a separate target".into(),
            ],
            Self::Dependencies(DependenciesError::CarthageNotFound) => vec![
                "Install carthage (e.g. brew install carthage) and retry".into(),
            ],
            Self::Internal { .. } => vec![
                "This looks like a bug in weld; please report it".into(),
            ],
            _ => Vec::new(),
        }
    }
}

/// Convenient result alias.
pub type WeldResult<T> = Result<T, WeldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn manifest_not_found_maps_to_not_found() {
        let err = WeldError::from(ManifestError::NotFound(PathBuf::from("/x")));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn cyclic_dependency_maps_to_validation() {
        let err = WeldError::from(GraphError::CyclicDependency {
            path: "A -> B -> A".to_string(),
        });
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn carthage_missing_maps_to_configuration() {
        let err = WeldError::from(DependenciesError::CarthageNotFound);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
