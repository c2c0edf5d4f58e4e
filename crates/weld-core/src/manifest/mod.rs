//! Manifest values, the loading port, and the recursive loader.

pub mod loader;
pub mod model;
pub mod recursive;

pub use loader::{ManifestError, ManifestKind, ManifestLoading};
pub use recursive::{LoadedProjects, LoadedWorkspace, RecursiveManifestLoader};
