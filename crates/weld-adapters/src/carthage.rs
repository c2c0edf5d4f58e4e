//! Carthage integration.
//!
//! Shells out to the `carthage` binary; invoked by the generator strictly
//! between pipeline stages when a `Cartfile` is present.

use std::path::Path;
use std::process::Command;

use tracing::info;

use weld_core::{
    dependencies::{CarthageInteracting, DependenciesError},
    domain::Platform,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCarthage;

impl SystemCarthage {
    pub fn new() -> Self {
        Self
    }
}

impl CarthageInteracting for SystemCarthage {
    fn install(&self, root: &Path, platforms: &[Platform]) -> Result<(), DependenciesError> {
        let cartfile = root.join("Cartfile");
        if !cartfile.is_file() {
            return Err(DependenciesError::CartfileNotFound(cartfile));
        }

        let platform_list = platforms
            .iter()
            .map(Platform::as_str)
            .collect::<Vec<_>>()
            .join(",");
        info!(platforms = %platform_list, "bootstrapping carthage dependencies");

        let status = Command::new("carthage")
            .arg("bootstrap")
            .arg("--use-xcframeworks")
            .arg("--platform")
            .arg(&platform_list)
            .current_dir(root)
            .status()
            .map_err(|_| DependenciesError::CarthageNotFound)?;

        if !status.success() {
            return Err(DependenciesError::CarthageFailed(status.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cartfile_is_reported_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemCarthage::new()
            .install(dir.path(), &[Platform::Ios])
            .unwrap_err();
        assert_eq!(
            err,
            DependenciesError::CartfileNotFound(dir.path().join("Cartfile"))
        );
    }
}
