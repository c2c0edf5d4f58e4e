//! Filesystem port, implementations, and the side-effect executor.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use weld_core::{
    domain::SideEffectDescriptor,
    error::{WeldError, WeldResult},
};

/// Port for the writes the generator defers until mapping succeeded.
///
/// Implemented by [`LocalFilesystem`] for production and
/// [`MemoryFilesystem`] for tests.
pub trait Filesystem: Send + Sync {
    fn create_dir_all(&self, path: &Path) -> WeldResult<()>;

    fn write_file(&self, path: &Path, contents: &str) -> WeldResult<()>;

    fn delete_directory(&self, path: &Path) -> WeldResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn run_command(&self, arguments: &[String]) -> WeldResult<()>;
}

// ── Executor ──────────────────────────────────────────────────────────────────

/// Executes side effects in order; the first failure aborts.
pub struct SideEffectExecutor<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> SideEffectExecutor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    pub fn execute(&self, side_effects: &[SideEffectDescriptor]) -> WeldResult<()> {
        for side_effect in side_effects {
            debug!(%side_effect, "executing side effect");
            match side_effect {
                SideEffectDescriptor::WriteFile { path, contents } => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(path, contents)?;
                }
                SideEffectDescriptor::CreateDirectory { path } => {
                    self.filesystem.create_dir_all(path)?;
                }
                SideEffectDescriptor::DeleteDirectory { path } => {
                    self.filesystem.delete_directory(path)?;
                }
                SideEffectDescriptor::Command { arguments } => {
                    self.filesystem.run_command(arguments)?;
                }
            }
        }
        Ok(())
    }
}

// ── Local filesystem ──────────────────────────────────────────────────────────

/// Production filesystem backed by `std::fs` and `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

fn write_error(path: &Path, error: impl std::fmt::Display) -> WeldError {
    WeldError::Write {
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> WeldResult<()> {
        std::fs::create_dir_all(path).map_err(|e| write_error(path, e))
    }

    fn write_file(&self, path: &Path, contents: &str) -> WeldResult<()> {
        std::fs::write(path, contents).map_err(|e| write_error(path, e))
    }

    fn delete_directory(&self, path: &Path) -> WeldResult<()> {
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(path).map_err(|e| write_error(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn run_command(&self, arguments: &[String]) -> WeldResult<()> {
        let Some((program, args)) = arguments.split_first() else {
            return Ok(());
        };
        let status = std::process::Command::new(program)
            .args(args)
            .status()
            .map_err(|e| WeldError::Internal {
                message: format!("could not run {program}: {e}"),
            })?;
        if !status.success() {
            return Err(WeldError::Internal {
                message: format!("{program} exited with {status}"),
            });
        }
        Ok(())
    }
}

// ── In-memory filesystem ──────────────────────────────────────────────────────

/// In-memory filesystem for tests; also records executed commands.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    commands: Vec<Vec<String>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.inner.read().ok()?.files.get(path).cloned()
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.inner.read().unwrap().files.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.inner.read().unwrap().commands.clone()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> WeldResult<()> {
        let mut inner = self.inner.write().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> WeldResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn delete_directory(&self, path: &Path) -> WeldResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner.directories.retain(|d| !d.starts_with(path));
        inner.files.retain(|f, _| !f.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn run_command(&self, arguments: &[String]) -> WeldResult<()> {
        self.inner
            .write()
            .unwrap()
            .commands
            .push(arguments.to_vec());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executor_runs_side_effects_in_order() {
        let filesystem = MemoryFilesystem::new();
        let effects = vec![
            SideEffectDescriptor::delete_directory("/p/Derived"),
            SideEffectDescriptor::write("/p/Derived/InfoPlists/App.plist", "<plist/>"),
        ];
        SideEffectExecutor::new(&filesystem)
            .execute(&effects)
            .unwrap();

        assert_eq!(
            filesystem.read_file(Path::new("/p/Derived/InfoPlists/App.plist")),
            Some("<plist/>".to_string())
        );
        assert!(filesystem.exists(Path::new("/p/Derived/InfoPlists")));
    }

    #[test]
    fn delete_then_write_leaves_the_new_file() {
        let filesystem = MemoryFilesystem::new();
        filesystem
            .write_file(Path::new("/p/Derived/stale.swift"), "old")
            .unwrap();
        let effects = vec![
            SideEffectDescriptor::delete_directory("/p/Derived"),
            SideEffectDescriptor::write("/p/Derived/fresh.swift", "new"),
        ];
        SideEffectExecutor::new(&filesystem)
            .execute(&effects)
            .unwrap();

        assert_eq!(filesystem.read_file(Path::new("/p/Derived/stale.swift")), None);
        assert_eq!(
            filesystem.read_file(Path::new("/p/Derived/fresh.swift")),
            Some("new".to_string())
        );
    }

    #[test]
    fn commands_are_recorded_by_the_memory_filesystem() {
        let filesystem = MemoryFilesystem::new();
        SideEffectExecutor::new(&filesystem)
            .execute(&[SideEffectDescriptor::Command {
                arguments: vec!["swiftlint".to_string()],
            }])
            .unwrap();
        assert_eq!(filesystem.commands(), vec![vec!["swiftlint".to_string()]]);
    }

    #[test]
    fn local_delete_of_a_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        LocalFilesystem::new()
            .delete_directory(&dir.path().join("missing"))
            .unwrap();
    }
}
