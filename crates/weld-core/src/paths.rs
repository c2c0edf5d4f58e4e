//! Path algebra and glob expansion.
//!
//! Globs are expanded with the `glob` crate. The throwing variant first
//! resolves the longest wildcard-free prefix of the pattern against the
//! root; a missing prefix directory is an error, while an existing prefix
//! with no matches yields an empty list.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlobError {
    #[error("directory {} referenced by glob '{pattern}' does not exist", .resolved_root.display())]
    NonExistentDirectory {
        pattern: String,
        resolved_root: PathBuf,
    },

    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

const WILDCARDS: [char; 4] = ['*', '{', '}', '?'];

/// Expand `pattern` relative to `root`, returning matches in lexicographic
/// order. Missing directories and empty matches both yield an empty list.
pub fn glob(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = root.join(pattern);
    let Some(full) = full.to_str() else {
        return Vec::new();
    };
    let Ok(entries) = glob::glob(full) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
    paths.sort();
    paths
}

/// Like [`glob`], but fails when the wildcard-free prefix of the pattern
/// does not resolve to an existing directory under `root`.
pub fn throwing_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, GlobError> {
    let prefix = wildcard_free_prefix(pattern);
    let resolved_root = root.join(&prefix);
    if !resolved_root.is_dir() {
        return Err(GlobError::NonExistentDirectory {
            pattern: pattern.to_string(),
            resolved_root,
        });
    }
    let full = root.join(pattern);
    let full = full.to_str().ok_or_else(|| GlobError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: "path is not valid UTF-8".to_string(),
    })?;
    let entries = glob::glob(full).map_err(|e| GlobError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })?;
    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
    paths.sort();
    Ok(paths)
}

/// The longest leading run of path components free of wildcard
/// metacharacters.
fn wildcard_free_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern).components() {
        let Component::Normal(part) = component else {
            prefix.push(component.as_os_str());
            continue;
        };
        let part_str = part.to_string_lossy();
        if part_str.contains(|c| WILDCARDS.contains(&c)) {
            break;
        }
        prefix.push(part);
    }
    prefix
}

/// Lexically normalize a path: resolve `.` and `..` components without
/// touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// The deepest directory that is an ancestor of both paths.
pub fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
    let mut ancestor = PathBuf::new();
    for (left, right) in a.components().zip(b.components()) {
        if left != right {
            break;
        }
        ancestor.push(left.as_os_str());
    }
    ancestor
}

/// The path with its final component removed; root paths are returned
/// unchanged.
pub fn remove_last_component(path: &Path) -> PathBuf {
    path.parent().map_or_else(|| path.to_path_buf(), Path::to_path_buf)
}

pub fn is_folder(path: &Path) -> bool {
    path.is_dir()
}

/// Split `"Target.Config.ext"` into `("Target", "Config")`.
///
/// Returns `None` unless exactly two dot-separated components precede the
/// extension.
pub fn extract_target_and_configuration_name(file_name: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = file_name.split('.').collect();
    match parts.as_slice() {
        [target, configuration, _ext]
            if !target.is_empty() && !configuration.is_empty() =>
        {
            Some((target.to_string(), configuration.to_string()))
        }
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
