//! Declarative filesystem commands produced by mappers.
//!
//! Side effects are collected during mapping and executed only after every
//! descriptor has been generated successfully; nothing touches disk before
//! that point.

use std::fmt;
use std::path::PathBuf;

/// One deferred filesystem command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffectDescriptor {
    WriteFile { path: PathBuf, contents: String },
    CreateDirectory { path: PathBuf },
    DeleteDirectory { path: PathBuf },
    Command { arguments: Vec<String> },
}

impl SideEffectDescriptor {
    pub fn write(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self::WriteFile {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn delete_directory(path: impl Into<PathBuf>) -> Self {
        Self::DeleteDirectory { path: path.into() }
    }
}

impl fmt::Display for SideEffectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFile { path, .. } => write!(f, "write {}", path.display()),
            Self::CreateDirectory { path } => write!(f, "mkdir {}", path.display()),
            Self::DeleteDirectory { path } => write!(f, "rmdir {}", path.display()),
            Self::Command { arguments } => write!(f, "run {}", arguments.join(" ")),
        }
    }
}
