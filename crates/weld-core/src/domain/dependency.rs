//! The tagged dependency variants a target can declare.
//!
//! Every consumer matches exhaustively; adding a variant here deliberately
//! breaks the converter, the graph loader, and the external-dependencies
//! generator until they handle it.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Whether a linked SDK is required at runtime or weak-linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkStatus {
    Required,
    Optional,
}

/// One dependency edge declared by a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetDependency {
    /// Another target in the same project.
    Target { name: String },
    /// A target in another project; `path` may be relative to the declaring
    /// project's directory.
    Project { target: String, path: PathBuf },
    /// A pre-built framework on disk.
    Framework { path: PathBuf },
    /// A pre-built XCFramework on disk.
    Xcframework { path: PathBuf },
    /// A pre-built static or dynamic library.
    Library {
        path: PathBuf,
        public_headers: Option<PathBuf>,
        swift_module_map: Option<PathBuf>,
    },
    /// A system SDK framework or tbd.
    Sdk { name: String, status: SdkStatus },
    /// A product vended by a package dependency.
    Package { product: String },
    /// A CocoaPods checkout rooted at `path`.
    Cocoapods { path: PathBuf },
    /// A product declared in the external dependencies graph, resolved
    /// during graph load.
    External { name: String },
}

impl TargetDependency {
    pub fn sdk(name: impl Into<String>, status: SdkStatus) -> Self {
        Self::Sdk {
            name: name.into(),
            status,
        }
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self::Target { name: name.into() }
    }
}

impl fmt::Display for TargetDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target { name } => write!(f, "target:{name}"),
            Self::Project { target, path } => {
                write!(f, "project:{target}@{}", path.display())
            }
            Self::Framework { path } => write!(f, "framework:{}", path.display()),
            Self::Xcframework { path } => write!(f, "xcframework:{}", path.display()),
            Self::Library { path, .. } => write!(f, "library:{}", path.display()),
            Self::Sdk { name, .. } => write!(f, "sdk:{name}"),
            Self::Package { product } => write!(f, "package:{product}"),
            Self::Cocoapods { path } => write!(f, "cocoapods:{}", path.display()),
            Self::External { name } => write!(f, "external:{name}"),
        }
    }
}
