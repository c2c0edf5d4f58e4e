//! weld-core: model, loaders, mappers and descriptor generation.
//!
//! The crate is layered the same way the data flows:
//!
//! ```text
//! manifests ──► models ──► graph ──► mapped graph ──► descriptors
//!    (B,C)        (E)       (F)         (G,H)            (I)
//! ```
//!
//! - [`manifest`] loads user-authored manifest values through the
//!   [`manifest::ManifestLoading`] port and follows project references
//!   recursively with a cycle-safe cache.
//! - [`dependencies`] lowers a resolved package workspace into synthetic
//!   projects and linker edges.
//! - [`convert`] turns manifest values into the typed model in [`domain`],
//!   expanding globs via [`paths`].
//! - [`graph`] assembles and validates the cross-project graph.
//! - [`mappers`] transform projects and the graph; side effects are
//!   collected, never executed here.
//! - [`descriptors`] emit the filesystem-agnostic result the writer
//!   materialises.
//!
//! All I/O beyond read-only glob expansion sits behind ports implemented
//! in `weld-adapters`; tests inject in-memory implementations through
//! [`services::Services`].

pub mod convert;
pub mod dependencies;
pub mod descriptors;
pub mod domain;
pub mod error;
pub mod generator;
pub mod graph;
pub mod manifest;
pub mod mappers;
pub mod paths;
pub mod services;

pub mod prelude {
    pub use crate::descriptors::{ProjectDescriptor, SchemeDescriptor, WorkspaceDescriptor};
    pub use crate::domain::{
        Config, Platform, Product, Project, Scheme, Settings, Target, TargetDependency, Workspace,
    };
    pub use crate::error::{WeldError, WeldResult};
    pub use crate::generator::{DescriptorWriting, Generator};
    pub use crate::manifest::ManifestLoading;
    pub use crate::services::{Reporter, Services};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
