//! Domain-level errors: violations of model invariants.
//!
//! These are the errors a model value can produce on its own, without any
//! I/O. Loading, conversion, and graph errors live next to their components.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown platform: {name}")]
    UnknownPlatform { name: String },

    #[error("unknown product: {name}")]
    UnknownProduct { name: String },

    #[error("duplicate target '{name}' in project '{project}'")]
    DuplicateTarget { project: String, name: String },

    #[error("duplicate build configuration '{name}'")]
    DuplicateConfiguration { name: String },

    #[error("invalid manifest value: {reason}")]
    InvalidValue { reason: String },
}
