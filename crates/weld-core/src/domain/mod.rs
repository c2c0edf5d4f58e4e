//! The typed model used throughout the core.
//!
//! Everything here is an immutable value: mappers and converters build new
//! instances rather than mutating shared state. I/O, manifest parsing, and
//! descriptor writing live behind ports; this layer only depends on
//! `thiserror`, `serde`, and `indexmap`.

pub mod config;
pub mod dependency;
pub mod error;
pub mod plist;
pub mod project;
pub mod scheme;
pub mod settings;
pub mod side_effect;
pub mod target;

pub use config::{
    Cache, Cloud, CloudOption, CompatibleIdeVersions, Config, GenerationOption, PluginLocation,
};
pub use dependency::{SdkStatus, TargetDependency};
pub use error::DomainError;
pub use plist::PlistValue;
pub use project::{FileElement, Project, ResourceSynthesizer, Workspace};
pub use scheme::{
    AnalyzeAction, ArchiveAction, Arguments, BuildAction, DiagnosticsOption, ProfileAction,
    RunAction, Scheme, TargetReference, TestAction,
};
pub use settings::{
    BuildConfiguration, BuildVariant, Configuration, SettingValue, Settings, SettingsDictionary,
};
pub use side_effect::SideEffectDescriptor;
pub use target::{
    ActionOrder, CoreDataModel, DeploymentTarget, Device, Headers, InfoPlist, LaunchArgument,
    Platform, Product, ResourceFileElement, Target, TargetAction,
};
