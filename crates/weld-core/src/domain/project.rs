//! The `Project` and `Workspace` models.

use std::path::PathBuf;

use crate::domain::{
    scheme::Scheme,
    settings::Settings,
    target::Target,
};

/// A file or folder reference surfaced in the IDE without belonging to a
/// target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileElement {
    File(PathBuf),
    FolderReference(PathBuf),
}

impl FileElement {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::File(path) | Self::FolderReference(path) => path,
        }
    }
}

/// The resource kinds the accessor synthesizer recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceSynthesizer {
    Assets,
    Strings,
    Fonts,
    Plists,
    InterfaceBuilder,
}

impl ResourceSynthesizer {
    pub const ALL: [ResourceSynthesizer; 5] = [
        Self::Assets,
        Self::Strings,
        Self::Fonts,
        Self::Plists,
        Self::InterfaceBuilder,
    ];

    /// File extensions that trigger this synthesizer.
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Assets => &["xcassets"],
            Self::Strings => &["strings", "stringsdict"],
            Self::Fonts => &["otf", "ttc", "ttf"],
            Self::Plists => &["plist"],
            Self::InterfaceBuilder => &["storyboard", "xib"],
        }
    }

    /// Prefix of the generated accessor file, e.g. `Assets+App.swift`.
    pub const fn accessor_prefix(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Strings => "Strings",
            Self::Fonts => "Fonts",
            Self::Plists => "Plists",
            Self::InterfaceBuilder => "Storyboards",
        }
    }
}

/// A project: a set of targets with shared settings and schemes.
///
/// `name` is the logical name used in scheme references and templates;
/// `file_name` is what the generated container directory is called (they
/// differ when the `xcode_project_name` generation option is set).
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub path: PathBuf,
    pub name: String,
    pub file_name: String,
    pub organization_name: Option<String>,
    pub targets: Vec<Target>,
    pub schemes: Vec<Scheme>,
    pub settings: Settings,
    pub additional_files: Vec<FileElement>,
    pub resource_synthesizers: Vec<ResourceSynthesizer>,
}

impl Project {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: path.into(),
            file_name: name.clone(),
            name,
            organization_name: None,
            targets: Vec::new(),
            schemes: Vec::new(),
            settings: Settings::default_configurations(),
            additional_files: Vec::new(),
            resource_synthesizers: ResourceSynthesizer::ALL.to_vec(),
        }
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Directory for generator-materialised files (info plists, accessors).
    pub fn derived_directory(&self) -> PathBuf {
        self.path.join("Derived")
    }

    /// The configuration launched by default for debug-flavoured actions.
    pub fn default_debug_build_configuration_name(&self) -> String {
        self.settings.default_debug_configuration_name()
    }
}

/// A workspace: an ordered set of project directories plus loose files and
/// workspace-level schemes.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub path: PathBuf,
    pub name: String,
    pub projects: Vec<PathBuf>,
    pub additional_files: Vec<FileElement>,
    pub schemes: Vec<Scheme>,
}

impl Workspace {
    /// Builds a workspace, deduplicating the project list while preserving
    /// first occurrence.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        projects: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        let mut deduped: Vec<PathBuf> = Vec::new();
        for project in projects {
            if !deduped.contains(&project) {
                deduped.push(project);
            }
        }
        Self {
            path: path.into(),
            name: name.into(),
            projects: deduped,
            additional_files: Vec::new(),
            schemes: Vec::new(),
        }
    }

    /// Append project paths not already present.
    pub fn adding_projects(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        for project in extra {
            if !self.projects.contains(&project) {
                self.projects.push(project);
            }
        }
        self
    }
}
