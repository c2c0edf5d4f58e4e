//! Schemes: named sets of build/test/run/profile/analyze/archive actions.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::domain::target::LaunchArgument;

/// A reference to a target by owning project path and target name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetReference {
    pub project_path: PathBuf,
    pub name: String,
}

impl TargetReference {
    pub fn new(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            name: name.into(),
        }
    }
}

/// Environment variables and launch arguments passed to a launched target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arguments {
    pub environment: IndexMap<String, String>,
    pub launch_arguments: Vec<LaunchArgument>,
}

impl Arguments {
    pub fn is_empty(&self) -> bool {
        self.environment.is_empty() && self.launch_arguments.is_empty()
    }
}

/// Runtime diagnostics toggles carried by run and test actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticsOption {
    MainThreadChecker,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildAction {
    pub targets: Vec<TargetReference>,
}

impl BuildAction {
    pub fn new(targets: Vec<TargetReference>) -> Self {
        Self { targets }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAction {
    pub targets: Vec<TargetReference>,
    pub build_configuration: String,
    pub coverage: bool,
    pub code_coverage_targets: Vec<TargetReference>,
    pub arguments: Option<Arguments>,
    pub diagnostics_options: Vec<DiagnosticsOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAction {
    pub build_configuration: String,
    pub executable: Option<TargetReference>,
    pub arguments: Option<Arguments>,
    pub diagnostics_options: Vec<DiagnosticsOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileAction {
    pub build_configuration: String,
    pub executable: Option<TargetReference>,
    pub arguments: Option<Arguments>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeAction {
    pub build_configuration: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveAction {
    pub build_configuration: String,
    pub reveal_archive_in_organizer: bool,
}

impl Default for ArchiveAction {
    fn default() -> Self {
        Self {
            build_configuration: "Release".to_string(),
            reveal_archive_in_organizer: true,
        }
    }
}

/// A named set of actions over one or more targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub name: String,
    pub shared: bool,
    pub build_action: Option<BuildAction>,
    pub test_action: Option<TestAction>,
    pub run_action: Option<RunAction>,
    pub profile_action: Option<ProfileAction>,
    pub analyze_action: Option<AnalyzeAction>,
    pub archive_action: Option<ArchiveAction>,
}

impl Scheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: true,
            build_action: None,
            test_action: None,
            run_action: None,
            profile_action: None,
            analyze_action: None,
            archive_action: None,
        }
    }
}
