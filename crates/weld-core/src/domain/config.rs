//! The `Config` value and its generation options.
//!
//! Options form a closed set; `Config::new` discards later duplicates of
//! the single-occurrence options (`xcode_project_name`, `organization_name`)
//! so every consumer can take the first match without re-checking.

use std::path::PathBuf;

use indexmap::IndexMap;

/// One generation option from the closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOption {
    /// Template for the generated container name; `$(project_name)` expands
    /// to the project's logical name.
    XcodeProjectName(String),
    OrganizationName(String),
    DevelopmentRegion(String),
    DisableAutogeneratedSchemes,
    DisableSynthesizedResourceAccessors,
    DisableShowEnvironmentVarsInScriptPhases,
    EnableCodeCoverage,
    ResolveDependenciesWithSystemScm,
    DisablePackageVersionLocking,
    TemplateMacros(IndexMap<String, String>),
    SwiftToolsVersion(String),
}

/// Cloud feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudOption {
    Insights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub url: String,
    pub project_id: String,
    pub options: Vec<CloudOption>,
}

/// Remote/local artefact cache configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cache {
    pub path: Option<PathBuf>,
}

/// Where a plugin is loaded from.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginLocation {
    Local { path: PathBuf },
    Git { url: String, tag: String },
}

/// Which IDE versions the generated workspace is declared compatible with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompatibleIdeVersions {
    #[default]
    All,
    List(Vec<String>),
}

/// Top-level generation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    generation_options: Vec<GenerationOption>,
    pub compatible_ide_versions: CompatibleIdeVersions,
    pub cloud: Option<Cloud>,
    pub cache: Option<Cache>,
    pub plugins: Vec<PluginLocation>,
}

impl Config {
    /// Builds a config, discarding later duplicates of the
    /// single-occurrence options.
    pub fn new(
        options: impl IntoIterator<Item = GenerationOption>,
        compatible_ide_versions: CompatibleIdeVersions,
        cloud: Option<Cloud>,
        cache: Option<Cache>,
        plugins: Vec<PluginLocation>,
    ) -> Self {
        let mut generation_options: Vec<GenerationOption> = Vec::new();
        for option in options {
            let duplicate = match option {
                GenerationOption::XcodeProjectName(_) => generation_options
                    .iter()
                    .any(|o| matches!(o, GenerationOption::XcodeProjectName(_))),
                GenerationOption::OrganizationName(_) => generation_options
                    .iter()
                    .any(|o| matches!(o, GenerationOption::OrganizationName(_))),
                _ => false,
            };
            if !duplicate {
                generation_options.push(option);
            }
        }
        Self {
            generation_options,
            compatible_ide_versions,
            cloud,
            cache,
            plugins,
        }
    }

    pub fn generation_options(&self) -> &[GenerationOption] {
        &self.generation_options
    }

    /// First `xcode_project_name` template, if any.
    pub fn xcode_project_name(&self) -> Option<&str> {
        self.generation_options.iter().find_map(|o| match o {
            GenerationOption::XcodeProjectName(template) => Some(template.as_str()),
            _ => None,
        })
    }

    /// First `organization_name`, if any.
    pub fn organization_name(&self) -> Option<&str> {
        self.generation_options.iter().find_map(|o| match o {
            GenerationOption::OrganizationName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn autogenerated_schemes_disabled(&self) -> bool {
        self.generation_options
            .iter()
            .any(|o| matches!(o, GenerationOption::DisableAutogeneratedSchemes))
    }

    pub fn synthesized_resource_accessors_disabled(&self) -> bool {
        self.generation_options
            .iter()
            .any(|o| matches!(o, GenerationOption::DisableSynthesizedResourceAccessors))
    }

    pub fn code_coverage_enabled(&self) -> bool {
        self.generation_options
            .iter()
            .any(|o| matches!(o, GenerationOption::EnableCodeCoverage))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_options: Vec::new(),
            compatible_ide_versions: CompatibleIdeVersions::All,
            cloud: None,
            cache: None,
            plugins: Vec::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
