//! Manifest values: what the user authored, straight after decoding.
//!
//! Paths are relative to the manifest's directory and globs are raw
//! strings; the converter resolves both. These types are the only thing
//! the manifest-loading port produces.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::domain::plist::PlistValue;

// ── Shared fragments ──────────────────────────────────────────────────────────

/// A glob, or a list of globs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GlobList {
    Single(String),
    Many(Vec<String>),
}

impl GlobList {
    pub fn globs(&self) -> Vec<&str> {
        match self {
            Self::Single(glob) => vec![glob.as_str()],
            Self::Many(globs) => globs.iter().map(String::as_str).collect(),
        }
    }
}

/// A loose file element: a file glob or a folder reference.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileElementManifest {
    Glob(String),
    FolderReference { folder_reference: String },
}

/// A resource entry: plain glob, glob with excludes, or folder reference.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceElementManifest {
    Glob(String),
    GlobWithExcludes {
        glob: String,
        #[serde(default)]
        excluding: Vec<String>,
    },
    FolderReference { folder_reference: String },
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SettingValueManifest {
    String(String),
    Array(Vec<String>),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfigurationManifest {
    pub name: String,
    pub variant: String,
    #[serde(default)]
    pub settings: IndexMap<String, SettingValueManifest>,
    #[serde(default)]
    pub xcconfig: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SettingsManifest {
    #[serde(default)]
    pub base: IndexMap<String, SettingValueManifest>,
    #[serde(default)]
    pub configurations: Vec<ConfigurationManifest>,
}

// ── Dependencies ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DependencyManifest {
    Target {
        name: String,
    },
    Project {
        target: String,
        path: String,
    },
    Framework {
        path: String,
    },
    Xcframework {
        path: String,
    },
    Library {
        path: String,
        #[serde(default)]
        public_headers: Option<String>,
        #[serde(default)]
        swift_module_map: Option<String>,
    },
    Sdk {
        name: String,
        #[serde(default)]
        status: Option<String>,
    },
    Package {
        product: String,
    },
    Cocoapods {
        path: String,
    },
    External {
        name: String,
    },
}

// ── Targets ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeploymentTargetManifest {
    pub platform: String,
    pub version: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InfoPlistManifest {
    File(String),
    Dictionary(IndexMap<String, PlistValue>),
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct HeadersManifest {
    #[serde(default)]
    pub public: Option<GlobList>,
    #[serde(default)]
    pub private: Option<GlobList>,
    #[serde(default)]
    pub project: Option<GlobList>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LaunchArgumentManifest {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CoreDataModelManifest {
    pub path: String,
    pub current_version: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActionManifest {
    pub name: String,
    pub order: String,
    pub script: String,
    #[serde(default)]
    pub show_environment_vars: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TargetManifest {
    pub name: String,
    pub platform: String,
    pub product: String,
    pub bundle_id: String,
    #[serde(default)]
    pub deployment_target: Option<DeploymentTargetManifest>,
    #[serde(default)]
    pub info_plist: Option<InfoPlistManifest>,
    #[serde(default)]
    pub entitlements: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceElementManifest>,
    #[serde(default)]
    pub headers: Option<HeadersManifest>,
    #[serde(default)]
    pub dependencies: Vec<DependencyManifest>,
    #[serde(default)]
    pub settings: Option<SettingsManifest>,
    #[serde(default)]
    pub environment: IndexMap<String, String>,
    #[serde(default)]
    pub launch_arguments: Vec<LaunchArgumentManifest>,
    #[serde(default)]
    pub core_data_models: Vec<CoreDataModelManifest>,
    #[serde(default)]
    pub actions: Vec<ActionManifest>,
}

// ── Schemes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArgumentsManifest {
    #[serde(default)]
    pub environment: IndexMap<String, String>,
    #[serde(default)]
    pub launch_arguments: Vec<LaunchArgumentManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BuildActionManifest {
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TestActionManifest {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub coverage: bool,
    #[serde(default)]
    pub arguments: Option<ArgumentsManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunActionManifest {
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub arguments: Option<ArgumentsManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemeManifest {
    pub name: String,
    #[serde(default = "default_shared")]
    pub shared: bool,
    #[serde(default)]
    pub build_action: Option<BuildActionManifest>,
    #[serde(default)]
    pub test_action: Option<TestActionManifest>,
    #[serde(default)]
    pub run_action: Option<RunActionManifest>,
}

fn default_shared() -> bool {
    true
}

// ── Project / workspace / config ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProjectManifest {
    pub name: String,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub settings: Option<SettingsManifest>,
    #[serde(default)]
    pub targets: Vec<TargetManifest>,
    #[serde(default)]
    pub schemes: Vec<SchemeManifest>,
    #[serde(default)]
    pub additional_files: Vec<FileElementManifest>,
    #[serde(default)]
    pub resource_synthesizers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspaceManifest {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub additional_files: Vec<FileElementManifest>,
    #[serde(default)]
    pub schemes: Vec<SchemeManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationOptionManifest {
    XcodeProjectName { value: String },
    OrganizationName { value: String },
    DevelopmentRegion { value: String },
    DisableAutogeneratedSchemes,
    DisableSynthesizedResourceAccessors,
    DisableShowEnvironmentVarsInScriptPhases,
    EnableCodeCoverage,
    ResolveDependenciesWithSystemScm,
    DisablePackageVersionLocking,
    TemplateMacros { value: IndexMap<String, String> },
    SwiftToolsVersion { value: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CloudManifest {
    pub url: String,
    pub project_id: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct CacheManifest {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginLocationManifest {
    Local { path: String },
    Git { url: String, tag: String },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ConfigManifest {
    #[serde(default)]
    pub generation_options: Vec<GenerationOptionManifest>,
    #[serde(default)]
    pub compatible_ide_versions: Option<Vec<String>>,
    #[serde(default)]
    pub cloud: Option<CloudManifest>,
    #[serde(default)]
    pub cache: Option<CacheManifest>,
    #[serde(default)]
    pub plugins: Vec<PluginLocationManifest>,
}

/// Configuration for the external-dependencies resolver.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct DependenciesManifest {
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub product_types: IndexMap<String, String>,
}

/// A file-generation template; loaded for discovery, consumed elsewhere.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TemplateManifest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub items: Vec<TemplateItemManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateItemManifest {
    pub path: String,
    pub contents: String,
}
