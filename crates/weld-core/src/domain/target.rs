//! The `Target` model and its platform/product vocabulary.
//!
//! A `Target` is the fully-resolved description of a single buildable
//! product: globs have been expanded to absolute file lists, paths are
//! absolute, and the platform/product pair is known valid. Mappers receive
//! targets by value and return rewritten copies; nothing here mutates in
//! place after construction.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{
    dependency::TargetDependency,
    error::DomainError,
    plist::PlistValue,
    settings::Settings,
};

// ── Platform ──────────────────────────────────────────────────────────────────

/// A deployment platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Macos,
    Tvos,
    Watchos,
}

impl Platform {
    /// All platforms in their canonical (deterministic) order.
    pub const ALL: [Platform; 4] = [Self::Ios, Self::Macos, Self::Tvos, Self::Watchos];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
        }
    }

    /// The `SDKROOT` build setting value.
    pub const fn sdk_root(&self) -> &'static str {
        match self {
            Self::Ios => "iphoneos",
            Self::Macos => "macosx",
            Self::Tvos => "appletvos",
            Self::Watchos => "watchos",
        }
    }

    /// The `SUPPORTED_PLATFORMS` build setting value.
    pub const fn supported_platforms(&self) -> &'static str {
        match self {
            Self::Ios => "iphonesimulator iphoneos",
            Self::Macos => "macosx",
            Self::Tvos => "appletvsimulator appletvos",
            Self::Watchos => "watchsimulator watchos",
        }
    }

    /// The `TARGETED_DEVICE_FAMILY` value, when the platform carries one.
    pub const fn device_family(&self) -> Option<&'static str> {
        match self {
            Self::Ios => Some("1,2"),
            Self::Macos => None,
            Self::Tvos => Some("3"),
            Self::Watchos => Some("4"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "macos" | "osx" => Ok(Self::Macos),
            "tvos" => Ok(Self::Tvos),
            "watchos" => Ok(Self::Watchos),
            other => Err(DomainError::UnknownPlatform {
                name: other.to_string(),
            }),
        }
    }
}

// ── Product ───────────────────────────────────────────────────────────────────

/// The kind of artefact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    App,
    Framework,
    StaticFramework,
    StaticLibrary,
    DynamicLibrary,
    UnitTests,
    UiTests,
    Bundle,
    AppExtension,
    MessagesExtension,
    Watch2App,
    Watch2Extension,
    TvTopShelfExtension,
    StickerPackExtension,
    AppClip,
    CommandLineTool,
}

impl Product {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Framework => "framework",
            Self::StaticFramework => "static_framework",
            Self::StaticLibrary => "static_library",
            Self::DynamicLibrary => "dynamic_library",
            Self::UnitTests => "unit_tests",
            Self::UiTests => "ui_tests",
            Self::Bundle => "bundle",
            Self::AppExtension => "app_extension",
            Self::MessagesExtension => "messages_extension",
            Self::Watch2App => "watch2_app",
            Self::Watch2Extension => "watch2_extension",
            Self::TvTopShelfExtension => "tv_top_shelf_extension",
            Self::StickerPackExtension => "sticker_pack_extension",
            Self::AppClip => "app_clip",
            Self::CommandLineTool => "command_line_tool",
        }
    }

    /// Whether a scheme can launch this product directly.
    pub const fn is_runnable(&self) -> bool {
        matches!(
            self,
            Self::App | Self::AppClip | Self::Watch2App | Self::CommandLineTool
        )
    }

    pub const fn is_tests(&self) -> bool {
        matches!(self, Self::UnitTests | Self::UiTests)
    }

    /// Whether this product can act as a host application for test bundles
    /// and application extensions.
    pub const fn can_host_tests(&self) -> bool {
        matches!(self, Self::App | Self::AppClip | Self::Watch2App)
    }

    pub const fn is_extension(&self) -> bool {
        matches!(
            self,
            Self::AppExtension
                | Self::MessagesExtension
                | Self::Watch2Extension
                | Self::TvTopShelfExtension
                | Self::StickerPackExtension
        )
    }

    /// Whether the product participates in linking (ends up in a link phase
    /// of whatever depends on it).
    pub const fn is_linkable(&self) -> bool {
        matches!(
            self,
            Self::Framework | Self::StaticFramework | Self::StaticLibrary | Self::DynamicLibrary
        )
    }

    /// Name of the built artefact, e.g. `App.app` or `Kit.framework`.
    pub fn built_name(&self, target_name: &str) -> String {
        match self {
            Self::App | Self::AppClip | Self::Watch2App => format!("{target_name}.app"),
            Self::Framework | Self::StaticFramework => format!("{target_name}.framework"),
            Self::StaticLibrary => format!("lib{target_name}.a"),
            Self::DynamicLibrary => format!("lib{target_name}.dylib"),
            Self::UnitTests | Self::UiTests => format!("{target_name}.xctest"),
            Self::Bundle => format!("{target_name}.bundle"),
            Self::AppExtension
            | Self::MessagesExtension
            | Self::Watch2Extension
            | Self::TvTopShelfExtension
            | Self::StickerPackExtension => format!("{target_name}.appex"),
            Self::CommandLineTool => target_name.to_string(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "app" => Ok(Self::App),
            "framework" => Ok(Self::Framework),
            "static_framework" => Ok(Self::StaticFramework),
            "static_library" => Ok(Self::StaticLibrary),
            "dynamic_library" => Ok(Self::DynamicLibrary),
            "unit_tests" => Ok(Self::UnitTests),
            "ui_tests" => Ok(Self::UiTests),
            "bundle" => Ok(Self::Bundle),
            "app_extension" => Ok(Self::AppExtension),
            "messages_extension" => Ok(Self::MessagesExtension),
            "watch2_app" => Ok(Self::Watch2App),
            "watch2_extension" => Ok(Self::Watch2Extension),
            "tv_top_shelf_extension" => Ok(Self::TvTopShelfExtension),
            "sticker_pack_extension" => Ok(Self::StickerPackExtension),
            "app_clip" => Ok(Self::AppClip),
            "command_line_tool" => Ok(Self::CommandLineTool),
            other => Err(DomainError::UnknownProduct {
                name: other.to_string(),
            }),
        }
    }
}

// ── Deployment targets ────────────────────────────────────────────────────────

/// A device class a deployment target supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Iphone,
    Ipad,
    Mac,
    AppleTv,
    AppleWatch,
}

/// Minimum OS version a target supports, per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum DeploymentTarget {
    Ios { version: String, devices: Vec<Device> },
    Macos { version: String },
    Tvos { version: String },
    Watchos { version: String },
}

impl DeploymentTarget {
    pub fn version(&self) -> &str {
        match self {
            Self::Ios { version, .. }
            | Self::Macos { version }
            | Self::Tvos { version }
            | Self::Watchos { version } => version,
        }
    }

    pub const fn platform(&self) -> Platform {
        match self {
            Self::Ios { .. } => Platform::Ios,
            Self::Macos { .. } => Platform::Macos,
            Self::Tvos { .. } => Platform::Tvos,
            Self::Watchos { .. } => Platform::Watchos,
        }
    }

    /// Default deployment target for a platform at a given version.
    pub fn for_platform(platform: Platform, version: impl Into<String>) -> Self {
        match platform {
            Platform::Ios => Self::Ios {
                version: version.into(),
                devices: vec![Device::Iphone, Device::Ipad, Device::Mac],
            },
            Platform::Macos => Self::Macos {
                version: version.into(),
            },
            Platform::Tvos => Self::Tvos {
                version: version.into(),
            },
            Platform::Watchos => Self::Watchos {
                version: version.into(),
            },
        }
    }
}

// ── Info plist ────────────────────────────────────────────────────────────────

/// Where a target's Info.plist comes from: a user-authored file, or a
/// dictionary the generator materialises into `Derived/InfoPlists`.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoPlist {
    File(PathBuf),
    Dictionary(IndexMap<String, PlistValue>),
}

impl InfoPlist {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File(path) => Some(path),
            Self::Dictionary(_) => None,
        }
    }
}

// ── Supporting values ─────────────────────────────────────────────────────────

/// A launch argument toggled in a scheme's run action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchArgument {
    pub name: String,
    pub enabled: bool,
}

/// A Core Data model bundled with a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreDataModel {
    pub path: PathBuf,
    pub current_version: String,
}

/// When a script action runs relative to the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOrder {
    Pre,
    Post,
}

/// A user script phase attached to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAction {
    pub name: String,
    pub order: ActionOrder,
    pub script: String,
    pub show_environment_vars: bool,
}

/// Header file groups, post glob expansion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    pub public: Vec<PathBuf>,
    pub private: Vec<PathBuf>,
    pub project: Vec<PathBuf>,
}

/// A resource entry: a matched file, or a folder reference kept opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceFileElement {
    File(PathBuf),
    FolderReference(PathBuf),
}

impl ResourceFileElement {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::File(path) | Self::FolderReference(path) => path,
        }
    }
}

// ── Target ────────────────────────────────────────────────────────────────────

/// A single buildable product description.
///
/// Invariant (checked by the converter): `name` is unique within the owning
/// `Project`.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub platform: Platform,
    pub product: Product,
    pub bundle_id: String,
    pub deployment_target: Option<DeploymentTarget>,
    pub info_plist: Option<InfoPlist>,
    pub entitlements: Option<PathBuf>,
    pub sources: Vec<PathBuf>,
    pub resources: Vec<ResourceFileElement>,
    pub headers: Option<Headers>,
    pub dependencies: Vec<TargetDependency>,
    pub settings: Option<Settings>,
    pub environment: IndexMap<String, String>,
    pub launch_arguments: Vec<LaunchArgument>,
    pub core_data_models: Vec<CoreDataModel>,
    pub actions: Vec<TargetAction>,
}

impl Target {
    /// A target with only the identifying fields set. Mappers and tests
    /// start here and override what they need.
    pub fn new(name: impl Into<String>, platform: Platform, product: Product) -> Self {
        let name = name.into();
        let bundle_id = format!("io.weld.{name}");
        Self {
            name,
            platform,
            product,
            bundle_id,
            deployment_target: None,
            info_plist: None,
            entitlements: None,
            sources: Vec::new(),
            resources: Vec::new(),
            headers: None,
            dependencies: Vec::new(),
            settings: None,
            environment: IndexMap::new(),
            launch_arguments: Vec::new(),
            core_data_models: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Name of the built artefact, e.g. `App.app`.
    pub fn product_name(&self) -> String {
        self.product.built_name(&self.name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.platform, self.product)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_aliases() {
        assert_eq!(Platform::from_str("iOS").unwrap(), Platform::Ios);
        assert_eq!(Platform::from_str("osx").unwrap(), Platform::Macos);
        assert!(Platform::from_str("solaris").is_err());
    }

    #[test]
    fn product_round_trips_through_str() {
        for s in ["app", "static_framework", "watch2_extension", "app_clip"] {
            assert_eq!(Product::from_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn runnable_products() {
        assert!(Product::App.is_runnable());
        assert!(Product::CommandLineTool.is_runnable());
        assert!(!Product::Framework.is_runnable());
        assert!(!Product::AppExtension.is_runnable());
    }

    #[test]
    fn built_names() {
        assert_eq!(Product::App.built_name("My"), "My.app");
        assert_eq!(Product::StaticLibrary.built_name("Core"), "libCore.a");
        assert_eq!(Product::UnitTests.built_name("CoreTests"), "CoreTests.xctest");
        assert_eq!(Product::CommandLineTool.built_name("weld"), "weld");
    }

    #[test]
    fn ios_deployment_target_defaults_all_devices() {
        let dt = DeploymentTarget::for_platform(Platform::Ios, "13.0");
        match dt {
            DeploymentTarget::Ios { version, devices } => {
                assert_eq!(version, "13.0");
                assert_eq!(devices, vec![Device::Iphone, Device::Ipad, Device::Mac]);
            }
            other => panic!("expected iOS deployment target, got {other:?}"),
        }
    }

    #[test]
    fn device_family_per_platform() {
        assert_eq!(Platform::Ios.device_family(), Some("1,2"));
        assert_eq!(Platform::Macos.device_family(), None);
        assert_eq!(Platform::Tvos.device_family(), Some("3"));
    }
}
