//! Build settings: base dictionaries plus per-configuration overlays.
//!
//! Emission order is part of the public contract: configurations iterate
//! in strictly ascending name order, debug before release on name ties.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── Setting values ────────────────────────────────────────────────────────────

/// A single build-setting value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    String(String),
    Array(Vec<String>),
}

impl SettingValue {
    /// Append entries, promoting a string value to an array first.
    pub fn appending(self, extra: impl IntoIterator<Item = String>) -> Self {
        let mut items = match self {
            Self::String(s) => vec![s],
            Self::Array(items) => items,
        };
        items.extend(extra);
        Self::Array(items)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        Self::Array(items)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Array(items) => f.write_str(&items.join(" ")),
        }
    }
}

pub type SettingsDictionary = IndexMap<String, SettingValue>;

// ── Build configurations ──────────────────────────────────────────────────────

/// Debug/release flavour of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    Release,
}

/// A named build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub variant: BuildVariant,
}

impl BuildConfiguration {
    pub fn debug(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: BuildVariant::Debug,
        }
    }

    pub fn release(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: BuildVariant::Release,
        }
    }
}

impl PartialOrd for BuildConfiguration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BuildConfiguration {
    // Lexicographic by name; debug sorts before release on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.variant.cmp(&other.variant))
    }
}

/// Per-configuration settings overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub settings: SettingsDictionary,
    pub xcconfig: Option<PathBuf>,
}

impl Configuration {
    pub fn with_settings(settings: SettingsDictionary) -> Self {
        Self {
            settings,
            xcconfig: None,
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Base settings plus the configuration table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub base: SettingsDictionary,
    configurations: IndexMap<BuildConfiguration, Option<Configuration>>,
}

impl Settings {
    pub fn new(
        base: SettingsDictionary,
        configurations: impl IntoIterator<Item = (BuildConfiguration, Option<Configuration>)>,
    ) -> Result<Self, DomainError> {
        let mut table: IndexMap<BuildConfiguration, Option<Configuration>> = IndexMap::new();
        for (configuration, overlay) in configurations {
            if table.keys().any(|c| c.name == configuration.name) {
                return Err(DomainError::DuplicateConfiguration {
                    name: configuration.name,
                });
            }
            table.insert(configuration, overlay);
        }
        Ok(Self {
            base,
            configurations: table,
        })
    }

    /// The conventional Debug + Release pair with no overlays.
    pub fn default_configurations() -> Self {
        let mut configurations = IndexMap::new();
        configurations.insert(BuildConfiguration::debug("Debug"), None);
        configurations.insert(BuildConfiguration::release("Release"), None);
        Self {
            base: IndexMap::new(),
            configurations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.configurations.is_empty()
    }

    /// Configurations in emission order: ascending by name, debug before
    /// release on ties.
    pub fn ordered_configurations(
        &self,
    ) -> Vec<(&BuildConfiguration, Option<&Configuration>)> {
        let mut entries: Vec<_> = self
            .configurations
            .iter()
            .map(|(c, overlay)| (c, overlay.as_ref()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Set a key in one configuration's overlay, creating the overlay if
    /// the configuration has none yet. Unknown names are ignored.
    pub fn set_configuration_setting(
        &mut self,
        configuration_name: &str,
        key: impl Into<String>,
        value: SettingValue,
    ) {
        for (configuration, overlay) in self.configurations.iter_mut() {
            if configuration.name == configuration_name {
                overlay
                    .get_or_insert_with(Configuration::default)
                    .settings
                    .insert(key.into(), value);
                return;
            }
        }
    }

    /// Name of the first debug configuration in emission order, falling
    /// back to `"Debug"` when none is declared.
    pub fn default_debug_configuration_name(&self) -> String {
        self.ordered_configurations()
            .iter()
            .find(|(c, _)| c.variant == BuildVariant::Debug)
            .map(|(c, _)| c.name.clone())
            .unwrap_or_else(|| "Debug".to_string())
    }

    /// Name of the first release configuration in emission order, falling
    /// back to `"Release"`.
    pub fn default_release_configuration_name(&self) -> String {
        self.ordered_configurations()
            .iter()
            .find(|(c, _)| c.variant == BuildVariant::Release)
            .map(|(c, _)| c.name.clone())
            .unwrap_or_else(|| "Release".to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
