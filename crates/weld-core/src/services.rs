//! The services context threaded through public operations.
//!
//! Everything the core needs from the outside world (warning reporting,
//! package loading, info-plist content, artifact cache lookups, the current
//! OS user) travels in one [`Services`] value. Tests construct it with
//! in-memory implementations instead of patching globals.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    dependencies::{CarthageInteracting, NoPackages, NullCarthage, PackageLoading},
    domain::{plist::PlistValue, Product, Target},
};

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Port for structured, non-fatal user-facing diagnostics.
///
/// Warnings never fail a run; they are collected and surfaced once
/// generation finishes.
pub trait Reporter: Send + Sync {
    fn warning(&self, message: &str);
}

/// Reporter that forwards to the `tracing` subscriber.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Reporter that drops everything. Useful as a test default.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn warning(&self, _message: &str) {}
}

// ── Info plist content ────────────────────────────────────────────────────────

/// Port that materialises a synthesized Info.plist dictionary for a target.
pub trait InfoPlistContentProviding: Send + Sync {
    fn content(
        &self,
        target: &Target,
        extra: &IndexMap<String, PlistValue>,
    ) -> IndexMap<String, PlistValue>;
}

/// The stock content provider: conventional bundle keys, overridden by the
/// manifest-declared extras.
pub struct DefaultInfoPlistContent;

impl InfoPlistContentProviding for DefaultInfoPlistContent {
    fn content(
        &self,
        target: &Target,
        extra: &IndexMap<String, PlistValue>,
    ) -> IndexMap<String, PlistValue> {
        let mut content: IndexMap<String, PlistValue> = IndexMap::new();
        content.insert(
            "CFBundleDevelopmentRegion".into(),
            "$(DEVELOPMENT_LANGUAGE)".into(),
        );
        content.insert("CFBundleExecutable".into(), "$(EXECUTABLE_NAME)".into());
        content.insert(
            "CFBundleIdentifier".into(),
            "$(PRODUCT_BUNDLE_IDENTIFIER)".into(),
        );
        content.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
        content.insert("CFBundleName".into(), "$(PRODUCT_NAME)".into());
        content.insert(
            "CFBundlePackageType".into(),
            package_type(target.product).into(),
        );
        content.insert("CFBundleShortVersionString".into(), "1.0".into());
        content.insert("CFBundleVersion".into(), "1".into());
        for (key, value) in extra {
            content.insert(key.clone(), value.clone());
        }
        content
    }
}

fn package_type(product: Product) -> &'static str {
    match product {
        Product::App | Product::AppClip | Product::Watch2App => "APPL",
        Product::Framework | Product::StaticFramework => "FMWK",
        Product::AppExtension
        | Product::MessagesExtension
        | Product::Watch2Extension
        | Product::TvTopShelfExtension
        | Product::StickerPackExtension => "XPC!",
        _ => "BNDL",
    }
}

// ── Artifact cache ────────────────────────────────────────────────────────────

/// Port consulted by the cache-hit pruning graph mapper.
pub trait ArtifactCaching: Send + Sync {
    /// The cached pre-built artefact for a target fingerprint, if any.
    fn cached_xcframework(&self, fingerprint: &str) -> Option<PathBuf>;
}

/// A cache that never hits.
pub struct NoCache;

impl ArtifactCaching for NoCache {
    fn cached_xcframework(&self, _fingerprint: &str) -> Option<PathBuf> {
        None
    }
}

// ── Services ──────────────────────────────────────────────────────────────────

/// The context value passed through all public core operations.
#[derive(Clone)]
pub struct Services {
    pub reporter: Arc<dyn Reporter>,
    pub info_plist_content: Arc<dyn InfoPlistContentProviding>,
    pub package_loader: Arc<dyn PackageLoading>,
    pub artifact_cache: Arc<dyn ArtifactCaching>,
    pub carthage: Arc<dyn CarthageInteracting>,
    /// The OS user owning generated per-user scheme directories.
    pub user_name: String,
}

impl Services {
    pub fn new(
        reporter: Arc<dyn Reporter>,
        info_plist_content: Arc<dyn InfoPlistContentProviding>,
        package_loader: Arc<dyn PackageLoading>,
        artifact_cache: Arc<dyn ArtifactCaching>,
        carthage: Arc<dyn CarthageInteracting>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            reporter,
            info_plist_content,
            package_loader,
            artifact_cache,
            carthage,
            user_name: user_name.into(),
        }
    }

    /// A context with quiet, in-memory defaults. Intended for tests; every
    /// field can be overridden afterwards.
    pub fn test_default() -> Self {
        Self {
            reporter: Arc::new(NullReporter),
            info_plist_content: Arc::new(DefaultInfoPlistContent),
            package_loader: Arc::new(NoPackages),
            artifact_cache: Arc::new(NoCache),
            carthage: Arc::new(NullCarthage),
            user_name: "tester".to_string(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_package_loader(mut self, package_loader: Arc<dyn PackageLoading>) -> Self {
        self.package_loader = package_loader;
        self
    }

    pub fn with_artifact_cache(mut self, artifact_cache: Arc<dyn ArtifactCaching>) -> Self {
        self.artifact_cache = artifact_cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Platform;

    #[test]
    fn default_info_plist_content_sets_bundle_keys() {
        let target = Target::new("App", Platform::Ios, Product::App);
        let content = DefaultInfoPlistContent.content(&target, &IndexMap::new());
        assert_eq!(
            content.get("CFBundlePackageType"),
            Some(&PlistValue::from("APPL"))
        );
        assert!(content.contains_key("CFBundleIdentifier"));
    }

    #[test]
    fn extras_override_stock_keys() {
        let target = Target::new("Kit", Platform::Ios, Product::Framework);
        let mut extra = IndexMap::new();
        extra.insert("CFBundleVersion".to_string(), PlistValue::from("42"));
        let content = DefaultInfoPlistContent.content(&target, &extra);
        assert_eq!(content.get("CFBundleVersion"), Some(&PlistValue::from("42")));
        assert_eq!(
            content.get("CFBundlePackageType"),
            Some(&PlistValue::from("FMWK"))
        );
    }
}
