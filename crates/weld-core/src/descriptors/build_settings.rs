//! Final build-settings computation.
//!
//! Merges product and platform defaults with the project's and target's
//! declared base settings; later layers win. Per-configuration overlays
//! stay on the `Settings` value and are not flattened here.

use indexmap::IndexMap;

use crate::domain::{
    DeploymentTarget, InfoPlist, Platform, Product, Project, SettingValue, SettingsDictionary,
    Target, TargetDependency,
};

const DEFAULT_SWIFT_VERSION: &str = "5.0";

/// Compute the merged base settings for one target.
pub fn target_build_settings(project: &Project, target: &Target) -> SettingsDictionary {
    let mut settings: SettingsDictionary = IndexMap::new();

    settings.insert(
        "PRODUCT_BUNDLE_IDENTIFIER".to_string(),
        SettingValue::String(target.bundle_id.clone()),
    );
    settings.insert(
        "PRODUCT_NAME".to_string(),
        SettingValue::String(target.name.clone()),
    );
    settings.insert(
        "SDKROOT".to_string(),
        SettingValue::from(target.platform.sdk_root()),
    );
    settings.insert(
        "SUPPORTED_PLATFORMS".to_string(),
        SettingValue::from(target.platform.supported_platforms()),
    );
    if let Some(family) = target.platform.device_family() {
        settings.insert(
            "TARGETED_DEVICE_FAMILY".to_string(),
            SettingValue::from(family),
        );
    }
    if let Some(InfoPlist::File(path)) = &target.info_plist {
        settings.insert(
            "INFOPLIST_FILE".to_string(),
            SettingValue::String(path.to_string_lossy().to_string()),
        );
    }
    if let Some(entitlements) = &target.entitlements {
        settings.insert(
            "CODE_SIGN_ENTITLEMENTS".to_string(),
            SettingValue::String(entitlements.to_string_lossy().to_string()),
        );
    }
    if target.product == Product::StaticFramework {
        settings.insert("MACH_O_TYPE".to_string(), SettingValue::from("staticlib"));
    }
    if let Some(deployment_target) = &target.deployment_target {
        settings.insert(
            deployment_target_key(deployment_target).to_string(),
            SettingValue::String(deployment_target.version().to_string()),
        );
    }
    apply_test_host_settings(project, target, &mut settings);

    // Declared settings override the defaults; target beats project.
    for (key, value) in &project.settings.base {
        settings.insert(key.clone(), value.clone());
    }
    if let Some(declared) = &target.settings {
        for (key, value) in &declared.base {
            settings.insert(key.clone(), value.clone());
        }
    }

    settings
        .entry("SWIFT_VERSION".to_string())
        .or_insert_with(|| SettingValue::from(DEFAULT_SWIFT_VERSION));

    settings
}

fn deployment_target_key(deployment_target: &DeploymentTarget) -> &'static str {
    match deployment_target.platform() {
        Platform::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
        Platform::Macos => "MACOSX_DEPLOYMENT_TARGET",
        Platform::Tvos => "TVOS_DEPLOYMENT_TARGET",
        Platform::Watchos => "WATCHOS_DEPLOYMENT_TARGET",
    }
}

/// Test bundles hosted by an application point back at it: unit tests are
/// injected into the host process, UI tests only name it.
fn apply_test_host_settings(
    project: &Project,
    target: &Target,
    settings: &mut SettingsDictionary,
) {
    if !target.product.is_tests() {
        return;
    }
    let host = target.dependencies.iter().find_map(|dependency| {
        let TargetDependency::Target { name } = dependency else {
            return None;
        };
        project
            .target(name)
            .filter(|candidate| candidate.product.can_host_tests())
    });
    let Some(host) = host else {
        return;
    };

    match target.product {
        Product::UnitTests => {
            settings.insert(
                "TEST_HOST".to_string(),
                SettingValue::String(format!(
                    "$(BUILT_PRODUCTS_DIR)/{}.app/{}",
                    host.name, host.name
                )),
            );
            settings.insert(
                "BUNDLE_LOADER".to_string(),
                SettingValue::from("$(TEST_HOST)"),
            );
        }
        Product::UiTests => {
            settings.insert(
                "TEST_TARGET_NAME".to_string(),
                SettingValue::String(host.name.clone()),
            );
        }
        _ => {}
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
