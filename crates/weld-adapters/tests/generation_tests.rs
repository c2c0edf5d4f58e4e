//! End-to-end generation tests: JSON manifests on disk, through the core
//! pipeline, down to written containers on an in-memory filesystem.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use weld_adapters::{
    JsonManifestLoader, JsonPackageLoader, JsonProjectFileSerializer, LocalWorkspaceWriter,
    MemoryFilesystem,
};
use weld_core::{
    descriptors::WorkspaceDescriptor,
    generator::{DescriptorWriting, Generator},
    services::Services,
};

fn generate(root: &Path, services: &Services) -> WorkspaceDescriptor {
    let loader = JsonManifestLoader::new();
    Generator::new(services, &loader).generate(root).unwrap()
}

fn write_project_manifest(dir: &Path, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("Project.json"), contents).unwrap();
}

// ── Single project ────────────────────────────────────────────────────────────

#[test]
fn empty_project_generates_no_targets_and_no_schemes() {
    let root = TempDir::new().unwrap();
    write_project_manifest(root.path(), r#"{"name": "SomeProject", "targets": []}"#);

    let services = Services::test_default();
    let descriptor = generate(root.path(), &services);

    assert_eq!(descriptor.projects.len(), 1);
    let project = &descriptor.projects[0].project;
    assert_eq!(project.name, "SomeProject");
    assert!(project.targets.is_empty());
    assert!(project.schemes.is_empty());
    // The workspace is synthesized from the project and carries the
    // automation scheme.
    assert_eq!(descriptor.workspace.name, "SomeProject");
    assert!(descriptor
        .schemes
        .iter()
        .any(|s| s.scheme.name == "SomeProject-Project"));
}

#[test]
fn app_project_gets_an_autogenerated_scheme_and_build_settings() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("Sources")).unwrap();
    fs::write(root.path().join("Sources/main.swift"), "").unwrap();
    write_project_manifest(
        root.path(),
        r#"{
            "name": "App",
            "targets": [{
                "name": "App",
                "platform": "ios",
                "product": "app",
                "bundle_id": "io.example.app",
                "sources": ["Sources/**"]
            }]
        }"#,
    );

    let services = Services::test_default();
    let descriptor = generate(root.path(), &services);
    let project = &descriptor.projects[0];

    let scheme_names: Vec<_> = project
        .schemes
        .iter()
        .map(|s| s.scheme.name.clone())
        .collect();
    assert_eq!(scheme_names, vec!["App"]);

    let settings = &project.target_settings["App"];
    assert_eq!(
        settings.get("PRODUCT_BUNDLE_IDENTIFIER").unwrap().to_string(),
        "io.example.app"
    );
    assert_eq!(settings.get("SDKROOT").unwrap().to_string(), "iphoneos");

    let target = project.project.target("App").unwrap();
    assert_eq!(target.sources, vec![root.path().join("Sources/main.swift")]);
}

// ── Config options ────────────────────────────────────────────────────────────

#[test]
fn disabled_autogeneration_keeps_only_user_schemes() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("Config.json"),
        r#"{
            "generation_options": [
                {"type": "organization_name", "value": "TestOrg"},
                {"type": "disable_autogenerated_schemes"}
            ]
        }"#,
    )
    .unwrap();
    write_project_manifest(
        root.path(),
        r#"{
            "name": "App",
            "targets": [{
                "name": "App",
                "platform": "ios",
                "product": "app",
                "bundle_id": "io.example.app"
            }],
            "schemes": [{"name": "Manual", "build_action": {"targets": ["App"]}}]
        }"#,
    );

    let services = Services::test_default();
    let descriptor = generate(root.path(), &services);
    let project = &descriptor.projects[0].project;

    let scheme_names: Vec<_> = project.schemes.iter().map(|s| s.name.clone()).collect();
    assert_eq!(scheme_names, vec!["Manual"]);
    assert_eq!(project.organization_name.as_deref(), Some("TestOrg"));
}

#[test]
fn xcode_project_name_template_renames_the_container() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("Config.json"),
        r#"{
            "generation_options": [
                {"type": "xcode_project_name", "value": "one $(project_name) two"}
            ]
        }"#,
    )
    .unwrap();
    write_project_manifest(root.path(), r#"{"name": "SomeProject", "targets": []}"#);

    let services = Services::test_default();
    let descriptor = generate(root.path(), &services);
    let project = &descriptor.projects[0];

    assert_eq!(project.project.file_name, "one SomeProject two");
    assert_eq!(
        project.xcodeproj_path,
        root.path().join("one SomeProject two.xcodeproj")
    );
}

// ── Workspaces ────────────────────────────────────────────────────────────────

#[test]
fn workspace_globs_discover_projects_and_follow_their_edges() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("Workspace.json"),
        r#"{"name": "WS", "projects": ["Apps/*"]}"#,
    )
    .unwrap();
    write_project_manifest(
        &root.path().join("Apps/App"),
        r#"{
            "name": "App",
            "targets": [{
                "name": "App",
                "platform": "ios",
                "product": "app",
                "bundle_id": "io.example.app",
                "dependencies": [{"type": "project", "target": "Kit", "path": "../../Kit"}]
            }]
        }"#,
    );
    write_project_manifest(
        &root.path().join("Kit"),
        r#"{
            "name": "Kit",
            "targets": [{
                "name": "Kit",
                "platform": "ios",
                "product": "framework",
                "bundle_id": "io.example.kit"
            }]
        }"#,
    );

    let services = Services::test_default();
    let descriptor = generate(root.path(), &services);

    // Kit is reached through App's project dependency even though the
    // workspace glob only matched Apps/*.
    let names: Vec<_> = descriptor
        .projects
        .iter()
        .map(|p| p.project.name.clone())
        .collect();
    assert!(names.contains(&"App".to_string()));
    assert!(names.contains(&"Kit".to_string()));
    assert_eq!(descriptor.workspace.name, "WS");
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[test]
fn generating_twice_yields_identical_output() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("Sources")).unwrap();
    fs::write(root.path().join("Sources/a.swift"), "").unwrap();
    fs::write(root.path().join("Sources/b.swift"), "").unwrap();
    write_project_manifest(
        root.path(),
        r#"{
            "name": "App",
            "targets": [
                {
                    "name": "App",
                    "platform": "ios",
                    "product": "app",
                    "bundle_id": "io.example.app",
                    "sources": ["Sources/**"],
                    "dependencies": [{"type": "target", "name": "Kit"}]
                },
                {
                    "name": "Kit",
                    "platform": "ios",
                    "product": "framework",
                    "bundle_id": "io.example.kit"
                }
            ]
        }"#,
    );

    let services = Services::test_default();

    let write = || {
        let descriptor = generate(root.path(), &services);
        let filesystem = MemoryFilesystem::new();
        LocalWorkspaceWriter::new(
            Arc::new(filesystem.clone()),
            Arc::new(JsonProjectFileSerializer),
            "tester",
        )
        .write_workspace(&descriptor, false)
        .unwrap();
        let mut snapshot = String::new();
        for path in filesystem.file_paths() {
            snapshot.push_str(&path.to_string_lossy());
            snapshot.push('\n');
            snapshot.push_str(&filesystem.read_file(&path).unwrap());
            snapshot.push('\n');
        }
        snapshot
    };

    assert_eq!(write(), write());
}

// ── External dependencies ─────────────────────────────────────────────────────

#[test]
fn external_packages_become_projects_and_resolve_in_the_graph() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("Dependencies.json"),
        r#"{"platforms": ["ios"]}"#,
    )
    .unwrap();

    let packages = root.path().join(".packages");
    fs::create_dir_all(packages.join("checkouts/Net")).unwrap();
    fs::write(
        packages.join("workspace-state.json"),
        r#"{
            "version": 5,
            "object": {
                "dependencies": [{
                    "packageRef": {
                        "identity": "net",
                        "kind": "remote",
                        "location": "https://github.com/example/Net",
                        "name": "Net"
                    },
                    "subpath": "Net"
                }]
            }
        }"#,
    )
    .unwrap();
    fs::write(
        packages.join("checkouts/Net/Package.info.json"),
        r#"{
            "platforms": [{"platform_name": "ios", "version": "13.0"}],
            "products": [{
                "name": "Net",
                "product_type": {"kind": "library", "linking": "automatic"},
                "targets": ["Net"]
            }],
            "targets": [{"name": "Net", "kind": "regular"}]
        }"#,
    )
    .unwrap();

    write_project_manifest(
        root.path(),
        r#"{
            "name": "App",
            "targets": [{
                "name": "App",
                "platform": "ios",
                "product": "app",
                "bundle_id": "io.example.app",
                "dependencies": [{"type": "external", "name": "Net"}]
            }]
        }"#,
    );

    let services = Services::test_default().with_package_loader(Arc::new(JsonPackageLoader::new()));
    let descriptor = generate(root.path(), &services);

    let names: Vec<_> = descriptor
        .projects
        .iter()
        .map(|p| p.project.name.clone())
        .collect();
    assert!(names.contains(&"Net".to_string()), "names: {names:?}");

    let net = descriptor
        .projects
        .iter()
        .find(|p| p.project.name == "Net")
        .unwrap();
    let target = net.project.target("Net").unwrap();
    assert_eq!(target.platform, weld_core::domain::Platform::Ios);
    assert_eq!(
        target.deployment_target,
        Some(weld_core::domain::DeploymentTarget::for_platform(
            weld_core::domain::Platform::Ios,
            "13.0"
        ))
    );
}
