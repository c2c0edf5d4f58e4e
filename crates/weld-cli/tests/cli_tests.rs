//! CLI integration tests: real binary, real filesystem.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn weld() -> Command {
    Command::cargo_bin("weld").unwrap()
}

#[test]
fn help_lists_the_generate_command() {
    weld()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn version_is_printed() {
    weld()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_shows_help_and_fails() {
    weld().assert().failure();
}

#[test]
fn generate_in_an_empty_directory_exits_with_not_found() {
    let dir = TempDir::new().unwrap();
    weld()
        .arg("generate")
        .arg("--path")
        .arg(dir.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("manifest"));
}

#[test]
fn generate_with_a_missing_path_is_a_user_error() {
    weld()
        .arg("generate")
        .arg("--path")
        .arg("/definitely/not/here")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn generate_writes_the_containers() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Project.json"),
        r#"{
            "name": "App",
            "targets": [{
                "name": "App",
                "platform": "ios",
                "product": "app",
                "bundle_id": "io.example.app"
            }]
        }"#,
    )
    .unwrap();

    weld()
        .arg("generate")
        .arg("--path")
        .arg(dir.path())
        .arg("--no-color")
        .assert()
        .success();

    assert!(dir.path().join("App.xcodeproj/project.pbxproj").is_file());
    assert!(dir
        .path()
        .join("App.xcodeproj/xcshareddata/xcschemes/App.xcscheme")
        .is_file());
    assert!(dir.path().join("App.xcworkspace/contents.xcworkspacedata").is_file());
}

#[test]
fn project_only_skips_the_workspace_container() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Project.json"),
        r#"{"name": "App", "targets": []}"#,
    )
    .unwrap();

    weld()
        .arg("generate")
        .arg("--path")
        .arg(dir.path())
        .arg("--project-only")
        .assert()
        .success();

    assert!(dir.path().join("App.xcodeproj").is_dir());
    assert!(!dir.path().join("App.xcworkspace").exists());
}
