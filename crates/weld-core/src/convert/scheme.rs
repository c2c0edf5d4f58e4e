//! Scheme manifest lowering.
//!
//! Manifest schemes reference targets by bare name; references resolve
//! against the declaring manifest's directory.

use std::path::Path;

use crate::{
    domain::{
        Arguments, BuildAction, LaunchArgument, RunAction, Scheme, TargetReference, TestAction,
    },
    manifest::model::{ArgumentsManifest, SchemeManifest},
};

pub fn convert_scheme(manifest: &SchemeManifest, directory: &Path) -> Scheme {
    let mut scheme = Scheme::new(&manifest.name);
    scheme.shared = manifest.shared;

    if let Some(build) = &manifest.build_action {
        scheme.build_action = Some(BuildAction::new(
            build
                .targets
                .iter()
                .map(|name| TargetReference::new(directory, name))
                .collect(),
        ));
    }

    if let Some(test) = &manifest.test_action {
        scheme.test_action = Some(TestAction {
            targets: test
                .targets
                .iter()
                .map(|name| TargetReference::new(directory, name))
                .collect(),
            build_configuration: test.config.clone().unwrap_or_else(|| "Debug".to_string()),
            coverage: test.coverage,
            code_coverage_targets: Vec::new(),
            arguments: test.arguments.as_ref().map(convert_arguments),
            diagnostics_options: Vec::new(),
        });
    }

    if let Some(run) = &manifest.run_action {
        scheme.run_action = Some(RunAction {
            build_configuration: run.config.clone().unwrap_or_else(|| "Debug".to_string()),
            executable: run
                .executable
                .as_ref()
                .map(|name| TargetReference::new(directory, name)),
            arguments: run.arguments.as_ref().map(convert_arguments),
            diagnostics_options: Vec::new(),
        });
    }

    scheme
}

fn convert_arguments(manifest: &ArgumentsManifest) -> Arguments {
    Arguments {
        environment: manifest.environment.clone(),
        launch_arguments: manifest
            .launch_arguments
            .iter()
            .map(|arg| LaunchArgument {
                name: arg.name.clone(),
                enabled: arg.enabled,
            })
            .collect(),
    }
}
