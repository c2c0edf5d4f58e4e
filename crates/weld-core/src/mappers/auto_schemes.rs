//! Scheme auto-generation.
//!
//! Every target gets a scheme named after it unless the user already
//! declared one with that name; a user-provided scheme always shadows the
//! autogenerated one.

use crate::{
    domain::{
        Arguments, BuildAction, DiagnosticsOption, Product, Project, RunAction, Scheme,
        SideEffectDescriptor, Target, TargetReference, TestAction,
    },
    error::WeldResult,
    mappers::ProjectMapping,
};

pub struct AutogeneratedSchemesProjectMapper {
    enable_code_coverage: bool,
}

impl AutogeneratedSchemesProjectMapper {
    pub fn new(enable_code_coverage: bool) -> Self {
        Self {
            enable_code_coverage,
        }
    }

    fn scheme_for(&self, target: &Target, project: &Project) -> Scheme {
        let reference = TargetReference::new(&project.path, &target.name);
        let debug_configuration = project.default_debug_build_configuration_name();

        // Extensions are built together with their host applications.
        let mut build_targets = vec![reference.clone()];
        if matches!(
            target.product,
            Product::AppExtension | Product::MessagesExtension
        ) {
            let mut hosts = host_targets(target, project);
            hosts.sort_by(|a, b| a.name.cmp(&b.name));
            build_targets.extend(
                hosts
                    .into_iter()
                    .map(|host| TargetReference::new(&project.path, &host.name)),
            );
        }

        let test_targets = if target.product.is_tests() {
            vec![reference.clone()]
        } else {
            let mut tests: Vec<&Target> = project
                .targets
                .iter()
                .filter(|candidate| {
                    candidate.product.is_tests() && depends_on(candidate, &target.name)
                })
                .collect();
            tests.sort_by(|a, b| a.name.cmp(&b.name));
            tests
                .into_iter()
                .map(|t| TargetReference::new(&project.path, &t.name))
                .collect()
        };

        let executable = run_executable(target, project).map(|name| {
            TargetReference::new(&project.path, name)
        });

        let arguments = if target.environment.is_empty() && target.launch_arguments.is_empty() {
            None
        } else {
            Some(Arguments {
                environment: target.environment.clone(),
                launch_arguments: target.launch_arguments.clone(),
            })
        };

        let mut scheme = Scheme::new(&target.name);
        scheme.build_action = Some(BuildAction::new(build_targets));
        scheme.test_action = Some(TestAction {
            targets: test_targets,
            build_configuration: debug_configuration.clone(),
            coverage: self.enable_code_coverage,
            code_coverage_targets: if self.enable_code_coverage {
                vec![reference]
            } else {
                Vec::new()
            },
            arguments: None,
            diagnostics_options: vec![DiagnosticsOption::MainThreadChecker],
        });
        scheme.run_action = Some(RunAction {
            build_configuration: debug_configuration,
            executable,
            arguments,
            diagnostics_options: vec![DiagnosticsOption::MainThreadChecker],
        });
        scheme
    }
}

impl ProjectMapping for AutogeneratedSchemesProjectMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let mut generated = Vec::new();
        for target in &project.targets {
            if project.schemes.iter().any(|s| s.name == target.name) {
                continue;
            }
            generated.push(self.scheme_for(target, &project));
        }
        project.schemes.extend(generated);
        Ok((project, Vec::new()))
    }
}

/// Targets that can host `target`: products able to host tests which
/// declare a dependency on it.
fn host_targets<'a>(target: &Target, project: &'a Project) -> Vec<&'a Target> {
    project
        .targets
        .iter()
        .filter(|candidate| candidate.product.can_host_tests() && depends_on(candidate, &target.name))
        .collect()
}

fn depends_on(candidate: &Target, name: &str) -> bool {
    candidate.dependencies.iter().any(|dependency| {
        matches!(
            dependency,
            crate::domain::TargetDependency::Target { name: dep } if dep == name
        )
    })
}

/// What the run action launches: the target itself when runnable, the
/// hosting app for extensions, the hosting watch app for watch extensions.
fn run_executable<'a>(target: &'a Target, project: &Project) -> Option<String> {
    if target.product.is_runnable() {
        return Some(target.name.clone());
    }
    if target.product == Product::Watch2Extension {
        return host_targets(target, project)
            .into_iter()
            .find(|host| host.product == Product::Watch2App)
            .map(|host| host.name.clone());
    }
    if target.product.is_extension() {
        let mut hosts = host_targets(target, project);
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        return hosts.first().map(|host| host.name.clone());
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
