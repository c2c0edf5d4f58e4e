//! `.xcscheme` serialization.
//!
//! Renders a scheme descriptor to the XML the IDE expects. The defaults
//! here are part of the generation contract: launch and analyze run the
//! Debug configuration, profile and archive run Release, archives reveal
//! in the organizer, and non-runnable targets get a macro expansion
//! instead of a buildable product runnable.

use std::fmt::Write as _;

use weld_core::{
    descriptors::WorkspaceDescriptor,
    domain::{Arguments, DiagnosticsOption, Scheme, Target, TargetReference},
};

const LAST_UPGRADE_VERSION: &str = "1340";

/// Serializes schemes against the workspace they belong to; the workspace
/// is needed to resolve target references into buildable references.
pub struct SchemeSerializer<'a> {
    descriptor: &'a WorkspaceDescriptor,
}

struct BuildableReference {
    container: String,
    buildable_name: String,
    blueprint_name: String,
}

impl<'a> SchemeSerializer<'a> {
    pub fn new(descriptor: &'a WorkspaceDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn serialize(&self, scheme: &Scheme) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<Scheme\n   LastUpgradeVersion = \"{LAST_UPGRADE_VERSION}\"\n   version = \"1.3\">"
        );
        self.write_build_action(scheme, &mut out);
        self.write_test_action(scheme, &mut out);
        self.write_launch_action(scheme, &mut out);
        self.write_profile_action(scheme, &mut out);
        self.write_analyze_action(scheme, &mut out);
        self.write_archive_action(scheme, &mut out);
        out.push_str("</Scheme>\n");
        out
    }

    fn resolve(&self, reference: &TargetReference) -> Option<BuildableReference> {
        let project = self
            .descriptor
            .projects
            .iter()
            .find(|p| p.path == reference.project_path)?;
        let target: &Target = project.project.target(&reference.name)?;
        Some(BuildableReference {
            container: format!("container:{}.xcodeproj", project.project.file_name),
            buildable_name: target.product_name(),
            blueprint_name: target.name.clone(),
        })
    }

    /// The reference used for macro expansion: the scheme's first build
    /// target.
    fn macro_expansion_reference(&self, scheme: &Scheme) -> Option<BuildableReference> {
        scheme
            .build_action
            .as_ref()
            .and_then(|build| build.targets.first())
            .and_then(|reference| self.resolve(reference))
    }

    fn write_build_action(&self, scheme: &Scheme, out: &mut String) {
        out.push_str(
            "   <BuildAction\n      parallelizeBuildables = \"YES\"\n      \
             buildImplicitDependencies = \"YES\">\n",
        );
        if let Some(build) = &scheme.build_action {
            out.push_str("      <BuildActionEntries>\n");
            for reference in &build.targets {
                let Some(buildable) = self.resolve(reference) else {
                    continue;
                };
                out.push_str(
                    "         <BuildActionEntry\n            buildForTesting = \"YES\"\n            \
                     buildForRunning = \"YES\"\n            buildForProfiling = \"YES\"\n            \
                     buildForArchiving = \"YES\"\n            buildForAnalyzing = \"YES\">\n",
                );
                write_buildable_reference(&buildable, 12, out);
                out.push_str("         </BuildActionEntry>\n");
            }
            out.push_str("      </BuildActionEntries>\n");
        }
        out.push_str("   </BuildAction>\n");
    }

    fn write_test_action(&self, scheme: &Scheme, out: &mut String) {
        let configuration = scheme
            .test_action
            .as_ref()
            .map(|t| t.build_configuration.as_str())
            .unwrap_or("Debug");
        let coverage = scheme.test_action.as_ref().is_some_and(|t| t.coverage);
        let _ = write!(
            out,
            "   <TestAction\n      buildConfiguration = \"{configuration}\"\n      \
             selectedDebuggerIdentifier = \"Xcode.DebuggerFoundation.Debugger.LLDB\"\n      \
             selectedLauncherIdentifier = \"Xcode.DebuggerFoundation.Launcher.LLDB\"\n      \
             shouldUseLaunchSchemeArgsEnv = \"YES\""
        );
        if coverage {
            out.push_str("\n      codeCoverageEnabled = \"YES\"");
        }
        out.push_str(">\n");
        if let Some(test) = &scheme.test_action {
            out.push_str("      <Testables>\n");
            for reference in &test.targets {
                let Some(buildable) = self.resolve(reference) else {
                    continue;
                };
                out.push_str("         <TestableReference\n            skipped = \"NO\">\n");
                write_buildable_reference(&buildable, 12, out);
                out.push_str("         </TestableReference>\n");
            }
            out.push_str("      </Testables>\n");
        }
        out.push_str("   </TestAction>\n");
    }

    fn write_launch_action(&self, scheme: &Scheme, out: &mut String) {
        let run = scheme.run_action.as_ref();
        let configuration = run.map(|r| r.build_configuration.as_str()).unwrap_or("Debug");
        let disable_main_thread_checker = run.is_some_and(|r| {
            !r.diagnostics_options
                .contains(&DiagnosticsOption::MainThreadChecker)
        });
        let _ = write!(
            out,
            "   <LaunchAction\n      buildConfiguration = \"{configuration}\"\n      \
             selectedDebuggerIdentifier = \"Xcode.DebuggerFoundation.Debugger.LLDB\"\n      \
             selectedLauncherIdentifier = \"Xcode.DebuggerFoundation.Launcher.LLDB\"\n      \
             launchStyle = \"0\""
        );
        if disable_main_thread_checker {
            out.push_str("\n      disableMainThreadChecker = \"YES\"");
        }
        out.push_str(
            "\n      useCustomWorkingDirectory = \"NO\"\n      \
             ignoresPersistentStateOnLaunch = \"NO\"\n      \
             debugDocumentVersioning = \"YES\"\n      \
             debugServiceExtension = \"internal\"\n      \
             allowLocationSimulation = \"YES\">\n",
        );

        let executable = run.and_then(|r| r.executable.as_ref());
        match executable.and_then(|reference| self.resolve(reference)) {
            Some(buildable) => {
                out.push_str(
                    "      <BuildableProductRunnable\n         runnableDebuggingMode = \"0\">\n",
                );
                write_buildable_reference(&buildable, 9, out);
                out.push_str("      </BuildableProductRunnable>\n");
            }
            None => {
                if let Some(buildable) = self.macro_expansion_reference(scheme) {
                    out.push_str("      <MacroExpansion>\n");
                    write_buildable_reference(&buildable, 9, out);
                    out.push_str("      </MacroExpansion>\n");
                }
            }
        }
        if let Some(arguments) = run.and_then(|r| r.arguments.as_ref()) {
            write_arguments(arguments, out);
        }
        out.push_str("   </LaunchAction>\n");
    }

    fn write_profile_action(&self, scheme: &Scheme, out: &mut String) {
        let configuration = scheme
            .profile_action
            .as_ref()
            .map(|p| p.build_configuration.as_str())
            .unwrap_or("Release");
        let executable = scheme
            .profile_action
            .as_ref()
            .and_then(|p| p.executable.as_ref())
            .or_else(|| {
                scheme
                    .run_action
                    .as_ref()
                    .and_then(|r| r.executable.as_ref())
            });
        let runnable = executable.and_then(|reference| self.resolve(reference));
        // Testability while profiling only applies to the macro-expansion
        // form.
        let enable_testability = runnable.is_none();

        let _ = write!(
            out,
            "   <ProfileAction\n      buildConfiguration = \"{configuration}\"\n      \
             shouldUseLaunchSchemeArgsEnv = \"YES\"\n      \
             savedToolIdentifier = \"\"\n      \
             useCustomWorkingDirectory = \"NO\"\n      \
             debugDocumentVersioning = \"YES\""
        );
        if enable_testability {
            out.push_str("\n      enableTestabilityWhenProfilingTests = \"YES\"");
        }
        out.push_str(">\n");
        match runnable {
            Some(buildable) => {
                out.push_str(
                    "      <BuildableProductRunnable\n         runnableDebuggingMode = \"0\">\n",
                );
                write_buildable_reference(&buildable, 9, out);
                out.push_str("      </BuildableProductRunnable>\n");
            }
            None => {
                if let Some(buildable) = self.macro_expansion_reference(scheme) {
                    out.push_str("      <MacroExpansion>\n");
                    write_buildable_reference(&buildable, 9, out);
                    out.push_str("      </MacroExpansion>\n");
                }
            }
        }
        out.push_str("   </ProfileAction>\n");
    }

    fn write_analyze_action(&self, scheme: &Scheme, out: &mut String) {
        let configuration = scheme
            .analyze_action
            .as_ref()
            .map(|a| a.build_configuration.as_str())
            .unwrap_or("Debug");
        let _ = writeln!(
            out,
            "   <AnalyzeAction\n      buildConfiguration = \"{configuration}\">\n   </AnalyzeAction>"
        );
    }

    fn write_archive_action(&self, scheme: &Scheme, out: &mut String) {
        let configuration = scheme
            .archive_action
            .as_ref()
            .map(|a| a.build_configuration.as_str())
            .unwrap_or("Release");
        let reveal = scheme
            .archive_action
            .as_ref()
            .map(|a| a.reveal_archive_in_organizer)
            .unwrap_or(true);
        let _ = writeln!(
            out,
            "   <ArchiveAction\n      buildConfiguration = \"{configuration}\"\n      \
             revealArchiveInOrganizer = \"{}\">\n   </ArchiveAction>",
            yes_no(reveal)
        );
    }
}

fn write_buildable_reference(buildable: &BuildableReference, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    let _ = writeln!(
        out,
        "{pad}<BuildableReference\n{pad}   BuildableIdentifier = \"primary\"\n{pad}   \
         BuildableName = \"{}\"\n{pad}   BlueprintName = \"{}\"\n{pad}   \
         ReferencedContainer = \"{}\">\n{pad}</BuildableReference>",
        buildable.buildable_name, buildable.blueprint_name, buildable.container
    );
}

fn write_arguments(arguments: &Arguments, out: &mut String) {
    if !arguments.launch_arguments.is_empty() {
        out.push_str("      <CommandLineArguments>\n");
        for argument in &arguments.launch_arguments {
            let _ = writeln!(
                out,
                "         <CommandLineArgument\n            argument = \"{}\"\n            \
                 isEnabled = \"{}\">\n         </CommandLineArgument>",
                argument.name,
                yes_no(argument.enabled)
            );
        }
        out.push_str("      </CommandLineArguments>\n");
    }
    if !arguments.environment.is_empty() {
        out.push_str("      <EnvironmentVariables>\n");
        for (key, value) in &arguments.environment {
            let _ = writeln!(
                out,
                "         <EnvironmentVariable\n            key = \"{key}\"\n            \
                 value = \"{value}\"\n            isEnabled = \"YES\">\n         \
                 </EnvironmentVariable>"
            );
        }
        out.push_str("      </EnvironmentVariables>\n");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "YES"
    } else {
        "NO"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use weld_core::{
        dependencies::DependenciesGraph,
        descriptors::DescriptorGenerator,
        domain::{Platform, Product, Project, Target, Workspace},
        graph::GraphLoader,
        mappers::{AutogeneratedSchemesProjectMapper, ProjectMapping},
    };

    fn descriptor_with(targets: Vec<Target>) -> WorkspaceDescriptor {
        let mut project = Project::new("/ws/App", "App");
        project.targets = targets;
        let (project, _) = AutogeneratedSchemesProjectMapper::new(false)
            .map(project)
            .unwrap();
        let workspace = Workspace::new("/ws", "WS", [project.path.clone()]);
        let graph = GraphLoader::new(&DependenciesGraph::none())
            .load(workspace, [project])
            .unwrap();
        DescriptorGenerator.generate_workspace(&graph, Vec::new())
    }

    #[test]
    fn runnable_targets_get_a_buildable_product_runnable() {
        let descriptor = descriptor_with(vec![Target::new("App", Platform::Ios, Product::App)]);
        let scheme = &descriptor.projects[0].schemes[0].scheme;
        let xml = SchemeSerializer::new(&descriptor).serialize(scheme);

        assert!(xml.contains("<BuildableProductRunnable"));
        assert!(xml.contains("runnableDebuggingMode = \"0\""));
        assert!(xml.contains("BuildableName = \"App.app\""));
        assert!(xml.contains("BlueprintName = \"App\""));
        assert!(xml.contains("BuildableIdentifier = \"primary\""));
        assert!(xml.contains("ReferencedContainer = \"container:App.xcodeproj\""));
        assert!(!xml.contains("<MacroExpansion>"));
    }

    #[test]
    fn non_runnable_targets_get_a_macro_expansion() {
        let descriptor =
            descriptor_with(vec![Target::new("Kit", Platform::Ios, Product::Framework)]);
        let scheme = &descriptor.projects[0].schemes[0].scheme;
        let xml = SchemeSerializer::new(&descriptor).serialize(scheme);

        assert!(xml.contains("<MacroExpansion>"));
        assert!(!xml.contains("<BuildableProductRunnable"));
        // Profiling a macro-expansion scheme keeps testability on.
        assert!(xml.contains("enableTestabilityWhenProfilingTests = \"YES\""));
    }

    #[test]
    fn action_configuration_defaults() {
        let descriptor = descriptor_with(vec![Target::new("App", Platform::Ios, Product::App)]);
        let scheme = &descriptor.projects[0].schemes[0].scheme;
        let xml = SchemeSerializer::new(&descriptor).serialize(scheme);

        assert!(xml.contains("<ProfileAction\n      buildConfiguration = \"Release\""));
        assert!(xml.contains("<AnalyzeAction\n      buildConfiguration = \"Debug\""));
        assert!(xml.contains("<ArchiveAction\n      buildConfiguration = \"Release\""));
        assert!(xml.contains("revealArchiveInOrganizer = \"YES\""));
        assert!(xml.contains("savedToolIdentifier = \"\""));
        assert!(xml.contains("ignoresPersistentStateOnLaunch = \"NO\""));
        assert!(xml.contains("useCustomWorkingDirectory = \"NO\""));
        assert!(xml.contains("debugDocumentVersioning = \"YES\""));
    }

    #[test]
    fn main_thread_checker_is_on_for_autogenerated_schemes() {
        let descriptor = descriptor_with(vec![Target::new("App", Platform::Ios, Product::App)]);
        let scheme = &descriptor.projects[0].schemes[0].scheme;
        let xml = SchemeSerializer::new(&descriptor).serialize(scheme);
        assert!(!xml.contains("disableMainThreadChecker"));
    }

    #[test]
    fn environment_variables_are_serialized() {
        let mut app = Target::new("App", Platform::Ios, Product::App);
        app.environment
            .insert("API_URL".to_string(), "https://stage".to_string());
        let descriptor = descriptor_with(vec![app]);
        let scheme = &descriptor.projects[0].schemes[0].scheme;
        let xml = SchemeSerializer::new(&descriptor).serialize(scheme);

        assert!(xml.contains("<EnvironmentVariables>"));
        assert!(xml.contains("key = \"API_URL\""));
        assert!(xml.contains("value = \"https://stage\""));
    }
}
