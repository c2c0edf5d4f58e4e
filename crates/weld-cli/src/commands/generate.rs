//! Implementation of the `weld generate` command.
//!
//! Responsibility: assemble the production adapters into a services
//! context, run the core generation pipeline, and hand the descriptor to
//! the writer. No generation logic lives here.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use weld_adapters::{
    Filesystem, JsonManifestLoader, JsonPackageLoader, JsonProjectFileSerializer,
    LocalFilesystem, LocalWorkspaceWriter, SystemCarthage,
};
use weld_core::{
    generator::{DescriptorWriting, Generator},
    services::{DefaultInfoPlistContent, NoCache, Services, TracingReporter},
};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `weld generate` command.
///
/// Dispatch sequence:
/// 1. Resolve and validate the root path
/// 2. Assemble the services context from production adapters
/// 3. Run the core pipeline to a workspace descriptor
/// 4. Hand the descriptor to the writer
#[instrument(skip_all)]
pub fn execute(args: GenerateArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    // 1. Resolve the root.
    let root = resolve_root(args.path)?;
    debug!(root = %root.display(), project_only = args.project_only, "generate started");

    // 2. Production services.
    let services = Services::new(
        Arc::new(TracingReporter),
        Arc::new(DefaultInfoPlistContent),
        Arc::new(JsonPackageLoader::new()),
        Arc::new(NoCache),
        Arc::new(SystemCarthage::new()),
        user_name(),
    );
    let manifest_loader = JsonManifestLoader::new();

    // 3. Generate.
    let generator = Generator::new(&services, &manifest_loader);
    let descriptor = generator.generate(&root).map_err(CliError::Core)?;
    info!(projects = descriptor.projects.len(), "descriptors generated");

    // 4. Write.
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let writer = LocalWorkspaceWriter::new(
        filesystem,
        Arc::new(JsonProjectFileSerializer),
        services.user_name.clone(),
    );
    writer
        .write_workspace(&descriptor, args.project_only)
        .map_err(CliError::Core)?;

    output.success(&format!(
        "Workspace '{}' generated ({} project{})",
        descriptor.workspace.name,
        descriptor.projects.len(),
        if descriptor.projects.len() == 1 { "" } else { "s" }
    ))?;
    if !global.quiet && !args.project_only {
        output.print(&format!(
            "  open {}",
            descriptor.xcworkspace_path.display()
        ))?;
    }

    Ok(())
}

fn resolve_root(path: Option<PathBuf>) -> CliResult<PathBuf> {
    let root = match path {
        Some(path) if path.is_absolute() => path,
        Some(path) => std::env::current_dir()?.join(path),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::InvalidPath { path: root });
    }
    Ok(root)
}

/// The OS user owning generated per-user scheme directories.
fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_an_invalid_path() {
        let result = resolve_root(Some(PathBuf::from("/definitely/not/here")));
        assert!(matches!(result, Err(CliError::InvalidPath { .. })));
    }

    #[test]
    fn user_name_is_never_empty() {
        assert!(!user_name().is_empty());
    }
}
