//! Materialising descriptors on disk.
//!
//! The writer runs only after descriptor generation succeeded for every
//! project: side effects execute first, then project containers, then the
//! workspace container. The project-file serializer itself is a port; the
//! in-repo JSON implementation stands in for the native container format.

use std::sync::Arc;

use tracing::{info, instrument};

use weld_core::{
    descriptors::{ProjectDescriptor, SchemeDescriptor, WorkspaceDescriptor},
    error::{WeldError, WeldResult},
    generator::DescriptorWriting,
};

use crate::{
    filesystem::{Filesystem, SideEffectExecutor},
    xcscheme::SchemeSerializer,
};

/// Port for serializing one project container file.
pub trait ProjectFileSerializing: Send + Sync {
    fn serialize(&self, descriptor: &ProjectDescriptor) -> WeldResult<String>;
}

/// JSON stand-in for the native project-file serializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProjectFileSerializer;

impl ProjectFileSerializing for JsonProjectFileSerializer {
    fn serialize(&self, descriptor: &ProjectDescriptor) -> WeldResult<String> {
        let project = &descriptor.project;
        let targets: Vec<serde_json::Value> = project
            .targets
            .iter()
            .map(|target| {
                let settings: serde_json::Map<String, serde_json::Value> = descriptor
                    .target_settings
                    .get(&target.name)
                    .map(|settings| {
                        settings
                            .iter()
                            .map(|(key, value)| {
                                (key.clone(), serde_json::json!(value.to_string()))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                serde_json::json!({
                    "name": target.name,
                    "platform": target.platform.as_str(),
                    "product": target.product.as_str(),
                    "bundle_id": target.bundle_id,
                    "sources": target.sources,
                    "dependencies": target
                        .dependencies
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>(),
                    "build_settings": settings,
                })
            })
            .collect();
        let configurations: Vec<serde_json::Value> = project
            .settings
            .ordered_configurations()
            .into_iter()
            .map(|(configuration, _)| {
                serde_json::json!({
                    "name": configuration.name,
                    "variant": format!("{:?}", configuration.variant).to_lowercase(),
                })
            })
            .collect();
        let value = serde_json::json!({
            "name": project.name,
            "organization_name": project.organization_name,
            "targets": targets,
            "configurations": configurations,
        });
        serde_json::to_string_pretty(&value).map_err(|e| WeldError::Internal {
            message: format!("could not serialize project file: {e}"),
        })
    }
}

/// Writes workspace and project containers through the filesystem port.
pub struct LocalWorkspaceWriter {
    filesystem: Arc<dyn Filesystem>,
    serializer: Arc<dyn ProjectFileSerializing>,
    user_name: String,
}

impl LocalWorkspaceWriter {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        serializer: Arc<dyn ProjectFileSerializing>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            filesystem,
            serializer,
            user_name: user_name.into(),
        }
    }

    fn write_project(
        &self,
        project: &ProjectDescriptor,
        schemes: &SchemeSerializer<'_>,
    ) -> WeldResult<()> {
        self.filesystem.create_dir_all(&project.xcodeproj_path)?;
        let project_file = project.xcodeproj_path.join("project.pbxproj");
        self.filesystem
            .write_file(&project_file, &self.serializer.serialize(project)?)?;
        self.write_schemes(&project.xcodeproj_path, &project.schemes, schemes)?;
        SideEffectExecutor::new(self.filesystem.as_ref()).execute(&project.side_effects)?;
        Ok(())
    }

    /// Shared schemes go into the container's shared data; user schemes
    /// into the current user's directory.
    fn write_schemes(
        &self,
        container: &std::path::Path,
        schemes: &[SchemeDescriptor],
        serializer: &SchemeSerializer<'_>,
    ) -> WeldResult<()> {
        for descriptor in schemes {
            let directory = if descriptor.shared {
                container.join("xcshareddata").join("xcschemes")
            } else {
                container
                    .join("xcuserdata")
                    .join(format!("{}.xcuserdatad", self.user_name))
                    .join("xcschemes")
            };
            self.filesystem.create_dir_all(&directory)?;
            let path = directory.join(format!("{}.xcscheme", descriptor.scheme.name));
            self.filesystem
                .write_file(&path, &serializer.serialize(&descriptor.scheme))?;
        }
        Ok(())
    }

    fn workspace_data(&self, descriptor: &WorkspaceDescriptor) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<Workspace\n   version = \"1.0\">\n");
        for project in &descriptor.projects {
            let location = project
                .xcodeproj_path
                .strip_prefix(&descriptor.path)
                .map(|relative| relative.to_string_lossy().to_string())
                .unwrap_or_else(|_| project.xcodeproj_path.to_string_lossy().to_string());
            out.push_str(&format!(
                "   <FileRef\n      location = \"group:{location}\">\n   </FileRef>\n"
            ));
        }
        out.push_str("</Workspace>\n");
        out
    }
}

impl DescriptorWriting for LocalWorkspaceWriter {
    #[instrument(skip_all, fields(workspace = %descriptor.workspace.name))]
    fn write_workspace(
        &self,
        descriptor: &WorkspaceDescriptor,
        project_only: bool,
    ) -> WeldResult<()> {
        // Mapping side effects run before any container is written so
        // generated files exist when the IDE opens the result.
        SideEffectExecutor::new(self.filesystem.as_ref()).execute(&descriptor.side_effects)?;

        let schemes = SchemeSerializer::new(descriptor);
        for project in &descriptor.projects {
            self.write_project(project, &schemes)?;
        }

        if !project_only {
            self.filesystem.create_dir_all(&descriptor.xcworkspace_path)?;
            self.filesystem.write_file(
                &descriptor.xcworkspace_path.join("contents.xcworkspacedata"),
                &self.workspace_data(descriptor),
            )?;
            self.write_schemes(&descriptor.xcworkspace_path, &descriptor.schemes, &schemes)?;
        }

        info!(
            projects = descriptor.projects.len(),
            "workspace materialised"
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
