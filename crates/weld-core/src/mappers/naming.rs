//! Organization name and container-name templating.

use crate::{
    domain::{Config, Project, SideEffectDescriptor},
    error::WeldResult,
    mappers::ProjectMapping,
};

const PROJECT_NAME_PLACEHOLDER: &str = "$(project_name)";

pub struct ProjectNameAndOrganizationMapper {
    organization_name: Option<String>,
    file_name_template: Option<String>,
}

impl ProjectNameAndOrganizationMapper {
    /// Captures the first occurrence of each option; duplicates were
    /// already discarded by `Config::new`.
    pub fn new(config: &Config) -> Self {
        Self {
            organization_name: config.organization_name().map(str::to_string),
            file_name_template: config.xcode_project_name().map(str::to_string),
        }
    }
}

impl ProjectMapping for ProjectNameAndOrganizationMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        if project.organization_name.is_none() {
            project.organization_name = self.organization_name.clone();
        }
        if let Some(template) = &self.file_name_template {
            project.file_name = template.replace(PROJECT_NAME_PLACEHOLDER, &project.name);
        }
        Ok((project, Vec::new()))
    }
}
