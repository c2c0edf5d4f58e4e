//! Derived-directory cleanup.
//!
//! Emits a delete for the project's `Derived` directory so stale generated
//! files never survive a manifest change. Runs before every mapper that
//! writes into it; side effects execute in pipeline order.

use crate::{
    domain::{Project, SideEffectDescriptor},
    error::WeldResult,
    mappers::ProjectMapping,
};

pub struct DeleteDerivedDirectoryProjectMapper;

impl ProjectMapping for DeleteDerivedDirectoryProjectMapper {
    fn map(&self, project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let delete = SideEffectDescriptor::delete_directory(project.derived_directory());
        Ok((project, vec![delete]))
    }
}
