//! Info.plist synthesis.
//!
//! Targets that declare their Info.plist as a dictionary get the rendered
//! file materialised under `Derived/InfoPlists`, and the target is
//! rewritten to point at the generated path.

use std::sync::Arc;

use crate::{
    domain::{plist, InfoPlist, Project, SideEffectDescriptor},
    error::WeldResult,
    mappers::ProjectMapping,
    services::InfoPlistContentProviding,
};

pub struct GenerateInfoPlistProjectMapper {
    content_provider: Arc<dyn InfoPlistContentProviding>,
}

impl GenerateInfoPlistProjectMapper {
    pub fn new(content_provider: Arc<dyn InfoPlistContentProviding>) -> Self {
        Self { content_provider }
    }
}

impl ProjectMapping for GenerateInfoPlistProjectMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let plists_directory = project.derived_directory().join("InfoPlists");
        let mut side_effects = Vec::new();

        for target in &mut project.targets {
            let Some(InfoPlist::Dictionary(extra)) = &target.info_plist else {
                continue;
            };
            let content = self.content_provider.content(target, extra);
            let path = plists_directory.join(format!("{}.plist", target.name));
            side_effects.push(SideEffectDescriptor::write(
                path.clone(),
                plist::render_xml(&content),
            ));
            target.info_plist = Some(InfoPlist::File(path));
        }

        Ok((project, side_effects))
    }
}
