//! Companion resource bundles for library-like targets.
//!
//! Frameworks and libraries cannot carry loose resources; when one
//! declares any, the mapper moves them into a generated bundle target and
//! adds the dependency edge back to the host.

use crate::{
    domain::{Product, Project, SideEffectDescriptor, Target, TargetDependency},
    error::WeldResult,
    mappers::ProjectMapping,
};

pub struct ResourcesProjectMapper;

impl ProjectMapping for ResourcesProjectMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let mut bundles: Vec<Target> = Vec::new();
        for target in &mut project.targets {
            if !target.product.is_linkable() || target.resources.is_empty() {
                continue;
            }
            let bundle_name = format!("{}Resources", target.name);
            let mut bundle = Target::new(&bundle_name, target.platform, Product::Bundle);
            bundle.bundle_id = format!("{}.resources", target.bundle_id);
            bundle.resources = std::mem::take(&mut target.resources);
            target
                .dependencies
                .push(TargetDependency::target(&bundle_name));
            bundles.push(bundle);
        }
        project.targets.extend(bundles);
        Ok((project, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, ResourceFileElement};
    use std::path::PathBuf;

    #[test]
    fn framework_resources_move_into_a_bundle_target() {
        let mut kit = Target::new("Kit", Platform::Ios, Product::Framework);
        kit.resources = vec![ResourceFileElement::File(PathBuf::from(
            "/ws/Kit/Resources/strings.json",
        ))];
        let mut project = Project::new("/ws/Kit", "Kit");
        project.targets = vec![kit];

        let (mapped, effects) = ResourcesProjectMapper.map(project).unwrap();
        assert!(effects.is_empty());
        assert_eq!(mapped.targets.len(), 2);

        let host = mapped.target("Kit").unwrap();
        assert!(host.resources.is_empty());
        assert!(host
            .dependencies
            .contains(&TargetDependency::target("KitResources")));

        let bundle = mapped.target("KitResources").unwrap();
        assert_eq!(bundle.product, Product::Bundle);
        assert_eq!(bundle.bundle_id, "io.weld.Kit.resources");
        assert_eq!(bundle.resources.len(), 1);
    }

    #[test]
    fn app_targets_keep_their_resources() {
        let mut app = Target::new("App", Platform::Ios, Product::App);
        app.resources = vec![ResourceFileElement::File(PathBuf::from("/ws/App/a.png"))];
        let mut project = Project::new("/ws/App", "App");
        project.targets = vec![app];

        let (mapped, _) = ResourcesProjectMapper.map(project).unwrap();
        assert_eq!(mapped.targets.len(), 1);
        assert_eq!(mapped.target("App").unwrap().resources.len(), 1);
    }

    #[test]
    fn resourceless_frameworks_are_untouched() {
        let mut project = Project::new("/ws/Kit", "Kit");
        project.targets = vec![Target::new("Kit", Platform::Ios, Product::Framework)];
        let (mapped, _) = ResourcesProjectMapper.map(project).unwrap();
        assert_eq!(mapped.targets.len(), 1);
    }
}
