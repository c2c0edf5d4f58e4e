//! Typed accessor synthesis for recognised resource kinds.
//!
//! For every synthesizer the project enables, matching resources produce a
//! generated Swift source under `Derived/Sources` which is appended to the
//! target's source list.

use std::path::PathBuf;

use crate::{
    domain::{Project, ResourceFileElement, ResourceSynthesizer, SideEffectDescriptor, Target},
    error::WeldResult,
    mappers::ProjectMapping,
};

pub struct SynthesizedResourceInterfaceProjectMapper;

impl ProjectMapping for SynthesizedResourceInterfaceProjectMapper {
    fn map(&self, mut project: Project) -> WeldResult<(Project, Vec<SideEffectDescriptor>)> {
        let sources_directory = project.derived_directory().join("Sources");
        let synthesizers = project.resource_synthesizers.clone();
        let mut side_effects = Vec::new();

        for target in &mut project.targets {
            for synthesizer in &synthesizers {
                let matched = matching_resources(target, *synthesizer);
                if matched.is_empty() {
                    continue;
                }
                let path = sources_directory.join(format!(
                    "{}+{}.swift",
                    synthesizer.accessor_prefix(),
                    target.name
                ));
                side_effects.push(SideEffectDescriptor::write(
                    path.clone(),
                    accessor_source(&target.name, *synthesizer, &matched),
                ));
                target.sources.push(path);
            }
        }

        Ok((project, side_effects))
    }
}

fn matching_resources(target: &Target, synthesizer: ResourceSynthesizer) -> Vec<PathBuf> {
    let mut matched: Vec<PathBuf> = target
        .resources
        .iter()
        .filter_map(|resource| match resource {
            ResourceFileElement::File(path) => Some(path),
            ResourceFileElement::FolderReference(_) => None,
        })
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| synthesizer.extensions().contains(&ext))
        })
        .cloned()
        .collect();
    matched.sort();
    matched
}

/// A constants namespace per synthesizer kind, one entry per resource.
fn accessor_source(
    target_name: &str,
    synthesizer: ResourceSynthesizer,
    resources: &[PathBuf],
) -> String {
    let mut out = String::new();
    out.push_str("// Generated by weld. Do not edit.\n");
    out.push_str("import Foundation\n\n");
    out.push_str(&format!(
        "public enum {}{} {{\n",
        target_name,
        synthesizer.accessor_prefix()
    ));
    for resource in resources {
        let stem = resource
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "    public static let {} = \"{}\"\n",
            swift_identifier(&stem),
            stem
        ));
    }
    out.push_str("}\n");
    out
}

fn swift_identifier(raw: &str) -> String {
    let mut identifier: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if identifier
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        identifier.insert(0, '_');
    }
    identifier
}
