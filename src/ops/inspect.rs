//! Read-only views of what an export would produce.

use serde::Serialize;

use crate::core::project::Project;
use crate::core::target::TargetKind;
use crate::exporter::context::ExportContext;
use crate::exporter::error::ExportError;
use crate::exporter::profile::ExporterVariant;

/// One node of the target graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub name: String,
    pub kind: TargetKind,
    pub guid: String,
    /// Project document file name
    pub project_file: String,
    /// Names of the targets this one links against
    pub depends_on: Vec<String>,
}

/// The target graph of `project` in emission order.
pub fn list_targets(project: &Project, variant: ExporterVariant) -> Result<Vec<TargetSummary>, ExportError> {
    let ctx = ExportContext::new(project, variant, None)?;

    Ok(ctx
        .graph
        .targets()
        .map(|target| TargetSummary {
            name: target.name.clone(),
            kind: target.kind,
            guid: target.guid.clone(),
            project_file: ctx.project_file_name(target),
            depends_on: ctx
                .graph
                .dependencies(target)
                .into_iter()
                .map(|t| t.name.clone())
                .collect(),
        })
        .collect())
}

/// Canonical `Name|Platform` names of every configuration.
pub fn list_configurations(project: &Project) -> Vec<String> {
    project.configurations().map(|c| c.canonical_name()).collect()
}

/// Render target summaries as an indented tree.
pub fn format_targets(targets: &[TargetSummary]) -> String {
    let mut out = String::new();

    for target in targets {
        out.push_str(&format!("{} {}\n", target.name, target.guid));
        out.push_str(&format!("    {}\n", target.project_file));
        for dep in &target.depends_on {
            out.push_str(&format!("    └── {}\n", dep));
        }
    }

    out
}
