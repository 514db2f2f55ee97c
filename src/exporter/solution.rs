//! The `.sln` workspace document.

use std::fmt::Write as _;

use crate::core::target::{Target, TargetKind};
use crate::exporter::context::ExportContext;
use crate::exporter::profile::ToolchainProfile;

/// Project type GUID of a Visual C++ project.
const VCXPROJ_TYPE_GUID: &str = "{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}";

const NEWLINE: &str = "\r\n";

/// Render the solution document for the whole target graph.
pub fn solution_document(ctx: &ExportContext<'_>) -> String {
    let mut out = Line::default();

    out.line(format!(
        "Microsoft Visual Studio Solution File, Format Version {}",
        ToolchainProfile::SOLUTION_FORMAT_VERSION
    ));
    out.line(ctx.profile.solution_comment());
    out.line("");

    let shared = ctx.graph.shared_code();

    for target in solution_order(ctx) {
        out.line(format!(
            "Project(\"{}\") = \"{} - {}\", \"{}\", \"{}\"",
            VCXPROJ_TYPE_GUID,
            ctx.project.name,
            target.name,
            ctx.project_file_name(target),
            target.guid
        ));

        if let Some(shared) = shared.filter(|_| !target.is_shared_code()) {
            out.line("\tProjectSection(ProjectDependencies) = postProject");
            out.line(format!("\t\t{0} = {0}", shared.guid));
            out.line("\tEndProjectSection");
        }

        out.line("EndProject");
    }

    out.line("Global");
    out.line("\tGlobalSection(SolutionConfigurationPlatforms) = preSolution");
    for config in ctx.project.configurations() {
        let name = config.canonical_name();
        out.line(format!("\t\t{0} = {0}", name));
    }
    out.line("\tEndGlobalSection");

    out.line("\tGlobalSection(ProjectConfigurationPlatforms) = postSolution");
    for target in ctx.graph.targets() {
        for config in ctx.project.configurations() {
            let name = config.canonical_name();
            for entry in ["ActiveCfg", "Build.0"] {
                out.line(format!("\t\t{}.{}.{} = {}", target.guid, name, entry, name));
            }
        }
    }
    out.line("\tEndGlobalSection");

    out.line("\tGlobalSection(SolutionProperties) = preSolution");
    out.line("\t\tHideSolutionNode = FALSE");
    out.line("\tEndGlobalSection");
    out.line("EndGlobal");

    out.0
}

/// Targets in the order Visual Studio should list them.
///
/// With shared code the standalone application comes first so it becomes
/// the default startup project.
fn solution_order<'g>(ctx: &'g ExportContext<'_>) -> Vec<&'g Target> {
    let mut targets: Vec<&Target> = ctx.graph.targets().collect();

    if ctx.graph.shared_code().is_some() {
        targets.sort_by_key(|t| t.kind != TargetKind::Standalone);
    }

    targets
}

#[derive(Default)]
struct Line(String);

impl Line {
    fn line(&mut self, text: impl AsRef<str>) {
        let _ = write!(self.0, "{}{}", text.as_ref(), NEWLINE);
    }
}
