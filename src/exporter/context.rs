//! Per-run export state.
//!
//! An [`ExportContext`] is built once at the start of an export, after the
//! target graph has been validated, and is passed by reference to every
//! emitter. Nothing in it changes once the resource pack has been attached.

use std::path::{Path, PathBuf};

use crate::core::config::{BuildConfiguration, RuntimeLinkage};
use crate::core::defines::Defines;
use crate::core::project::Project;
use crate::core::target::{Target, TargetKind};
use crate::exporter::error::ExportError;
use crate::exporter::graph::TargetGraph;
use crate::exporter::paths::PathRebaser;
use crate::exporter::profile::{ExporterVariant, ToolchainProfile};

/// File name of the generated icon container.
pub const ICON_FILE_NAME: &str = "icon.ico";

/// File name of the generated resource script.
pub const RC_FILE_NAME: &str = "resources.rc";

/// Everything the emitters need to know about the current run.
#[derive(Debug)]
pub struct ExportContext<'a> {
    pub project: &'a Project,
    pub graph: TargetGraph,
    pub profile: &'static ToolchainProfile,
    pub toolset: String,
    pub windows_sdk: String,
    /// Absolute target folder
    pub target_folder: PathBuf,
    pub rebaser: PathRebaser,
    /// Icon file name inside the target folder, when one is written
    pub icon_file: Option<String>,
    /// Resource script file name inside the target folder, when one is written
    pub rc_file: Option<String>,
}

impl<'a> ExportContext<'a> {
    /// Validate the project for `variant` and resolve the target folder.
    ///
    /// `target_folder` overrides the manifest and profile defaults; relative
    /// folders are taken from the project root.
    pub fn new(
        project: &'a Project,
        variant: ExporterVariant,
        target_folder: Option<&Path>,
    ) -> Result<Self, ExportError> {
        let profile = variant.profile();
        let graph = TargetGraph::build(&project.id, &project.formats)?;

        let toolset = match &project.exporter.toolset {
            Some(toolset) if !profile.offers_toolset(toolset) => {
                return Err(ExportError::configuration(format!(
                    "toolset `{}` is not available for {}, expected one of: {}",
                    toolset,
                    profile.display_name(),
                    profile.toolsets.join(", ")
                )));
            }
            Some(toolset) => toolset.clone(),
            None => profile.default_toolset.to_string(),
        };

        let windows_sdk = project
            .exporter
            .windows_sdk
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| profile.default_windows_sdk.to_string());

        let folder = match target_folder {
            Some(folder) => folder.to_path_buf(),
            None => PathBuf::from(
                project
                    .exporter
                    .target_folder
                    .clone()
                    .unwrap_or_else(|| profile.default_target_folder()),
            ),
        };
        let target_folder = project.root.join(folder);

        let rebaser = PathRebaser::new(project.root.clone(), target_folder.clone());

        Ok(ExportContext {
            project,
            graph,
            profile,
            toolset,
            windows_sdk,
            target_folder,
            rebaser,
            icon_file: None,
            rc_file: None,
        })
    }

    /// Record which resource files this run writes.
    pub fn with_resources(mut self, has_icon: bool, has_rc: bool) -> Self {
        self.icon_file = has_icon.then(|| ICON_FILE_NAME.to_string());
        self.rc_file = has_rc.then(|| RC_FILE_NAME.to_string());
        self
    }

    /// Whether a resource pack is produced at all.
    pub fn wants_resources(&self) -> bool {
        !self.project.is_static_library_only()
    }

    /// Rebase `path`, failing with a path error attributed to `target`.
    pub fn rebase_for(&self, target: &Target, path: &str) -> Result<String, ExportError> {
        self.rebaser
            .rebase(path)
            .ok_or_else(|| self.path_error(target, path))
    }

    /// Rebased, escaped and quoted form of `path`.
    pub fn rebase_quoted_for(&self, target: &Target, path: &str) -> Result<String, ExportError> {
        self.rebaser
            .rebase_quoted(path)
            .ok_or_else(|| self.path_error(target, path))
    }

    fn path_error(&self, target: &Target, path: &str) -> ExportError {
        ExportError::path_resolution(
            target.name.clone(),
            path,
            format!(
                "no relative path from `{}` exists",
                self.target_folder.display()
            ),
        )
    }

    /// Project and configuration defines, used for `${NAME}` token replacement.
    pub fn user_defines(&self, config: &BuildConfiguration) -> Defines {
        self.project.defines.clone().merged(&config.defines)
    }

    /// Runtime linkage for `config`; unset means dynamic only for AAX or RTAS builds.
    pub fn runtime_for(&self, config: &BuildConfiguration) -> RuntimeLinkage {
        config.runtime.unwrap_or_else(|| {
            if self.graph.has_kind(TargetKind::Aax) || self.graph.has_kind(TargetKind::Rtas) {
                RuntimeLinkage::Dynamic
            } else {
                RuntimeLinkage::Static
            }
        })
    }

    /// `<root>_<TargetName>` stem of a target's documents.
    pub fn target_file_stem(&self, target: &Target) -> String {
        format!("{}_{}", self.project.filename_root(), target.file_stem_part())
    }

    pub fn project_file_name(&self, target: &Target) -> String {
        format!("{}.vcxproj", self.target_file_stem(target))
    }

    pub fn filters_file_name(&self, target: &Target) -> String {
        format!("{}.vcxproj.filters", self.target_file_stem(target))
    }

    pub fn solution_file_name(&self) -> String {
        format!("{}.sln", self.project.filename_root())
    }

    /// Binary output folder shared by every target for `config`.
    pub fn solution_target_path(&self, target: &Target, config: &BuildConfiguration) -> Result<String, ExportError> {
        let binary_path = config.binary_path.trim();

        if binary_path.is_empty() {
            return Ok("$(SolutionDir)$(Platform)\\$(Configuration)".to_string());
        }

        self.rebaser
            .rebase_with_dot(binary_path)
            .ok_or_else(|| self.path_error(target, binary_path))
    }

    /// Output folder of `target` for `config`.
    pub fn config_target_path(&self, target: &Target, config: &BuildConfiguration) -> Result<String, ExportError> {
        Ok(format!(
            "{}\\{}",
            self.solution_target_path(target, config)?,
            target.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::OutputFormat;

    fn project(formats: &[OutputFormat]) -> Project {
        let mut project = Project::new("My Synth", "/work/synth");
        project.formats = formats.to_vec();
        project.configurations = vec![
            BuildConfiguration::debug("Synth"),
            BuildConfiguration::release("Synth"),
        ];
        project
    }

    #[test]
    fn test_defaults_from_profile() {
        let project = project(&[OutputFormat::App]);
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2015, None).unwrap();

        assert_eq!(ctx.toolset, "v140");
        assert_eq!(ctx.windows_sdk, "8.1");
        assert_eq!(
            ctx.target_folder,
            PathBuf::from("/work/synth/Builds/VisualStudio2015")
        );
        assert!(ctx.icon_file.is_none());
    }

    #[test]
    fn test_toolset_must_be_offered() {
        let mut project = project(&[OutputFormat::App]);
        project.exporter.toolset = Some("v141".to_string());

        let err = ExportContext::new(&project, ExporterVariant::Vs2013, None).unwrap_err();
        assert!(matches!(err, ExportError::Configuration { .. }));
        assert!(err.to_string().contains("v120"));

        assert!(ExportContext::new(&project, ExporterVariant::Vs2017, None).is_ok());
    }

    #[test]
    fn test_file_names() {
        let project = project(&[OutputFormat::Vst3, OutputFormat::Standalone]);
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2017, Some(Path::new("out")))
            .unwrap();

        let names: Vec<_> = ctx.graph.targets().map(|t| ctx.project_file_name(t)).collect();
        assert_eq!(
            names,
            vec![
                "MySynth_SharedCode.vcxproj",
                "MySynth_VST3.vcxproj",
                "MySynth_StandalonePlugin.vcxproj",
            ]
        );
        assert_eq!(ctx.solution_file_name(), "MySynth.sln");
        assert_eq!(ctx.target_folder, PathBuf::from("/work/synth/out"));
    }

    #[test]
    fn test_runtime_default_depends_on_graph() {
        let config = BuildConfiguration::debug("Synth");

        let project = project(&[OutputFormat::Vst3, OutputFormat::Vst]);
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2017, None).unwrap();
        assert_eq!(ctx.runtime_for(&config), RuntimeLinkage::Static);

        let project = self::project(&[OutputFormat::Vst3, OutputFormat::Aax]);
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2017, None).unwrap();
        assert_eq!(ctx.runtime_for(&config), RuntimeLinkage::Dynamic);
    }

    #[test]
    fn test_target_paths() {
        let project = project(&[OutputFormat::App]);
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2017, None).unwrap();
        let target = ctx.graph.targets().next().unwrap().clone();

        let mut config = BuildConfiguration::debug("Synth");
        assert_eq!(
            ctx.config_target_path(&target, &config).unwrap(),
            "$(SolutionDir)$(Platform)\\$(Configuration)\\App"
        );

        config.binary_path = "bin".to_string();
        assert_eq!(
            ctx.solution_target_path(&target, &config).unwrap(),
            ".\\..\\..\\bin"
        );

        config.binary_path = "D:/out".to_string();
        assert_eq!(ctx.solution_target_path(&target, &config).unwrap(), "D:\\out");
    }
}
