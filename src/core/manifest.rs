//! Forge.toml manifest parsing.
//!
//! The manifest is the single input of an export. Loading it produces a
//! [`Project`] whose group tree has already been expanded from any
//! directory-backed groups, so the exporter never touches the source tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::core::config::{
    Architecture, BuildConfiguration, CharacterSet, DebugInformationFormat, OptimisationLevel,
    RuntimeLinkage, WarningLevel,
};
use crate::core::defines::Defines;
use crate::core::project::{
    CppStandard, ExporterSettings, FileEntry, IconSettings, Project, ProjectGroup, ProjectItem,
};
use crate::core::target::OutputFormat;
use crate::exporter::error::ExportError;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Forge.toml";

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    project: RawProject,

    #[serde(default)]
    exporter: ExporterSettings,

    #[serde(default)]
    configuration: Vec<RawConfiguration>,

    #[serde(default)]
    group: Vec<RawGroup>,

    #[serde(default)]
    icon: Option<RawIcon>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,

    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    company: String,

    #[serde(default)]
    copyright: String,

    #[serde(default)]
    cpp_standard: CppStandard,

    #[serde(default)]
    formats: Vec<OutputFormat>,

    #[serde(default)]
    defines: Defines,

    #[serde(default)]
    module_defines: Defines,

    #[serde(default)]
    header_paths: Vec<String>,

    #[serde(default)]
    module_libs: Vec<String>,
}

/// Raw `[[configuration]]`; unset fields fall back to debug-aware defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfiguration {
    name: String,
    debug: Option<bool>,
    architecture: Option<Architecture>,
    optimisation: Option<OptimisationLevel>,
    warning_level: Option<WarningLevel>,
    warnings_as_errors: Option<bool>,
    runtime: Option<RuntimeLinkage>,
    intermediates_path: Option<String>,
    binary_path: Option<String>,
    target_name: Option<String>,
    library_paths: Vec<String>,
    header_paths: Vec<String>,
    defines: Defines,
    lto: Option<bool>,
    force_debug_symbols: Option<bool>,
    debug_information_format: Option<DebugInformationFormat>,
    fast_math: Option<bool>,
    incremental_linking: Option<bool>,
    generate_manifest: Option<bool>,
    character_set: Option<CharacterSet>,
    prebuild_command: Option<String>,
    postbuild_command: Option<String>,
    module_definition_file: Option<String>,
    plugin_copy_step: Option<bool>,
    vst_location: Option<String>,
    vst3_location: Option<String>,
    rtas_location: Option<String>,
    aax_location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    name: String,

    /// Directory walked to fill the group
    #[serde(default)]
    path: Option<String>,

    #[serde(default)]
    files: Vec<RawFile>,

    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFile {
    Simple(String),
    Detailed {
        path: String,
        #[serde(default = "default_true")]
        compile: bool,
        #[serde(default)]
        resource: bool,
        #[serde(default)]
        target: Option<OutputFormat>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawIcon {
    #[serde(default)]
    images: Vec<PathBuf>,

    #[serde(default)]
    ico: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

/// Manifest loading entry points.
pub struct Manifest;

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Project, ExportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::Manifest {
            path: path.to_path_buf(),
            message: format!("failed to read manifest: {}", e),
        })?;

        let root = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let root = std::path::absolute(&root).unwrap_or(root);

        Self::parse(&content, path, &root)
    }

    /// Parse manifest content; `root` is the absolute project folder.
    pub fn parse(content: &str, path: &Path, root: &Path) -> Result<Project, ExportError> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| ExportError::Manifest {
            path: path.to_path_buf(),
            message: format!("failed to parse {}: {}", MANIFEST_NAME, e.message()),
        })?;

        let mut project = Project::new(raw.project.name.clone(), root);
        project.id = raw.project.id.unwrap_or_else(|| raw.project.name.clone());
        if let Some(version) = raw.project.version {
            project.version = version;
        }
        project.company = raw.project.company;
        project.copyright = raw.project.copyright;
        project.cpp_standard = raw.project.cpp_standard;
        project.formats = dedup_formats(raw.project.formats);
        project.defines = raw.project.defines;
        project.module_defines = raw.project.module_defines;
        project.header_paths = raw.project.header_paths;
        project.module_libs = raw.project.module_libs;
        project.exporter = raw.exporter;

        project.configurations = if raw.configuration.is_empty() {
            vec![
                BuildConfiguration::debug(&project.name),
                BuildConfiguration::release(&project.name),
            ]
        } else {
            raw.configuration
                .into_iter()
                .map(|c| convert_configuration(c, &project.name))
                .collect()
        };
        validate_configurations(&project.configurations)?;

        for raw_group in raw.group {
            let group = convert_group(raw_group, root, path)?;
            project.groups.push(group);
        }

        if let Some(icon) = raw.icon {
            project.icon = IconSettings {
                images: icon.images,
                ico: icon.ico,
            };
        }

        Ok(project)
    }
}

/// Find the manifest in `start` or any of its ancestors.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn dedup_formats(formats: Vec<OutputFormat>) -> Vec<OutputFormat> {
    let mut seen = HashSet::new();
    formats.into_iter().filter(|f| seen.insert(*f)).collect()
}

fn convert_configuration(raw: RawConfiguration, project_name: &str) -> BuildConfiguration {
    let is_debug = raw
        .debug
        .unwrap_or_else(|| raw.name.to_ascii_lowercase().contains("debug"));
    let arch = raw.architecture.unwrap_or_default();
    let target_name = raw.target_name.unwrap_or_else(|| project_name.to_string());

    let mut config = BuildConfiguration::new(raw.name, is_debug, arch, target_name);

    if let Some(v) = raw.optimisation {
        config.optimisation = v;
    }
    if let Some(v) = raw.warning_level {
        config.warning_level = v;
    }
    if let Some(v) = raw.warnings_as_errors {
        config.warnings_as_errors = v;
    }
    config.runtime = raw.runtime;
    if let Some(v) = raw.intermediates_path {
        config.intermediates_path = v;
    }
    if let Some(v) = raw.binary_path {
        config.binary_path = v;
    }
    config.library_paths = raw.library_paths;
    config.header_paths = raw.header_paths;
    config.defines = raw.defines;
    if let Some(v) = raw.lto {
        config.link_time_optimisation = v;
    }
    if let Some(v) = raw.force_debug_symbols {
        config.force_debug_symbols = v;
    }
    if let Some(v) = raw.debug_information_format {
        config.debug_information_format = v;
    }
    if let Some(v) = raw.fast_math {
        config.fast_math = v;
    }
    if let Some(v) = raw.incremental_linking {
        config.incremental_linking = v;
    }
    if let Some(v) = raw.generate_manifest {
        config.generate_manifest = v;
    }
    config.character_set = raw.character_set;
    if let Some(v) = raw.prebuild_command {
        config.prebuild_command = v;
    }
    if let Some(v) = raw.postbuild_command {
        config.postbuild_command = v;
    }
    if let Some(v) = raw.module_definition_file {
        config.module_definition_file = v;
    }
    if let Some(v) = raw.plugin_copy_step {
        config.plugin_copy_step = v;
    }
    if let Some(v) = raw.vst_location {
        config.install_locations.vst = v;
    }
    if let Some(v) = raw.vst3_location {
        config.install_locations.vst3 = v;
    }
    if let Some(v) = raw.rtas_location {
        config.install_locations.rtas = v;
    }
    if let Some(v) = raw.aax_location {
        config.install_locations.aax = v;
    }

    config
}

/// Configuration names must be non-empty and unique per architecture.
fn validate_configurations(configs: &[BuildConfiguration]) -> Result<(), ExportError> {
    let mut seen = HashSet::new();

    for config in configs {
        if config.name.trim().is_empty() {
            return Err(ExportError::configuration("configuration with an empty name"));
        }

        let canonical = config.canonical_name();
        if !seen.insert(canonical.clone()) {
            return Err(ExportError::for_configuration(
                format!("duplicate configuration `{}`", canonical),
                canonical,
            ));
        }
    }

    Ok(())
}

fn convert_group(raw: RawGroup, root: &Path, manifest: &Path) -> Result<ProjectGroup, ExportError> {
    let mut group = ProjectGroup::new(raw.name);

    if let Some(dir) = raw.path {
        let dir = PathBuf::from(dir);
        let absolute = root.join(&dir);

        if !absolute.is_dir() {
            return Err(ExportError::Manifest {
                path: manifest.to_path_buf(),
                message: format!("group `{}` points at missing folder `{}`", group.name, dir.display()),
            });
        }

        group.items = walk_folder(&absolute, &dir);
    }

    for file in raw.files {
        group.items.push(ProjectItem::File(convert_file(file)));
    }

    for child in raw.groups {
        group.items.push(ProjectItem::Group(convert_group(child, root, manifest)?));
    }

    Ok(group)
}

fn convert_file(raw: RawFile) -> FileEntry {
    match raw {
        RawFile::Simple(path) => FileEntry::new(path),
        RawFile::Detailed {
            path,
            compile,
            resource,
            target,
        } => FileEntry {
            path: PathBuf::from(path),
            compile,
            resource,
            target,
        },
    }
}

/// Expand a folder into group items, sub-folders becoming nested groups.
///
/// `relative` is the folder's path relative to the project root. Entries are
/// sorted by name and hidden entries are skipped.
fn walk_folder(absolute: &Path, relative: &Path) -> Vec<ProjectItem> {
    let mut items = Vec::new();

    let entries = WalkDir::new(absolute)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry in {}: {}", absolute.display(), err);
                None
            }
        });

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let child_relative = relative.join(&name);

        if entry.file_type().is_dir() {
            let children = walk_folder(entry.path(), &child_relative);
            if !children.is_empty() {
                items.push(ProjectItem::Group(ProjectGroup {
                    name,
                    items: children,
                }));
            }
        } else {
            items.push(ProjectItem::File(FileEntry::new(child_relative)));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Project, ExportError> {
        Manifest::parse(content, Path::new("/proj/Forge.toml"), Path::new("/proj"))
    }

    #[test]
    fn test_minimal_manifest() {
        let project = parse(
            r#"
[project]
name = "Synth"
formats = ["vst3", "standalone"]
"#,
        )
        .unwrap();

        assert_eq!(project.name, "Synth");
        assert_eq!(project.id, "Synth");
        assert_eq!(project.formats, vec![OutputFormat::Vst3, OutputFormat::Standalone]);

        let names: Vec<_> = project.configurations().map(|c| c.canonical_name()).collect();
        assert_eq!(names, vec!["Debug|x64", "Release|x64"]);
        assert_eq!(project.configurations[0].target_name, "Synth");
    }

    #[test]
    fn test_full_configuration() {
        let project = parse(
            r#"
[project]
name = "Synth"
id = "AbC123"
version = "2.1"
cpp_standard = "17"
formats = ["app"]
defines = ["FOO", "BAR=2"]

[exporter]
variant = "vs2015"
toolset = "v140_xp"
external_libraries = ["ws2_32.lib"]

[[configuration]]
name = "Debug"
architecture = "Win32"
optimisation = "min-size"
warning_level = 3
runtime = "static"
defines = [{ name = "LEVEL", value = "debug" }]

[[configuration]]
name = "Release"
debug = false
lto = false
plugin_copy_step = true
vst3_location = "D:\\VST3"
"#,
        )
        .unwrap();

        assert_eq!(project.id, "AbC123");
        assert_eq!(project.cpp_standard, CppStandard::Cpp17);
        assert_eq!(project.defines.join(";"), "FOO;BAR=2");
        assert_eq!(
            project.exporter.variant,
            Some(crate::exporter::profile::ExporterVariant::Vs2015)
        );

        let debug = &project.configurations[0];
        assert!(debug.is_debug);
        assert_eq!(debug.canonical_name(), "Debug|Win32");
        assert_eq!(debug.optimisation, OptimisationLevel::MinSize);
        assert_eq!(debug.warning_level.get(), 3);
        assert_eq!(debug.runtime, Some(RuntimeLinkage::Static));
        assert_eq!(debug.defines.get("LEVEL"), Some("debug"));
        assert!(debug.install_locations.vst3.starts_with("%CommonProgramFiles(x86)%"));

        let release = &project.configurations[1];
        assert!(!release.is_debug);
        assert!(!release.link_time_optimisation);
        assert!(release.plugin_copy_step);
        assert_eq!(release.install_locations.vst3, "D:\\VST3");
    }

    #[test]
    fn test_duplicate_configuration_rejected() {
        let err = parse(
            r#"
[project]
name = "Synth"
formats = ["app"]

[[configuration]]
name = "Debug"

[[configuration]]
name = "Debug"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ExportError::Configuration { .. }));
        assert!(err.to_string().contains("Debug|x64"));
    }

    #[test]
    fn test_same_name_different_architecture_allowed() {
        let project = parse(
            r#"
[project]
name = "Synth"
formats = ["app"]

[[configuration]]
name = "Debug"
architecture = "x64"

[[configuration]]
name = "Debug"
architecture = "Win32"
"#,
        )
        .unwrap();

        assert_eq!(project.configurations.len(), 2);
    }

    #[test]
    fn test_parse_error_is_manifest_error() {
        let err = parse("[project\nname = ").unwrap_err();
        assert!(matches!(err, ExportError::Manifest { .. }));
    }

    #[test]
    fn test_explicit_file_entries() {
        let project = parse(
            r#"
[project]
name = "Synth"
formats = ["vst3", "aax"]

[[group]]
name = "Source"
files = [
    "Source/Main.cpp",
    { path = "Source/Notes.txt", compile = false },
    { path = "Source/Wrapper.cpp", target = "aax" },
    { path = "Source/Logo.png", resource = true },
]

[[group.groups]]
name = "UI"
files = ["Source/UI/Editor.cpp"]
"#,
        )
        .unwrap();

        let files = project.files();
        assert_eq!(files.len(), 5);
        assert!(!files[1].compile);
        assert_eq!(files[2].target, Some(OutputFormat::Aax));
        assert!(files[3].resource);
        assert_eq!(files[4].path, PathBuf::from("Source/UI/Editor.cpp"));
    }

    #[test]
    fn test_folder_group_is_walked_sorted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("Source/UI")).unwrap();
        std::fs::write(root.join("Source/b.cpp"), "").unwrap();
        std::fs::write(root.join("Source/a.h"), "").unwrap();
        std::fs::write(root.join("Source/.hidden"), "").unwrap();
        std::fs::write(root.join("Source/UI/Editor.cpp"), "").unwrap();
        std::fs::create_dir_all(root.join("Source/Empty")).unwrap();

        let manifest = root.join(MANIFEST_NAME);
        std::fs::write(
            &manifest,
            r#"
[project]
name = "Synth"
formats = ["app"]

[[group]]
name = "Source"
path = "Source"
"#,
        )
        .unwrap();

        let project = Manifest::load(&manifest).unwrap();
        let group = &project.groups[0];

        let names: Vec<String> = group
            .items
            .iter()
            .map(|item| match item {
                ProjectItem::File(f) => f.path.to_string_lossy().replace('\\', "/"),
                ProjectItem::Group(g) => format!("[{}]", g.name),
            })
            .collect();
        assert_eq!(names, vec!["[UI]", "Source/a.h", "Source/b.cpp"]);
        assert_eq!(find_manifest(&root.join("Source/UI")), Some(manifest));
    }

    #[test]
    fn test_missing_group_folder() {
        let tmp = TempDir::new().unwrap();
        let err = Manifest::parse(
            "[project]\nname = \"S\"\n[[group]]\nname = \"Src\"\npath = \"nope\"\n",
            &tmp.path().join(MANIFEST_NAME),
            tmp.path(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("missing folder"));
    }
}
