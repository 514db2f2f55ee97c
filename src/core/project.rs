//! The in-memory project model an export reads from.
//!
//! A [`Project`] is built once by the manifest loader and never mutated
//! during an export.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::config::BuildConfiguration;
use crate::core::defines::Defines;
use crate::core::target::{OutputFormat, TargetKind};
use crate::exporter::profile::ExporterVariant;

/// C++ language standard requested by the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CppStandard {
    #[serde(rename = "11", alias = "c++11")]
    Cpp11,
    #[default]
    #[serde(rename = "14", alias = "c++14")]
    Cpp14,
    #[serde(rename = "17", alias = "c++17")]
    Cpp17,
    #[serde(rename = "latest", alias = "c++latest")]
    Latest,
}

impl CppStandard {
    /// The `<LanguageStandard>` token.
    ///
    /// The MSVC toolchain has no C++11 switch, so 11 maps to 14.
    pub fn msvc_token(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 | CppStandard::Cpp14 => "stdcpp14",
            CppStandard::Cpp17 => "stdcpp17",
            CppStandard::Latest => "stdcpplatest",
        }
    }
}

impl fmt::Display for CppStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CppStandard::Cpp11 => "C++11",
            CppStandard::Cpp14 => "C++14",
            CppStandard::Cpp17 => "C++17",
            CppStandard::Latest => "C++latest",
        };
        f.write_str(s)
    }
}

/// How a file takes part in a build, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// C, C++ and assembly sources
    Compilable,
    Header,
    /// Objective-C sources, never listed in a Visual Studio project
    Excluded,
    /// Anything else; listed but not built
    Other,
}

impl FileCategory {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "c" | "cpp" | "cc" | "cxx" | "asm" | "s" => FileCategory::Compilable,
            "h" | "hpp" | "hxx" | "hh" | "inl" => FileCategory::Header,
            "m" | "mm" => FileCategory::Excluded,
            _ => FileCategory::Other,
        }
    }
}

/// A file listed in the project's group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the project root, or absolute
    pub path: PathBuf,
    /// Whether the file is compiled (only meaningful for sources)
    pub compile: bool,
    /// Binary resources are embedded by other means and never listed
    pub resource: bool,
    /// Explicit format this file belongs to
    pub target: Option<OutputFormat>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileEntry {
            path: path.into(),
            compile: true,
            resource: false,
            target: None,
        }
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_path(&self.path)
    }

    /// The format this file is dedicated to: the explicit tag if present,
    /// otherwise one inferred from a `_VST3`-style stem suffix.
    pub fn format_tag(&self) -> Option<OutputFormat> {
        if self.target.is_some() {
            return self.target;
        }

        let stem = self.path.file_stem()?.to_str()?.to_ascii_lowercase();

        OutputFormat::ALL.iter().copied().find(|format| {
            format.file_suffix().is_some_and(|suffix| {
                let suffix = suffix.to_ascii_lowercase();
                stem.ends_with(&suffix) || stem.contains(&format!("{}_", suffix))
            })
        })
    }

    /// Whether this file gets the RTAS `StdCall` calling convention.
    pub fn uses_std_call(&self) -> bool {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| {
                stem.to_ascii_lowercase()
                    .starts_with("audio_plugin_client_rtas_")
            })
    }
}

/// A node in the group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectItem {
    Group(ProjectGroup),
    File(FileEntry),
}

/// A named folder of files and sub-groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGroup {
    pub name: String,
    pub items: Vec<ProjectItem>,
}

impl ProjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectGroup {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: FileEntry) -> Self {
        self.items.push(ProjectItem::File(file));
        self
    }

    pub fn with_group(mut self, group: ProjectGroup) -> Self {
        self.items.push(ProjectItem::Group(group));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every file below this group, depth first.
    pub fn files(&self) -> Vec<&FileEntry> {
        let mut out = Vec::new();
        collect_files(&self.items, &mut out);
        out
    }
}

fn collect_files<'a>(items: &'a [ProjectItem], out: &mut Vec<&'a FileEntry>) {
    for item in items {
        match item {
            ProjectItem::File(file) => out.push(file),
            ProjectItem::Group(group) => collect_files(&group.items, out),
        }
    }
}

/// Exporter-level settings from the `[exporter]` manifest section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterSettings {
    pub variant: Option<ExporterVariant>,
    /// Output folder relative to the project root
    pub target_folder: Option<String>,
    pub toolset: Option<String>,
    pub windows_sdk: Option<String>,
    pub ipp_library: Option<String>,
    /// Manifest file linked into the binary, relative to the project root
    pub manifest_file: Option<String>,
    pub extra_compiler_flags: String,
    pub extra_linker_flags: String,
    pub external_libraries: Vec<String>,
    pub delay_loaded_dlls: Vec<String>,
    pub header_paths: Vec<String>,
    pub vst3_sdk: String,
    pub aax_sdk: String,
    pub rtas_sdk: String,
    /// Folder holding the plugin client sources (RTAS exports, packaging)
    pub plugin_client_dir: String,
}

/// Icon sources from the `[icon]` manifest section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSettings {
    /// Image files icon frames are rendered from
    pub images: Vec<PathBuf>,
    /// A ready-made `.ico` copied as-is
    pub ico: Option<PathBuf>,
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    /// Identity string stable identifiers are derived from
    pub id: String,
    pub version: String,
    pub company: String,
    pub copyright: String,
    pub cpp_standard: CppStandard,
    pub formats: Vec<OutputFormat>,
    pub defines: Defines,
    pub module_defines: Defines,
    pub header_paths: Vec<String>,
    /// Library stems; `.lib` is appended on emission
    pub module_libs: Vec<String>,
    pub exporter: ExporterSettings,
    pub configurations: Vec<BuildConfiguration>,
    pub groups: Vec<ProjectGroup>,
    pub icon: IconSettings,
    /// Absolute project root
    pub root: PathBuf,
}

impl Project {
    /// A project with no files, formats or configurations.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Project {
            id: name.clone(),
            name,
            version: "1.0.0".to_string(),
            company: String::new(),
            copyright: String::new(),
            cpp_standard: CppStandard::default(),
            formats: Vec::new(),
            defines: Defines::new(),
            module_defines: Defines::new(),
            header_paths: Vec::new(),
            module_libs: Vec::new(),
            exporter: ExporterSettings::default(),
            configurations: Vec::new(),
            groups: Vec::new(),
            icon: IconSettings::default(),
            root: root.into(),
        }
    }

    /// Configurations in declaration order.
    pub fn configurations(&self) -> impl Iterator<Item = &BuildConfiguration> {
        self.configurations.iter()
    }

    /// Root used for generated file names: the project name without
    /// characters that are awkward in file names.
    pub fn filename_root(&self) -> String {
        let root: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
            .collect();
        let root = root.trim().replace(' ', "");

        if root.is_empty() {
            "Project".to_string()
        } else {
            root
        }
    }

    /// Whether the only thing this project builds is a static library.
    pub fn is_static_library_only(&self) -> bool {
        let mut kinds = self.formats.iter().filter_map(|f| f.target_kind());
        matches!(
            (kinds.next(), kinds.next()),
            (Some(TargetKind::StaticLibrary), None)
        )
    }

    /// Every file in every group, depth first.
    pub fn files(&self) -> Vec<&FileEntry> {
        self.groups.iter().flat_map(|g| g.files()).collect()
    }

    /// Header search paths applied to every target: project then exporter paths.
    pub fn header_search_paths(&self) -> Vec<String> {
        self.header_paths
            .iter()
            .chain(self.exporter.header_paths.iter())
            .cloned()
            .collect()
    }
}
