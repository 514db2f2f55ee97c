//! Build configurations.
//!
//! A [`BuildConfiguration`] is one named build variant (Debug, Release, ...)
//! bound to one architecture. The pair is joined into the canonical
//! `"{name}|{arch}"` string that every generated document uses as its join
//! key, so it is produced by exactly one function: [`canonical_config_name`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::defines::Defines;

/// Target architecture of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Architecture {
    /// 32-bit x86
    #[serde(rename = "Win32", alias = "win32", alias = "x86")]
    Win32,
    /// 64-bit x86
    #[default]
    #[serde(rename = "x64", alias = "X64", alias = "x86_64")]
    X64,
}

impl Architecture {
    /// Visual Studio platform name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Win32 => "Win32",
            Architecture::X64 => "x64",
        }
    }

    pub fn is_64_bit(&self) -> bool {
        matches!(self, Architecture::X64)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the canonical `"{configuration}|{architecture}"` name.
pub fn canonical_config_name(name: &str, arch: Architecture) -> String {
    format!("{}|{}", name, arch.as_str())
}

/// Compiler optimisation level, ordered from none to full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimisationLevel {
    /// /Od
    Off,
    /// /O1
    MinSize,
    /// /O2
    MaxSpeed,
    /// /Ox
    Full,
}

impl OptimisationLevel {
    /// The `<Optimization>` token.
    pub fn msvc_token(&self) -> &'static str {
        match self {
            OptimisationLevel::Off => "Disabled",
            OptimisationLevel::MinSize => "MinSpace",
            OptimisationLevel::MaxSpeed => "MaxSpeed",
            OptimisationLevel::Full => "Full",
        }
    }
}

/// Compiler warning level, 2 (low) to 4 (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WarningLevel(u8);

impl WarningLevel {
    pub const LOW: WarningLevel = WarningLevel(2);
    pub const MEDIUM: WarningLevel = WarningLevel(3);
    pub const HIGH: WarningLevel = WarningLevel(4);

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The `<WarningLevel>` token, e.g. `Level4`.
    pub fn msvc_token(&self) -> String {
        format!("Level{}", self.0)
    }
}

impl Default for WarningLevel {
    fn default() -> Self {
        WarningLevel::HIGH
    }
}

impl TryFrom<u8> for WarningLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (2..=4).contains(&level) {
            Ok(WarningLevel(level))
        } else {
            Err(format!(
                "invalid warning level {}, valid values: 2, 3, 4",
                level
            ))
        }
    }
}

impl From<WarningLevel> for u8 {
    fn from(level: WarningLevel) -> u8 {
        level.0
    }
}

/// C runtime library linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeLinkage {
    /// /MT, /MTd
    Static,
    /// /MD, /MDd
    #[serde(alias = "dll")]
    Dynamic,
}

impl RuntimeLinkage {
    /// The `<RuntimeLibrary>` token for a debug or release build.
    pub fn msvc_token(&self, is_debug: bool) -> &'static str {
        match (self, is_debug) {
            (RuntimeLinkage::Static, false) => "MultiThreaded",
            (RuntimeLinkage::Static, true) => "MultiThreadedDebug",
            (RuntimeLinkage::Dynamic, false) => "MultiThreadedDLL",
            (RuntimeLinkage::Dynamic, true) => "MultiThreadedDebugDLL",
        }
    }
}

/// Format of the debug information produced by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebugInformationFormat {
    None,
    /// C7 compatible (/Z7)
    #[serde(alias = "z7")]
    OldStyle,
    /// Program database (/Zi)
    #[serde(alias = "zi")]
    ProgramDatabase,
    /// Program database for edit and continue (/ZI)
    EditAndContinue,
}

impl DebugInformationFormat {
    pub fn msvc_token(&self) -> &'static str {
        match self {
            DebugInformationFormat::None => "None",
            DebugInformationFormat::OldStyle => "OldStyle",
            DebugInformationFormat::ProgramDatabase => "ProgramDatabase",
            DebugInformationFormat::EditAndContinue => "EditAndContinue",
        }
    }
}

/// Character set used by the Windows API headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterSet {
    MultiByte,
    Unicode,
}

impl CharacterSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterSet::MultiByte => "MultiByte",
            CharacterSet::Unicode => "Unicode",
        }
    }
}

/// Folders plugin binaries are copied to when the copy step is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallLocations {
    pub vst: String,
    pub vst3: String,
    pub rtas: String,
    pub aax: String,
}

impl InstallLocations {
    /// The conventional system plugin folders for an architecture.
    pub fn defaults_for(arch: Architecture) -> Self {
        let program_files = if arch.is_64_bit() {
            "%ProgramW6432%"
        } else {
            "%programfiles(x86)%"
        };
        let common = if arch.is_64_bit() {
            "%CommonProgramW6432%"
        } else {
            "%CommonProgramFiles(x86)%"
        };

        InstallLocations {
            vst: format!("{}\\Steinberg\\Vstplugins", program_files),
            vst3: format!("{}\\VST3", common),
            rtas: format!("{}\\Digidesign\\DAE\\Plug-Ins", common),
            aax: format!("{}\\Avid\\Audio\\Plug-Ins", common),
        }
    }
}

/// One named build configuration.
///
/// Built once from the manifest and read-only for the rest of an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfiguration {
    pub name: String,
    pub is_debug: bool,
    pub architecture: Architecture,
    pub optimisation: OptimisationLevel,
    pub warning_level: WarningLevel,
    pub warnings_as_errors: bool,
    /// `None` lets the exporter pick based on the plugin formats in the graph.
    pub runtime: Option<RuntimeLinkage>,
    /// Intermediate directory template; empty means `$(Platform)\$(Configuration)`.
    pub intermediates_path: String,
    /// Binary output directory relative to the project; empty means the solution default.
    pub binary_path: String,
    /// Base name of the produced binary.
    pub target_name: String,
    pub library_paths: Vec<String>,
    pub header_paths: Vec<String>,
    pub defines: Defines,
    pub link_time_optimisation: bool,
    pub force_debug_symbols: bool,
    pub debug_information_format: DebugInformationFormat,
    pub fast_math: bool,
    pub incremental_linking: bool,
    pub generate_manifest: bool,
    pub character_set: Option<CharacterSet>,
    pub prebuild_command: String,
    pub postbuild_command: String,
    pub module_definition_file: String,
    pub plugin_copy_step: bool,
    pub install_locations: InstallLocations,
}

impl BuildConfiguration {
    /// Create a configuration with the defaults for its debug flag and architecture.
    pub fn new(
        name: impl Into<String>,
        is_debug: bool,
        architecture: Architecture,
        target_name: impl Into<String>,
    ) -> Self {
        BuildConfiguration {
            name: name.into(),
            is_debug,
            architecture,
            optimisation: if is_debug {
                OptimisationLevel::Off
            } else {
                OptimisationLevel::Full
            },
            warning_level: WarningLevel::default(),
            warnings_as_errors: false,
            runtime: None,
            intermediates_path: String::new(),
            binary_path: String::new(),
            target_name: target_name.into(),
            library_paths: Vec::new(),
            header_paths: Vec::new(),
            defines: Defines::new(),
            link_time_optimisation: !is_debug,
            force_debug_symbols: false,
            debug_information_format: DebugInformationFormat::ProgramDatabase,
            fast_math: false,
            incremental_linking: false,
            generate_manifest: true,
            character_set: None,
            prebuild_command: String::new(),
            postbuild_command: String::new(),
            module_definition_file: String::new(),
            plugin_copy_step: false,
            install_locations: InstallLocations::defaults_for(architecture),
        }
    }

    /// The standard `Debug` configuration.
    pub fn debug(target_name: impl Into<String>) -> Self {
        Self::new("Debug", true, Architecture::X64, target_name)
    }

    /// The standard `Release` configuration.
    pub fn release(target_name: impl Into<String>) -> Self {
        Self::new("Release", false, Architecture::X64, target_name)
    }

    /// The `"{name}|{arch}"` join key.
    pub fn canonical_name(&self) -> String {
        canonical_config_name(&self.name, self.architecture)
    }

    pub fn is_64_bit(&self) -> bool {
        self.architecture.is_64_bit()
    }

    /// Debug information is produced for debug builds or when forced.
    pub fn generates_debug_symbols(&self) -> bool {
        self.is_debug || self.force_debug_symbols
    }

    /// The binary file name for `suffix`.
    ///
    /// A target name that already carries an extension is kept as-is unless
    /// `force_suffix` is set, in which case its extension is replaced.
    pub fn output_filename(&self, suffix: &str, force_suffix: bool) -> String {
        let target = legal_file_name(self.target_name.trim());

        if force_suffix || !target.contains('.') {
            let stem = match target.rfind('.') {
                Some(dot) => &target[..dot],
                None => target.as_str(),
            };
            return format!("{}{}", stem, suffix);
        }

        target
    }
}

/// Strip characters Windows does not allow in file names.
fn legal_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '"' | '#' | '@' | ',' | ';' | ':' | '<' | '>' | '*' | '^' | '|' | '?' | '\\' | '/'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        let debug = BuildConfiguration::debug("Synth");
        assert_eq!(debug.canonical_name(), "Debug|x64");

        let mut release32 = BuildConfiguration::release("Synth");
        release32.architecture = Architecture::Win32;
        assert_eq!(release32.canonical_name(), "Release|Win32");
    }

    #[test]
    fn test_canonical_names_are_unique() {
        let names = ["Debug", "Release", "Debug|x64", "Release Win32"];
        let archs = [Architecture::Win32, Architecture::X64];

        let mut seen = std::collections::HashSet::new();
        for name in names {
            for arch in archs {
                assert!(seen.insert(canonical_config_name(name, arch)), "{name} {arch}");
            }
        }
    }

    #[test]
    fn test_defaults_follow_debug_flag() {
        let debug = BuildConfiguration::debug("App");
        assert_eq!(debug.optimisation, OptimisationLevel::Off);
        assert_eq!(debug.debug_information_format, DebugInformationFormat::ProgramDatabase);
        assert!(!debug.link_time_optimisation);

        let release = BuildConfiguration::release("App");
        assert_eq!(release.optimisation, OptimisationLevel::Full);
        assert!(!release.generates_debug_symbols());
    }

    #[test]
    fn test_optimisation_tokens_are_ordered() {
        assert!(OptimisationLevel::Off < OptimisationLevel::MinSize);
        assert!(OptimisationLevel::MaxSpeed < OptimisationLevel::Full);
        assert_eq!(OptimisationLevel::Off.msvc_token(), "Disabled");
        assert_eq!(OptimisationLevel::MinSize.msvc_token(), "MinSpace");
        assert_eq!(OptimisationLevel::MaxSpeed.msvc_token(), "MaxSpeed");
        assert_eq!(OptimisationLevel::Full.msvc_token(), "Full");
    }

    #[test]
    fn test_runtime_matrix() {
        assert_eq!(RuntimeLinkage::Static.msvc_token(false), "MultiThreaded");
        assert_eq!(RuntimeLinkage::Static.msvc_token(true), "MultiThreadedDebug");
        assert_eq!(RuntimeLinkage::Dynamic.msvc_token(false), "MultiThreadedDLL");
        assert_eq!(RuntimeLinkage::Dynamic.msvc_token(true), "MultiThreadedDebugDLL");
    }

    #[test]
    fn test_warning_level_bounds() {
        assert!(WarningLevel::try_from(1).is_err());
        assert!(WarningLevel::try_from(5).is_err());
        assert_eq!(WarningLevel::try_from(3).unwrap().msvc_token(), "Level3");
    }

    #[test]
    fn test_output_filename() {
        let mut config = BuildConfiguration::debug("My Synth");
        assert_eq!(config.output_filename("", false), "My Synth");
        assert_eq!(config.output_filename(".pdb", true), "My Synth.pdb");

        config.target_name = "engine.custom".to_string();
        assert_eq!(config.output_filename(".dll", false), "engine.custom");
        assert_eq!(config.output_filename(".dll", true), "engine.dll");

        config.target_name = "bad:name?".to_string();
        assert_eq!(config.output_filename(".exe", true), "badname.exe");
    }

    #[test]
    fn test_install_locations_follow_architecture() {
        let x64 = InstallLocations::defaults_for(Architecture::X64);
        assert_eq!(x64.vst3, "%CommonProgramW6432%\\VST3");
        assert_eq!(x64.vst, "%ProgramW6432%\\Steinberg\\Vstplugins");

        let x86 = InstallLocations::defaults_for(Architecture::Win32);
        assert_eq!(x86.aax, "%CommonProgramFiles(x86)%\\Avid\\Audio\\Plug-Ins");
    }
}
