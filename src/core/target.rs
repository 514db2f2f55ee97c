//! Target definitions - what gets emitted.
//!
//! A [`Target`] is one build artifact the exporter writes a project document
//! for: the shared-code static library, an application, a library, or one
//! plugin-format wrapper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::hash::Fingerprint;

/// An output format a project declares in its manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// GUI application
    #[serde(alias = "gui-app")]
    App,
    /// Console application
    #[serde(alias = "console-app")]
    Console,
    /// Static library
    #[serde(alias = "lib", alias = "static")]
    StaticLibrary,
    /// Dynamic library
    #[serde(alias = "dll", alias = "dynamic")]
    DynamicLibrary,
    #[serde(alias = "vst2")]
    Vst,
    Vst3,
    Aax,
    Rtas,
    /// Standalone plugin host application
    Standalone,
    /// Audio Unit; not buildable with Visual Studio
    Au,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 10] = [
        OutputFormat::App,
        OutputFormat::Console,
        OutputFormat::StaticLibrary,
        OutputFormat::DynamicLibrary,
        OutputFormat::Vst,
        OutputFormat::Vst3,
        OutputFormat::Aax,
        OutputFormat::Rtas,
        OutputFormat::Standalone,
        OutputFormat::Au,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::App => "app",
            OutputFormat::Console => "console",
            OutputFormat::StaticLibrary => "static-library",
            OutputFormat::DynamicLibrary => "dynamic-library",
            OutputFormat::Vst => "vst",
            OutputFormat::Vst3 => "vst3",
            OutputFormat::Aax => "aax",
            OutputFormat::Rtas => "rtas",
            OutputFormat::Standalone => "standalone",
            OutputFormat::Au => "au",
        }
    }

    /// Formats that link the project's code from a shared static library.
    pub fn needs_shared_code(&self) -> bool {
        matches!(
            self,
            OutputFormat::Vst
                | OutputFormat::Vst3
                | OutputFormat::Aax
                | OutputFormat::Rtas
                | OutputFormat::Standalone
        )
    }

    /// The target kind this format produces, or `None` if the Visual Studio
    /// exporter cannot build it.
    pub fn target_kind(&self) -> Option<TargetKind> {
        match self {
            OutputFormat::App => Some(TargetKind::GuiApp),
            OutputFormat::Console => Some(TargetKind::ConsoleApp),
            OutputFormat::StaticLibrary => Some(TargetKind::StaticLibrary),
            OutputFormat::DynamicLibrary => Some(TargetKind::DynamicLibrary),
            OutputFormat::Vst => Some(TargetKind::Vst),
            OutputFormat::Vst3 => Some(TargetKind::Vst3),
            OutputFormat::Aax => Some(TargetKind::Aax),
            OutputFormat::Rtas => Some(TargetKind::Rtas),
            OutputFormat::Standalone => Some(TargetKind::Standalone),
            OutputFormat::Au => None,
        }
    }

    /// Stem suffix that tags a source file as belonging to this format.
    pub fn file_suffix(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Vst => Some("_VST2"),
            OutputFormat::Vst3 => Some("_VST3"),
            OutputFormat::Aax => Some("_AAX"),
            OutputFormat::Rtas => Some("_RTAS"),
            OutputFormat::Standalone => Some("_Standalone"),
            OutputFormat::Au => Some("_AU"),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .or(match lower.as_str() {
                "vst2" => Some(OutputFormat::Vst),
                "lib" => Some(OutputFormat::StaticLibrary),
                "dll" => Some(OutputFormat::DynamicLibrary),
                _ => None,
            })
            .ok_or_else(|| format!("unknown output format: {}", s))
    }
}

/// The kind of target being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Static library holding the code every plugin wrapper links against
    SharedCode,
    GuiApp,
    ConsoleApp,
    StaticLibrary,
    DynamicLibrary,
    Vst,
    Vst3,
    Aax,
    Rtas,
    Standalone,
}

impl TargetKind {
    /// Name shown in the solution and used in generated file names.
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetKind::SharedCode => "Shared Code",
            TargetKind::GuiApp => "App",
            TargetKind::ConsoleApp => "ConsoleApp",
            TargetKind::StaticLibrary => "Static Library",
            TargetKind::DynamicLibrary => "Dynamic Library",
            TargetKind::Vst => "VST",
            TargetKind::Vst3 => "VST3",
            TargetKind::Aax => "AAX",
            TargetKind::Rtas => "RTAS",
            TargetKind::Standalone => "Standalone Plugin",
        }
    }

    /// The declared format this kind was built from; `None` for shared code.
    pub fn format(&self) -> Option<OutputFormat> {
        match self {
            TargetKind::SharedCode => None,
            TargetKind::GuiApp => Some(OutputFormat::App),
            TargetKind::ConsoleApp => Some(OutputFormat::Console),
            TargetKind::StaticLibrary => Some(OutputFormat::StaticLibrary),
            TargetKind::DynamicLibrary => Some(OutputFormat::DynamicLibrary),
            TargetKind::Vst => Some(OutputFormat::Vst),
            TargetKind::Vst3 => Some(OutputFormat::Vst3),
            TargetKind::Aax => Some(OutputFormat::Aax),
            TargetKind::Rtas => Some(OutputFormat::Rtas),
            TargetKind::Standalone => Some(OutputFormat::Standalone),
        }
    }

    pub fn file_type(&self) -> TargetFileType {
        match self {
            TargetKind::GuiApp | TargetKind::ConsoleApp | TargetKind::Standalone => {
                TargetFileType::Executable
            }
            TargetKind::SharedCode | TargetKind::StaticLibrary => TargetFileType::StaticLibrary,
            TargetKind::DynamicLibrary => TargetFileType::SharedLibrary,
            TargetKind::Vst | TargetKind::Vst3 | TargetKind::Aax | TargetKind::Rtas => {
                TargetFileType::PluginBundle
            }
        }
    }

    /// Extension of the produced binary, including the dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            TargetKind::Vst3 => ".vst3",
            TargetKind::Aax => ".aaxdll",
            TargetKind::Rtas => ".dpm",
            other => other.file_type().suffix(),
        }
    }

    pub fn is_plugin_wrapper(&self) -> bool {
        matches!(
            self,
            TargetKind::Vst
                | TargetKind::Vst3
                | TargetKind::Aax
                | TargetKind::Rtas
                | TargetKind::Standalone
        )
    }

    /// Token used in `PLUGIN_BUILD_<TOKEN>` defines.
    pub fn build_flag_token(&self) -> Option<&'static str> {
        match self {
            TargetKind::Vst => Some("VST"),
            TargetKind::Vst3 => Some("VST3"),
            TargetKind::Aax => Some("AAX"),
            TargetKind::Rtas => Some("RTAS"),
            TargetKind::Standalone => Some("STANDALONE"),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What kind of binary the linker produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFileType {
    Executable,
    StaticLibrary,
    SharedLibrary,
    PluginBundle,
}

impl TargetFileType {
    pub fn suffix(&self) -> &'static str {
        match self {
            TargetFileType::Executable => ".exe",
            TargetFileType::StaticLibrary => ".lib",
            TargetFileType::SharedLibrary | TargetFileType::PluginBundle => ".dll",
        }
    }

    /// `<ConfigurationType>` value.
    pub fn configuration_type(&self) -> &'static str {
        match self {
            TargetFileType::Executable => "Application",
            TargetFileType::StaticLibrary => "StaticLibrary",
            TargetFileType::SharedLibrary | TargetFileType::PluginBundle => "DynamicLibrary",
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, TargetFileType::StaticLibrary | TargetFileType::SharedLibrary)
    }
}

/// One emitted build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub kind: TargetKind,
    /// Display name, e.g. `VST3`
    pub name: String,
    /// Stable `{XXXXXXXX-...}` identifier shared by the project and solution documents
    pub guid: String,
}

impl Target {
    /// Create a target for `kind`, deriving its GUID from the project identity.
    pub fn new(project_id: &str, kind: TargetKind) -> Self {
        let name = kind.display_name().to_string();
        let mut fp = Fingerprint::new();
        fp.update_str(project_id).update_str(&name);

        Target {
            kind,
            guid: fp.finish_guid(),
            name,
        }
    }

    pub fn file_type(&self) -> TargetFileType {
        self.kind.file_type()
    }

    pub fn suffix(&self) -> &'static str {
        self.kind.suffix()
    }

    /// Name with spaces removed, as used in file names.
    pub fn file_stem_part(&self) -> String {
        self.name.replace(' ', "")
    }

    pub fn is_shared_code(&self) -> bool {
        self.kind == TargetKind::SharedCode
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_is_stable_and_distinct() {
        let a = Target::new("synth", TargetKind::Vst3);
        let b = Target::new("synth", TargetKind::Vst3);
        let c = Target::new("synth", TargetKind::Aax);
        let d = Target::new("other", TargetKind::Vst3);

        assert_eq!(a.guid, b.guid);
        assert_ne!(a.guid, c.guid);
        assert_ne!(a.guid, d.guid);
        assert!(a.guid.starts_with('{') && a.guid.ends_with('}'));
        assert_eq!(a.guid, a.guid.to_uppercase());
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(TargetKind::SharedCode.suffix(), ".lib");
        assert_eq!(TargetKind::GuiApp.suffix(), ".exe");
        assert_eq!(TargetKind::Standalone.suffix(), ".exe");
        assert_eq!(TargetKind::DynamicLibrary.suffix(), ".dll");
        assert_eq!(TargetKind::Vst.suffix(), ".dll");
        assert_eq!(TargetKind::Vst3.suffix(), ".vst3");
        assert_eq!(TargetKind::Aax.suffix(), ".aaxdll");
        assert_eq!(TargetKind::Rtas.suffix(), ".dpm");
    }

    #[test]
    fn test_format_round_trip_through_kind() {
        for format in OutputFormat::ALL {
            match format.target_kind() {
                Some(kind) => assert_eq!(kind.format(), Some(format)),
                None => assert_eq!(format, OutputFormat::Au),
            }
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("VST3".parse::<OutputFormat>(), Ok(OutputFormat::Vst3));
        assert_eq!("vst2".parse::<OutputFormat>(), Ok(OutputFormat::Vst));
        assert_eq!(
            "static-library".parse::<OutputFormat>(),
            Ok(OutputFormat::StaticLibrary)
        );
        assert!("xcode".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_file_stem_part() {
        let target = Target::new("p", TargetKind::Standalone);
        assert_eq!(target.file_stem_part(), "StandalonePlugin");
    }
}
