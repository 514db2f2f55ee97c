//! Toolchain profiles.
//!
//! The Visual Studio generations differ only in a handful of version
//! strings and defaults, so each one is a constant [`ToolchainProfile`]
//! record selected by an [`ExporterVariant`] tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which Visual Studio generation to emit for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterVariant {
    Vs2013,
    Vs2015,
    #[default]
    Vs2017,
}

impl ExporterVariant {
    pub const ALL: [ExporterVariant; 3] = [
        ExporterVariant::Vs2013,
        ExporterVariant::Vs2015,
        ExporterVariant::Vs2017,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExporterVariant::Vs2013 => "vs2013",
            ExporterVariant::Vs2015 => "vs2015",
            ExporterVariant::Vs2017 => "vs2017",
        }
    }

    pub fn profile(&self) -> &'static ToolchainProfile {
        match self {
            ExporterVariant::Vs2013 => &VS2013,
            ExporterVariant::Vs2015 => &VS2015,
            ExporterVariant::Vs2017 => &VS2017,
        }
    }
}

impl fmt::Display for ExporterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExporterVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vs2013" | "2013" => Ok(ExporterVariant::Vs2013),
            "vs2015" | "2015" => Ok(ExporterVariant::Vs2015),
            "vs2017" | "2017" => Ok(ExporterVariant::Vs2017),
            _ => Err(format!(
                "unknown exporter variant '{}', valid values: vs2013, vs2015, vs2017",
                s
            )),
        }
    }
}

/// Version strings and defaults for one Visual Studio generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainProfile {
    pub variant: ExporterVariant,
    /// Marketing year, e.g. 2017
    pub year: u16,
    /// Internal version number, e.g. 15
    pub version: u32,
    /// MSBuild `ToolsVersion`
    pub tools_version: &'static str,
    pub default_toolset: &'static str,
    pub default_windows_sdk: &'static str,
    /// Toolsets a project may select
    pub toolsets: &'static [&'static str],
}

pub static VS2013: ToolchainProfile = ToolchainProfile {
    variant: ExporterVariant::Vs2013,
    year: 2013,
    version: 12,
    tools_version: "12.0",
    default_toolset: "v120",
    default_windows_sdk: "8.1",
    toolsets: &["v120", "v120_xp", "Windows7.1SDK", "CTP_Nov2013"],
};

pub static VS2015: ToolchainProfile = ToolchainProfile {
    variant: ExporterVariant::Vs2015,
    year: 2015,
    version: 14,
    tools_version: "14.0",
    default_toolset: "v140",
    default_windows_sdk: "8.1",
    toolsets: &["v140", "v140_xp", "CTP_Nov2013"],
};

pub static VS2017: ToolchainProfile = ToolchainProfile {
    variant: ExporterVariant::Vs2017,
    year: 2017,
    version: 15,
    tools_version: "15.0",
    default_toolset: "v141",
    default_windows_sdk: "10.0.16299.0",
    toolsets: &["v140", "v140_xp", "v141", "v141_xp"],
};

impl ToolchainProfile {
    /// The solution file format version; shared by every generation.
    pub const SOLUTION_FORMAT_VERSION: &'static str = "11.00";

    /// Product name, e.g. `Visual Studio 2017`.
    pub fn display_name(&self) -> String {
        format!("Visual Studio {}", self.year)
    }

    /// Comment line written under the solution header.
    pub fn solution_comment(&self) -> String {
        format!("# Visual Studio {}", self.year)
    }

    /// Default output folder, relative to the project root.
    pub fn default_target_folder(&self) -> String {
        format!("Builds/VisualStudio{}", self.year)
    }

    pub fn offers_toolset(&self, toolset: &str) -> bool {
        self.toolsets.contains(&toolset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_table() {
        let p = ExporterVariant::Vs2013.profile();
        assert_eq!((p.version, p.tools_version, p.default_toolset), (12, "12.0", "v120"));
        assert_eq!(p.default_windows_sdk, "8.1");

        let p = ExporterVariant::Vs2015.profile();
        assert_eq!((p.version, p.tools_version, p.default_toolset), (14, "14.0", "v140"));
        assert!(!p.offers_toolset("v141"));

        let p = ExporterVariant::Vs2017.profile();
        assert_eq!((p.version, p.tools_version, p.default_toolset), (15, "15.0", "v141"));
        assert_eq!(p.default_windows_sdk, "10.0.16299.0");
        assert!(p.offers_toolset("v140_xp"));
        assert!(!p.offers_toolset("v120"));
    }

    #[test]
    fn test_default_toolset_is_offered() {
        for variant in ExporterVariant::ALL {
            let p = variant.profile();
            assert!(p.offers_toolset(p.default_toolset), "{}", variant);
            assert_eq!(p.variant, variant);
        }
    }

    #[test]
    fn test_solution_strings() {
        let p = ExporterVariant::Vs2015.profile();
        assert_eq!(p.solution_comment(), "# Visual Studio 2015");
        assert_eq!(p.default_target_folder(), "Builds/VisualStudio2015");
        assert_eq!(ToolchainProfile::SOLUTION_FORMAT_VERSION, "11.00");
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!("VS2013".parse::<ExporterVariant>(), Ok(ExporterVariant::Vs2013));
        assert_eq!("2017".parse::<ExporterVariant>(), Ok(ExporterVariant::Vs2017));
        assert!("vs2019".parse::<ExporterVariant>().is_err());
    }
}
