//! Configuration file support for vsforge.
//!
//! vsforge reads tool defaults from two locations:
//! - Global: `~/.vsforge/config.toml` - User-wide defaults
//! - Project: `.vsforge/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config; command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::exporter::profile::ExporterVariant;

/// vsforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export settings
    pub export: ExportConfig,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default exporter variant (vs2013, vs2015, vs2017)
    pub variant: Option<String>,

    /// Default target folder, relative to the project root
    pub target_folder: Option<String>,

    /// Render every document but never touch the disk
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.export.variant.is_some() {
            self.export.variant = other.export.variant;
        }
        if other.export.target_folder.is_some() {
            self.export.target_folder = other.export.target_folder;
        }
        if other.export.dry_run {
            self.export.dry_run = true;
        }
    }

    /// Parse the exporter variant from the config string.
    pub fn variant(&self) -> Option<ExporterVariant> {
        self.export.variant.as_ref().and_then(|s| s.parse().ok())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.vsforge/config.toml)
/// 2. Global config (~/.vsforge/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global vsforge config directory (~/.vsforge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".vsforge"))
}

/// Get the global config path (~/.vsforge/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.vsforge/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".vsforge").join("config.toml")
}
