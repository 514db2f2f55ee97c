//! Command implementations

pub mod completions;
pub mod configs;
pub mod export;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::ManifestArg;
use vsforge::core::find_manifest;
use vsforge::exporter::ExporterVariant;
use vsforge::util::config::{global_config_path, load_config, project_config_path};
use vsforge::util::diagnostic::suggestions;
use vsforge::util::Config;

/// The explicit `--manifest`, or the nearest Forge.toml above the current directory.
pub fn locate_manifest(arg: &ManifestArg) -> Result<PathBuf> {
    if let Some(path) = &arg.manifest {
        return Ok(path.clone());
    }

    let cwd = std::env::current_dir().context("failed to get current directory")?;
    match find_manifest(&cwd) {
        Some(path) => Ok(path),
        None => bail!(
            "could not find {} in {} or any parent directory\nhelp: {}",
            vsforge::core::MANIFEST_NAME,
            cwd.display(),
            suggestions::NO_MANIFEST
        ),
    }
}

/// Global and project tool configuration for the project owning `manifest_path`.
pub fn config_for(manifest_path: &Path) -> Config {
    let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    load_config(global_config_path().as_deref(), &project_config_path(root))
}

/// Variant from the command line, falling back to the tool config.
pub fn resolve_variant(arg: Option<&str>, config: &Config) -> Result<Option<ExporterVariant>> {
    match arg {
        Some(name) => name
            .parse::<ExporterVariant>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}", e)),
        None => {
            if let Some(name) = &config.export.variant {
                if config.variant().is_none() {
                    tracing::warn!("ignoring unknown variant `{}` in config", name);
                }
            }
            Ok(config.variant())
        }
    }
}
