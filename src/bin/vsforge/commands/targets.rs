//! `vsforge targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use crate::commands::{config_for, locate_manifest, resolve_variant};
use vsforge::core::Manifest;
use vsforge::ops::inspect::{format_targets, list_targets};

pub fn execute(args: TargetsArgs) -> Result<()> {
    let manifest_path = locate_manifest(&args.manifest)?;
    let config = config_for(&manifest_path);
    let project = Manifest::load(&manifest_path)?;

    let variant = resolve_variant(args.variant.as_deref(), &config)?
        .or(project.exporter.variant)
        .unwrap_or_default();

    let targets = list_targets(&project, variant)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        print!("{}", format_targets(&targets));
    }

    Ok(())
}
