//! `vsforge configs` command

use anyhow::Result;

use crate::cli::ConfigsArgs;
use crate::commands::locate_manifest;
use vsforge::core::Manifest;
use vsforge::ops::inspect::list_configurations;

pub fn execute(args: ConfigsArgs) -> Result<()> {
    let manifest_path = locate_manifest(&args.manifest)?;
    let project = Manifest::load(&manifest_path)?;

    for name in list_configurations(&project) {
        println!("{}", name);
    }

    Ok(())
}
