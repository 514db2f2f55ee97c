//! `vsforge export` command

use anyhow::Result;

use crate::cli::ExportArgs;
use crate::commands::{config_for, locate_manifest, resolve_variant};
use vsforge::ops::export::{export, ExportOptions};
use vsforge::util::fs::WriteOutcome;

pub fn execute(args: ExportArgs) -> Result<()> {
    let manifest_path = locate_manifest(&args.manifest)?;
    let config = config_for(&manifest_path);

    // CLI > config > manifest
    let variant = resolve_variant(args.variant.as_deref(), &config)?;
    let target_folder = args
        .target_folder
        .or_else(|| config.export.target_folder.clone().map(Into::into));
    let dry_run = args.dry_run || config.export.dry_run;

    let opts = ExportOptions {
        manifest_path,
        variant,
        target_folder,
        dry_run,
    };

    let report = export(&opts)?;

    let mut written = 0;
    let mut unchanged = 0;
    for file in &report.files {
        let status = match file.outcome {
            Some(WriteOutcome::Written) => {
                written += 1;
                "Writing"
            }
            Some(WriteOutcome::Unchanged) => {
                unchanged += 1;
                "Unchanged"
            }
            None => "Would write",
        };
        eprintln!("{:>12} {}", status, file.path.display());
    }

    if dry_run {
        eprintln!(
            "{:>12} {} file(s) for {} (dry run)",
            "Finished",
            report.files.len(),
            report.variant
        );
    } else {
        eprintln!(
            "{:>12} {} export: {} written, {} unchanged -> {}",
            "Finished",
            report.variant,
            written,
            unchanged,
            report.target_folder.display()
        );
    }

    Ok(())
}
