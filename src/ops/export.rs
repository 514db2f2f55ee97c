//! Implementation of `vsforge export`.
//!
//! An export renders every document in memory and flushes them in
//! dependency order: the resource pack, then each target's project and
//! filters documents, then the solution that references them all.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;
use crate::core::project::Project;
use crate::exporter::context::{ExportContext, ICON_FILE_NAME, RC_FILE_NAME};
use crate::exporter::error::ExportError;
use crate::exporter::profile::ExporterVariant;
use crate::exporter::{render_solution, render_target, Artifact};
use crate::resources;
use crate::util::fs::{overwrite_if_different, WriteOutcome};

/// Options for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Path to Forge.toml
    pub manifest_path: PathBuf,

    /// Exporter variant; falls back to the manifest, then the newest profile
    pub variant: Option<ExporterVariant>,

    /// Target folder; relative folders are taken from the project root
    pub target_folder: Option<PathBuf>,

    /// Render everything but leave the disk alone
    pub dry_run: bool,
}

/// One artifact of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    /// `None` on a dry run
    pub outcome: Option<WriteOutcome>,
}

/// Everything an export run produced.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub variant: ExporterVariant,
    pub target_folder: PathBuf,
    pub files: Vec<ExportedFile>,
}

impl ExportReport {
    /// Files whose content changed on disk.
    pub fn written(&self) -> impl Iterator<Item = &ExportedFile> {
        self.files
            .iter()
            .filter(|f| f.outcome == Some(WriteOutcome::Written))
    }

    /// Whether every artifact already matched what was on disk.
    pub fn is_unchanged(&self) -> bool {
        self.files
            .iter()
            .all(|f| f.outcome.is_some_and(|o| o.is_unchanged()))
    }
}

/// Load the manifest named in `opts` and export it.
pub fn export(opts: &ExportOptions) -> Result<ExportReport> {
    let project = Manifest::load(&opts.manifest_path)?;
    export_project(&project, opts)
        .with_context(|| format!("failed to export `{}`", project.name))
}

/// Export an already loaded project.
pub fn export_project(project: &Project, opts: &ExportOptions) -> Result<ExportReport, ExportError> {
    let variant = opts
        .variant
        .or(project.exporter.variant)
        .unwrap_or_default();

    let ctx = ExportContext::new(project, variant, opts.target_folder.as_deref())?;

    tracing::info!(
        "exporting `{}` for {} ({} target(s))",
        project.name,
        ctx.profile.display_name(),
        ctx.graph.len()
    );

    // Resource problems surface before anything is written.
    let pack = if ctx.wants_resources() {
        let provider = resources::project_icon_provider(project);
        resources::build(project, &provider)?
    } else {
        None
    };

    let ctx = match &pack {
        Some(pack) => ctx.with_resources(pack.icon.is_some(), true),
        None => ctx,
    };

    let mut flusher = Flusher {
        dry_run: opts.dry_run,
        files: Vec::new(),
    };

    if let Some(pack) = pack {
        if let Some(icon) = pack.icon {
            flusher.flush(Artifact::new(ctx.target_folder.join(ICON_FILE_NAME), icon))?;
        }
        flusher.flush(Artifact::new(ctx.target_folder.join(RC_FILE_NAME), pack.rc))?;
    }

    for target in ctx.graph.targets() {
        tracing::debug!("rendering target `{}` {}", target.name, target.guid);
        for artifact in render_target(&ctx, target)? {
            flusher.flush(artifact)?;
        }
    }

    flusher.flush(render_solution(&ctx))?;

    Ok(ExportReport {
        variant,
        target_folder: ctx.target_folder.clone(),
        files: flusher.files,
    })
}

struct Flusher {
    dry_run: bool,
    files: Vec<ExportedFile>,
}

impl Flusher {
    fn flush(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        let outcome = if self.dry_run {
            tracing::debug!("would write {}", artifact.path.display());
            None
        } else {
            let outcome = write_artifact(&artifact.path, &artifact.contents)?;
            tracing::debug!("{:?} {}", outcome, artifact.path.display());
            Some(outcome)
        };

        self.files.push(ExportedFile {
            path: artifact.path,
            outcome,
        });
        Ok(())
    }
}

fn write_artifact(path: &Path, contents: &[u8]) -> Result<WriteOutcome, ExportError> {
    overwrite_if_different(path, contents).map_err(|e| ExportError::document_write(path, e))
}
