//! The Visual Studio exporter.
//!
//! This module turns a [`Project`](crate::core::Project) into MSBuild
//! documents:
//! - The target graph and per-run [`ExportContext`]
//! - One `.vcxproj` and one `.vcxproj.filters` per target
//! - One `.sln` for the whole graph
//!
//! Rendering is pure; writing the artifacts is left to [`crate::ops`].

pub mod context;
pub mod error;
pub mod filters;
pub mod graph;
pub mod paths;
pub mod profile;
pub mod project_file;
pub mod quirks;
pub mod routing;
pub mod solution;
pub mod xml;

use std::path::PathBuf;

use crate::core::target::Target;

pub use context::ExportContext;
pub use error::ExportError;
pub use graph::TargetGraph;
pub use profile::{ExporterVariant, ToolchainProfile};

/// One rendered file, ready to be flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Artifact {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Render the project and filters documents of `target`.
///
/// Both are built from the same routing pass so they always list the
/// same files.
pub fn render_target(ctx: &ExportContext<'_>, target: &Target) -> Result<[Artifact; 2], ExportError> {
    let files = routing::route_files(ctx, target)?;

    let project = project_file::project_document(ctx, target, &files)?;
    let filters = filters::filters_document(ctx, &files);

    Ok([
        Artifact::new(
            ctx.target_folder.join(ctx.project_file_name(target)),
            project.to_document(),
        ),
        Artifact::new(
            ctx.target_folder.join(ctx.filters_file_name(target)),
            filters.to_document(),
        ),
    ])
}

/// Render the solution document.
pub fn render_solution(ctx: &ExportContext<'_>) -> Artifact {
    Artifact::new(
        ctx.target_folder.join(ctx.solution_file_name()),
        solution::solution_document(ctx),
    )
}
