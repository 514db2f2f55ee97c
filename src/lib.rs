//! vsforge - Visual Studio project generation for audio plug-in projects
//!
//! This crate turns a `Forge.toml` project description into MSBuild
//! project and filter documents, a solution and a Windows resource pack.

pub mod core;
pub mod exporter;
pub mod ops;
pub mod resources;
pub mod util;

pub use core::{manifest::Manifest, project::Project, target::Target};
pub use exporter::{ExportContext, ExportError, ExporterVariant, TargetGraph};
