//! Core data structures for vsforge.
//!
//! This module contains the project model an export reads:
//! - Build configurations and preprocessor define sets
//! - Target kinds and descriptors
//! - The project, its file groups and the manifest that produces it

pub mod config;
pub mod defines;
pub mod manifest;
pub mod project;
pub mod target;

pub use config::{canonical_config_name, Architecture, BuildConfiguration};
pub use defines::Defines;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use project::{FileCategory, FileEntry, Project, ProjectGroup, ProjectItem};
pub use target::{OutputFormat, Target, TargetKind};
