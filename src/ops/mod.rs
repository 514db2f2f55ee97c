//! High-level operations.
//!
//! This module contains the implementation of vsforge commands.

pub mod export;
pub mod inspect;

pub use export::{export, export_project, ExportOptions, ExportReport, ExportedFile};
pub use inspect::{format_targets, list_configurations, list_targets, TargetSummary};
