//! Export error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during an export run.
///
/// Every kind is fatal. A configuration error is raised before any file is
/// written; the others abort the run at the artifact that failed.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ExportError {
    /// The manifest asks for something the exporter cannot produce.
    #[error("{message}")]
    #[diagnostic(code(vsforge::configuration))]
    Configuration {
        message: String,
        /// Configuration involved, if any
        configuration: Option<String>,
    },

    /// A listed file cannot be expressed relative to the target folder.
    #[error("cannot rebase `{}` for target `{target}`: {reason}", .path.display())]
    #[diagnostic(code(vsforge::path_resolution))]
    PathResolution {
        target: String,
        path: PathBuf,
        reason: String,
    },

    /// A generated document could not be written.
    #[error("failed to write `{}`", .path.display())]
    #[diagnostic(code(vsforge::document_write))]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest could not be read or parsed.
    #[error("invalid manifest `{}`: {message}", .path.display())]
    #[diagnostic(code(vsforge::manifest))]
    Manifest { path: PathBuf, message: String },
}

impl ExportError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ExportError::Configuration {
            message: message.into(),
            configuration: None,
        }
    }

    pub fn for_configuration(message: impl Into<String>, configuration: impl Into<String>) -> Self {
        ExportError::Configuration {
            message: message.into(),
            configuration: Some(configuration.into()),
        }
    }

    pub fn path_resolution(
        target: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        ExportError::PathResolution {
            target: target.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn document_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::DocumentWrite {
            path: path.into(),
            source,
        }
    }

    /// Convert to a user-facing report.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = match self {
            ExportError::Configuration {
                message,
                configuration: Some(configuration),
            } => Diagnostic::error(message.clone())
                .with_note("configuration", configuration.clone())
                .with_help(suggestions::BAD_CONFIGURATION),

            ExportError::Configuration { message, .. } => Diagnostic::error(message.clone()),

            ExportError::PathResolution {
                target,
                path,
                reason,
            } => Diagnostic::error(format!("cannot rebase `{}`", path.display()))
                .with_note("target", target.clone())
                .with_note("reason", reason.clone())
                .with_help("Use a path inside the project folder or an absolute path"),

            ExportError::DocumentWrite { path, source } => {
                Diagnostic::error(format!("failed to write generated file: {}", source))
                    .with_location(path.clone())
                    .with_help(suggestions::WRITE_FAILED)
            }

            ExportError::Manifest { path, message } => {
                Diagnostic::error(message.clone()).with_location(path.clone())
            }
        };

        if let Some(code) = miette::Diagnostic::code(self) {
            diag = diag.with_code(code);
        }
        diag
    }
}
