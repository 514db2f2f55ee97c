//! The resource pack: icon container and version resource script.
//!
//! Built once per export, before any document is written, and skipped
//! entirely when the only thing the project builds is a static library.

pub mod icon;
pub mod png;
pub mod provider;
pub mod rc;

use std::fs;

use crate::core::project::Project;
use crate::exporter::context::ICON_FILE_NAME;
use crate::exporter::error::ExportError;

pub use provider::{FileIconProvider, IconProvider, Image};

/// Icon sizes requested from the provider, smallest first.
pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 256];

/// Encoded resource files of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePack {
    /// Contents of the icon container, when any artwork was found
    pub icon: Option<Vec<u8>>,
    /// Contents of the resource script
    pub rc: String,
}

/// Build the resource pack of `project`.
///
/// An external `.ico` named in the manifest is used verbatim; otherwise the
/// icon is synthesized from whatever `provider` offers for [`ICON_SIZES`].
/// Returns `None` for static-library-only projects.
pub fn build(project: &Project, provider: &dyn IconProvider) -> Result<Option<ResourcePack>, ExportError> {
    if project.is_static_library_only() {
        tracing::debug!("static library only, skipping resources");
        return Ok(None);
    }

    let icon = match &project.icon.ico {
        Some(ico) => {
            let path = project.root.join(ico);
            let bytes = fs::read(&path).map_err(|e| {
                ExportError::configuration(format!(
                    "cannot read icon `{}`: {}",
                    path.display(),
                    e
                ))
            })?;
            Some(bytes)
        }
        None => {
            let frames: Vec<Image> = ICON_SIZES
                .iter()
                .filter_map(|&size| provider.best_icon_for_size(size))
                .collect();

            tracing::debug!("{} icon frame(s) available", frames.len());

            if frames.is_empty() {
                None
            } else {
                Some(icon::encode_icon(&frames).map_err(|e| {
                    ExportError::configuration(format!("cannot encode icon: {}", e))
                })?)
            }
        }
    };

    let rc = rc::rc_script(project, icon.as_ref().map(|_| ICON_FILE_NAME));

    Ok(Some(ResourcePack { icon, rc }))
}

/// Icon provider reading the project's `[icon] images`.
pub fn project_icon_provider(project: &Project) -> FileIconProvider {
    let paths: Vec<_> = project
        .icon
        .images
        .iter()
        .map(|p| project.root.join(p))
        .collect();
    FileIconProvider::load(&paths)
}
