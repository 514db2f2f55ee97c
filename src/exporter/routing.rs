//! Decides which project files belong to which target.
//!
//! The project document and the filters document of a target must list
//! exactly the same files, so both are rendered from one [`RoutedFiles`].

use crate::core::project::{FileCategory, FileEntry, ProjectItem};
use crate::core::target::Target;
use crate::exporter::context::ExportContext;
use crate::exporter::error::ExportError;

/// How a routed file appears in a project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// `ClCompile`
    Compile { exclude_from_build: bool, std_call: bool },
    /// `ClInclude`
    Header,
    /// `None`
    Other,
}

/// A file listed in a target's documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedFile {
    /// Path relative to the target folder, Windows style
    pub include: String,
    /// Folder filter the file is shown under
    pub filter: String,
    pub role: FileRole,
}

/// Files of one target plus the folder filters that contain them.
#[derive(Debug, Clone, Default)]
pub struct RoutedFiles {
    pub files: Vec<RoutedFile>,
    /// Folder filter paths, children before their parents
    pub folders: Vec<String>,
}

impl RoutedFiles {
    pub fn compiled(&self) -> impl Iterator<Item = &RoutedFile> {
        self.files
            .iter()
            .filter(|f| matches!(f.role, FileRole::Compile { .. }))
    }

    pub fn headers(&self) -> impl Iterator<Item = &RoutedFile> {
        self.files.iter().filter(|f| f.role == FileRole::Header)
    }

    pub fn others(&self) -> impl Iterator<Item = &RoutedFile> {
        self.files.iter().filter(|f| f.role == FileRole::Other)
    }
}

/// Route every file of the project for `target`.
pub fn route_files(ctx: &ExportContext<'_>, target: &Target) -> Result<RoutedFiles, ExportError> {
    let claims_untagged = target.is_shared_code() || ctx.graph.shared_code().is_none();
    let mut router = Router {
        ctx,
        target,
        claims_untagged,
        routed: RoutedFiles::default(),
    };

    for group in &ctx.project.groups {
        if !group.is_empty() {
            router.walk(&group.items, &group.name)?;
        }
    }

    tracing::debug!(
        "{}: routed {} file(s) into {} folder(s)",
        target,
        router.routed.files.len(),
        router.routed.folders.len()
    );

    Ok(router.routed)
}

struct Router<'c, 'a> {
    ctx: &'c ExportContext<'a>,
    target: &'c Target,
    claims_untagged: bool,
    routed: RoutedFiles,
}

impl Router<'_, '_> {
    /// Route the items of the group at `path`; true if anything was routed.
    fn walk(&mut self, items: &[ProjectItem], path: &str) -> Result<bool, ExportError> {
        let mut added = false;

        for item in items {
            match item {
                ProjectItem::Group(group) => {
                    let child_path = format!("{}\\{}", path, group.name);
                    added |= self.walk(&group.items, &child_path)?;
                }
                ProjectItem::File(file) => {
                    if let Some(role) = self.role_of(file) {
                        let include = self
                            .ctx
                            .rebase_for(self.target, &file.path.to_string_lossy())?;
                        self.routed.files.push(RoutedFile {
                            include,
                            filter: path.to_string(),
                            role,
                        });
                        added = true;
                    }
                }
            }
        }

        // sibling groups may share a name; declare each folder once
        if added && !self.routed.folders.iter().any(|f| f == path) {
            self.routed.folders.push(path.to_string());
        }

        Ok(added)
    }

    fn role_of(&self, file: &FileEntry) -> Option<FileRole> {
        if file.resource {
            return None;
        }

        let owned = match file.format_tag() {
            None => self.claims_untagged,
            Some(format) => self.target.kind.format() == Some(format),
        };
        if !owned {
            return None;
        }

        match file.category() {
            FileCategory::Compilable => {
                if !file.compile && !self.claims_untagged {
                    return None;
                }
                Some(FileRole::Compile {
                    exclude_from_build: !file.compile,
                    std_call: file.uses_std_call(),
                })
            }
            FileCategory::Header => Some(FileRole::Header),
            FileCategory::Other => Some(FileRole::Other),
            FileCategory::Excluded => None,
        }
    }
}
