//! Filesystem utilities.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

/// What happened when an artifact was flushed to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Existing file already had identical content and was left untouched.
    Unchanged,
    /// The file was created or replaced.
    Written,
}

impl WriteOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, WriteOutcome::Unchanged)
    }
}

/// Write `contents` to `path` unless the file already holds exactly those bytes.
///
/// The replacement goes through a temporary file in the destination directory
/// which is then renamed over the target, so readers never observe a
/// half-written file. An identical file keeps its modification time.
pub fn overwrite_if_different(path: &Path, contents: &[u8]) -> io::Result<WriteOutcome> {
    match fs::read(path) {
        Ok(existing) if existing == contents => return Ok(WriteOutcome::Unchanged),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(WriteOutcome::Written)
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Returns `None` when a `..` would climb above the root of an absolute path
/// or above the start of a relative one.
pub fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => return None,
            },
            other => out.push(other),
        }
    }

    Some(out.iter().collect())
}

/// Get the relative path from `base` to `path`.
///
/// Both paths are normalized lexically first; `None` means no relative form
/// exists (for example when `path` escapes above the filesystem root).
pub fn relative_path(base: &Path, path: &Path) -> Option<PathBuf> {
    let base = normalize_lexically(base)?;
    let path = normalize_lexically(path)?;
    pathdiff::diff_paths(&path, &base)
}

/// Convert a path to Visual Studio's backslash form.
pub fn windows_style(path: &str) -> String {
    path.replace('/', "\\")
}

/// True for `C:\...`, `\\server\...`, `/...` style paths regardless of host OS.
pub fn is_absolute_any(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}
