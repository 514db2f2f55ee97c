//! Path rebasing.
//!
//! Manifest paths are relative to the project root; generated documents
//! live in the target folder. Every path written into a document goes
//! through [`PathRebaser::rebase`], the only place that translation happens.

use std::path::{Path, PathBuf};

use crate::core::defines::Defines;
use crate::util::fs::{is_absolute_any, normalize_lexically, relative_path, windows_style};

/// Rebases project-relative paths onto the target folder.
#[derive(Debug, Clone)]
pub struct PathRebaser {
    project_root: PathBuf,
    target_folder: PathBuf,
}

impl PathRebaser {
    /// Both folders must be absolute.
    pub fn new(project_root: impl Into<PathBuf>, target_folder: impl Into<PathBuf>) -> Self {
        PathRebaser {
            project_root: project_root.into(),
            target_folder: target_folder.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn target_folder(&self) -> &Path {
        &self.target_folder
    }

    /// Express `path` relative to the target folder, in Windows style.
    ///
    /// Absolute paths and paths starting with a `$(...)` or `%...%` macro
    /// are returned unchanged. `None` means no relative form exists.
    pub fn rebase(&self, path: &str) -> Option<String> {
        let path = path.trim();

        if is_fixed(path) {
            return Some(windows_style(path));
        }

        let joined = normalize_lexically(&self.project_root.join(path.replace('\\', "/")))?;
        let relative = relative_path(&self.target_folder, &joined)?;
        let text = relative.to_string_lossy();

        if text.is_empty() {
            Some(".".to_string())
        } else {
            Some(windows_style(&text))
        }
    }

    /// [`PathRebaser::rebase`] with `.\` prepended to relative results.
    pub fn rebase_with_dot(&self, path: &str) -> Option<String> {
        self.rebase(path).map(|p| prepend_dot(&p))
    }

    /// Rebased, C-escaped and quoted, for use inside defines and scripts.
    pub fn rebase_quoted(&self, path: &str) -> Option<String> {
        self.rebase(path).map(|p| format!("\"{}\"", c_escape(&p)))
    }
}

/// Paths that must not be rebased.
fn is_fixed(path: &str) -> bool {
    is_absolute_any(path) || path.starts_with('$') || path.starts_with('%')
}

/// Prefix `.\` unless the path is absolute.
pub fn prepend_dot(path: &str) -> String {
    if is_absolute_any(path) {
        path.to_string()
    } else {
        format!(".\\{}", path)
    }
}

/// Join project-relative path fragments with `/`.
pub fn join(base: &str, child: &str) -> String {
    let base = base.trim_end_matches(['/', '\\']);
    if base.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", base, child)
    }
}

/// Place `file` under `$(OutDir)` unless it is already absolute or a macro.
pub fn out_dir_file(defines: &Defines, file: &str) -> String {
    prefixed_unless_fixed(&defines.replace_tokens(file), "$(OutDir)\\")
}

/// Place `file` under `$(IntDir)` unless it is already absolute or a macro.
pub fn int_dir_file(defines: &Defines, file: &str) -> String {
    prefixed_unless_fixed(&defines.replace_tokens(file), "$(IntDir)\\")
}

fn prefixed_unless_fixed(file: &str, prefix: &str) -> String {
    if is_absolute_any(file) || file.starts_with('$') {
        windows_style(file)
    } else {
        format!("{}{}", prefix, windows_style(file))
    }
}

/// Escape `text` for a C string literal.
///
/// Bytes outside printable ASCII are written as `\xHH`; a hex digit that
/// follows one is split off with `""` so it does not extend the escape.
pub fn c_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_hex_escape = false;

    for &byte in text.as_bytes() {
        let c = byte as char;
        let this_is_hex_escape = match c {
            '\\' => {
                out.push_str("\\\\");
                false
            }
            '"' => {
                out.push_str("\\\"");
                false
            }
            '\n' => {
                out.push_str("\\n");
                false
            }
            '\r' => {
                out.push_str("\\r");
                false
            }
            '\t' => {
                out.push_str("\\t");
                false
            }
            _ if (0x20..0x7f).contains(&byte) => {
                if last_was_hex_escape && c.is_ascii_hexdigit() {
                    out.push_str("\"\"");
                }
                out.push(c);
                false
            }
            _ => {
                out.push_str(&format!("\\x{:02x}", byte));
                true
            }
        };
        last_was_hex_escape = this_is_hex_escape;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebaser() -> PathRebaser {
        PathRebaser::new("/work/synth", "/work/synth/Builds/VisualStudio2017")
    }

    #[test]
    fn test_rebase_relative() {
        let r = rebaser();
        assert_eq!(r.rebase("Source/Main.cpp").unwrap(), "..\\..\\Source\\Main.cpp");
        assert_eq!(r.rebase("./Source/../Source/a.h").unwrap(), "..\\..\\Source\\a.h");
        assert_eq!(r.rebase("Source\\UI\\Editor.cpp").unwrap(), "..\\..\\Source\\UI\\Editor.cpp");
        assert_eq!(r.rebase("Builds/VisualStudio2017").unwrap(), ".");
        assert_eq!(r.rebase("Builds/VisualStudio2017/x64").unwrap(), "x64");
    }

    #[test]
    fn test_rebase_keeps_fixed_paths() {
        let r = rebaser();
        assert_eq!(r.rebase("C:/SDKs/VST3").unwrap(), "C:\\SDKs\\VST3");
        assert_eq!(r.rebase("$(ProgramFiles)/x").unwrap(), "$(ProgramFiles)\\x");
        assert_eq!(r.rebase("%CommonProgramW6432%\\VST3").unwrap(), "%CommonProgramW6432%\\VST3");
    }

    #[test]
    fn test_rebase_escaping_root_fails() {
        assert!(rebaser().rebase("../../../../../x.cpp").is_none());
    }

    #[test]
    fn test_rebase_with_dot_and_quoted() {
        let r = rebaser();
        assert_eq!(
            r.rebase_with_dot("modules/RTAS/Exports.def").unwrap(),
            ".\\..\\..\\modules\\RTAS\\Exports.def"
        );
        assert_eq!(
            r.rebase_quoted("SDKs/AAX/Libs").unwrap(),
            "\"..\\\\..\\\\SDKs\\\\AAX\\\\Libs\""
        );
        assert_eq!(prepend_dot("C:\\abs"), "C:\\abs");
    }

    #[test]
    fn test_out_and_int_dir_files() {
        let defines = Defines::new().with("NAME", "Synth");
        assert_eq!(out_dir_file(&defines, "${NAME}.dll"), "$(OutDir)\\Synth.dll");
        assert_eq!(int_dir_file(&defines, "Synth.pdb"), "$(IntDir)\\Synth.pdb");
        assert_eq!(out_dir_file(&defines, "C:/out/x.dll"), "C:\\out\\x.dll");
        assert_eq!(out_dir_file(&defines, "$(SolutionDir)x.dll"), "$(SolutionDir)x.dll");
    }

    #[test]
    fn test_c_escape() {
        assert_eq!(c_escape("a\\b\"c"), "a\\\\b\\\"c");
        assert_eq!(c_escape("line\r\n"), "line\\r\\n");
        assert_eq!(c_escape("caf\u{e9}"), "caf\\xc3\\xa9");
        assert_eq!(c_escape("\u{e9}a"), "\\xc3\\xa9\"\"a");
        assert_eq!(c_escape("\u{e9}z"), "\\xc3\\xa9z");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("SDKs/AAX/", "Libs"), "SDKs/AAX/Libs");
        assert_eq!(join("", "Libs"), "Libs");
    }
}
