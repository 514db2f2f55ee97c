//! User-facing error reports.
//!
//! An export failure is printed with its miette code, the file it concerns,
//! the target or configuration involved and one hint on how to fix it:
//!
//! ```text
//! error[vsforge::path_resolution]: cannot rebase `../../x.cpp`
//!   --> /proj/Forge.toml
//!    = target: VST3
//! help: Use a path inside the project folder or an absolute path
//! ```

use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Hints shared by several reports.
pub mod suggestions {
    pub const NO_MANIFEST: &str = "Create a Forge.toml or pass `--manifest <path>`";

    pub const BAD_CONFIGURATION: &str =
        "Give every `[[configuration]]` a distinct name and architecture";

    pub const WRITE_FAILED: &str = "Check that the target folder is writable";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(&self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, false) => "error",
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, false) => "warning",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
        }
    }
}

/// A rendered error or warning.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Diagnostic code, e.g. `vsforge::manifest`
    pub code: Option<String>,
    pub message: String,
    /// File the report is about
    pub location: Option<PathBuf>,
    /// `(label, value)` pairs such as `("target", "VST3")`
    pub notes: Vec<(String, String)>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    pub fn with_code(mut self, code: impl fmt::Display) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_note(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.notes.push((label.into(), value.into()));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render for a terminal; `color` adds ANSI styling to the labels.
    pub fn format(&self, color: bool) -> String {
        let mut out = String::from(self.severity.label(color));

        if let Some(code) = &self.code {
            let _ = write!(out, "[{}]", code);
        }
        let _ = writeln!(out, ": {}", self.message);

        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for (label, value) in &self.notes {
            let _ = writeln!(out, "   = {}: {}", label, value);
        }
        if let Some(help) = &self.help {
            let label = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            let _ = writeln!(out, "{}: {}", label, help);
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
