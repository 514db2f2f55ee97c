//! The `resources.rc` version resource script.

use std::fmt::Write as _;

use crate::core::project::Project;
use crate::exporter::paths::c_escape;

const NEWLINE: &str = "\r\n";

/// Render the resource script; `icon` names the icon file when one exists.
pub fn rc_script(project: &Project, icon: Option<&str>) -> String {
    let version = project.version.trim();
    let mut out = String::new();

    let header = [
        "#ifdef VSFORGE_USER_DEFINED_RC_FILE",
        " #include VSFORGE_USER_DEFINED_RC_FILE",
        "#else",
        "",
        "#undef  WIN32_LEAN_AND_MEAN",
        "#define WIN32_LEAN_AND_MEAN",
        "#include <windows.h>",
        "",
        "VS_VERSION_INFO VERSIONINFO",
    ];
    for line in header {
        push_line(&mut out, line);
    }
    push_line(&mut out, &format!("FILEVERSION  {}", file_version(version)));

    for line in [
        "BEGIN",
        "  BLOCK \"StringFileInfo\"",
        "  BEGIN",
        "    BLOCK \"040904E4\"",
        "    BEGIN",
    ] {
        push_line(&mut out, line);
    }

    let values = [
        ("CompanyName", project.company.as_str()),
        ("LegalCopyright", project.copyright.as_str()),
        ("FileDescription", project.name.as_str()),
        ("FileVersion", version),
        ("ProductName", project.name.as_str()),
        ("ProductVersion", version),
    ];
    for (key, value) in values {
        if !value.is_empty() {
            push_line(
                &mut out,
                &format!("      VALUE \"{}\",  \"{}\\0\"", key, c_escape(value)),
            );
        }
    }

    for line in [
        "    END",
        "  END",
        "",
        "  BLOCK \"VarFileInfo\"",
        "  BEGIN",
        "    VALUE \"Translation\", 0x409, 1252",
        "  END",
        "END",
        "",
        "#endif",
    ] {
        push_line(&mut out, line);
    }

    if let Some(icon) = icon {
        let _ = write!(
            out,
            "{nl}IDI_ICON1 ICON DISCARDABLE \"{icon}\"{nl}IDI_ICON2 ICON DISCARDABLE \"{icon}\"",
            nl = NEWLINE,
            icon = icon
        );
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(NEWLINE);
}

/// `1.2.3` becomes `1,2,3,0`.
pub fn file_version(version: &str) -> String {
    let mut parts: Vec<&str> = version
        .split([',', '.'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    while parts.len() < 4 {
        parts.push("0");
    }

    parts.join(",")
}
