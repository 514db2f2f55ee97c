//! CLI integration tests for vsforge.
//!
//! These tests drive the binary against small projects written into
//! temporary directories.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the vsforge binary command.
fn vsforge() -> Command {
    let mut cmd = Command::cargo_bin("vsforge").unwrap();
    // Keep the user's global config out of the tests.
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd.env_remove("VSFORGE_MANIFEST");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a plug-in project with one source folder.
fn write_plugin_project(root: &Path, formats: &str) {
    fs::create_dir_all(root.join("Source/DSP")).unwrap();
    fs::write(root.join("Source/Plugin.cpp"), "// plugin\n").unwrap();
    fs::write(root.join("Source/Plugin.h"), "// plugin\n").unwrap();
    fs::write(root.join("Source/DSP/Filter.cpp"), "// filter\n").unwrap();

    fs::write(
        root.join("Forge.toml"),
        format!(
            r#"
[project]
name = "Synth"
version = "1.2.0"
company = "Acme Audio"
formats = [{}]

[[group]]
name = "Source"
path = "Source"
"#,
            formats
        ),
    )
    .unwrap();
}

// ============================================================================
// vsforge export
// ============================================================================

#[test]
fn test_export_writes_solution_and_projects() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""vst3", "standalone""#);

    vsforge()
        .arg("export")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished vs2017 export: 8 written, 0 unchanged"));

    let out = tmp.path().join("Builds/VisualStudio2017");
    assert!(out.join("Synth.sln").exists());
    assert!(out.join("resources.rc").exists());
    for stem in ["Synth_SharedCode", "Synth_VST3", "Synth_StandalonePlugin"] {
        assert!(out.join(format!("{}.vcxproj", stem)).exists());
        assert!(out.join(format!("{}.vcxproj.filters", stem)).exists());
    }
}

#[test]
fn test_export_twice_reports_unchanged() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""vst", "aax""#);

    vsforge().arg("export").current_dir(tmp.path()).assert().success();

    let sln = tmp.path().join("Builds/VisualStudio2017/Synth.sln");
    let before = fs::metadata(&sln).unwrap().modified().unwrap();

    vsforge()
        .arg("export")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("0 written, 8 unchanged"));

    assert_eq!(fs::metadata(&sln).unwrap().modified().unwrap(), before);
}

#[test]
fn test_export_variant_and_target_folder_flags() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""app""#);

    vsforge()
        .args(["export", "--variant", "vs2013", "--target-folder", "Win"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let sln = fs::read_to_string(tmp.path().join("Win/Synth.sln")).unwrap();
    assert!(sln.contains("# Visual Studio 2013\r\n"));

    let vcxproj = fs::read_to_string(tmp.path().join("Win/Synth_App.vcxproj")).unwrap();
    assert!(vcxproj.contains("ToolsVersion=\"12.0\""));
}

#[test]
fn test_export_uses_project_config() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""app""#);
    fs::create_dir_all(tmp.path().join(".vsforge")).unwrap();
    fs::write(
        tmp.path().join(".vsforge/config.toml"),
        "[export]\nvariant = \"vs2015\"\ntarget_folder = \"FromConfig\"\n",
    )
    .unwrap();

    vsforge().arg("export").current_dir(tmp.path()).assert().success();
    assert!(tmp.path().join("FromConfig/Synth.sln").exists());

    // the command line wins over the config
    vsforge()
        .args(["export", "--target-folder", "FromFlag"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let sln = fs::read_to_string(tmp.path().join("FromFlag/Synth.sln")).unwrap();
    assert!(sln.contains("# Visual Studio 2015\r\n"));
}

#[test]
fn test_export_dry_run_writes_nothing() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""app""#);

    vsforge()
        .args(["export", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Would write"))
        .stderr(predicate::str::contains("(dry run)"));

    assert!(!tmp.path().join("Builds").exists());
}

#[test]
fn test_export_with_explicit_manifest() {
    let tmp = temp_dir();
    let project = tmp.path().join("synth");
    write_plugin_project(&project, r#""console""#);

    vsforge()
        .args(["export", "--manifest"])
        .arg(project.join("Forge.toml"))
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(project
        .join("Builds/VisualStudio2017/Synth_ConsoleApp.vcxproj")
        .exists());
}

#[test]
fn test_export_fails_without_manifest() {
    let tmp = temp_dir();

    vsforge()
        .arg("export")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find Forge.toml"));
}

#[test]
fn test_export_fails_without_exportable_formats() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""au""#);

    vsforge()
        .arg("export")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("none of the declared formats can be exported"));

    assert!(!tmp.path().join("Builds").exists());
}

#[test]
fn test_export_rejects_unknown_variant() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""app""#);

    vsforge()
        .args(["export", "--variant", "vs2005"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exporter variant"));
}

// ============================================================================
// vsforge targets
// ============================================================================

#[test]
fn test_targets_lists_graph() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""vst3", "aax""#);

    vsforge()
        .arg("targets")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared Code {"))
        .stdout(predicate::str::contains("Synth_AAX.vcxproj"))
        .stdout(predicate::str::contains("└── Shared Code"));
}

#[test]
fn test_targets_json() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""vst3", "standalone""#);

    let output = vsforge()
        .args(["targets", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let targets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let targets = targets.as_array().unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0]["kind"], "shared-code");
    for target in &targets[1..] {
        assert_eq!(target["depends_on"][0], "Shared Code");
    }
}

// ============================================================================
// vsforge configs
// ============================================================================

#[test]
fn test_configs_lists_canonical_names() {
    let tmp = temp_dir();
    write_plugin_project(tmp.path(), r#""app""#);
    let manifest = tmp.path().join("Forge.toml");
    let mut content = fs::read_to_string(&manifest).unwrap();
    content.push_str(
        r#"
[[configuration]]
name = "Debug"
architecture = "Win32"

[[configuration]]
name = "Release"
"#,
    );
    fs::write(&manifest, content).unwrap();

    vsforge()
        .arg("configs")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("Debug|Win32\nRelease|x64\n");
}

// ============================================================================
// vsforge completions
// ============================================================================

#[test]
fn test_completions_bash() {
    vsforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vsforge"));
}
