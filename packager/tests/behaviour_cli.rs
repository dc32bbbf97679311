//! End-to-end CLI behaviour tests for `stool-packager`.
//!
//! These scenarios invoke the packager binary and check listing, dry-run
//! output and error handling. None of them needs cargo, tar or 7z, because
//! no known configuration is ever built.

mod support;

use rstest::rstest;
use std::process::{Command, Output};
use support::{TempProject, file_names};

fn run_packager(project: &TempProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stool-packager"))
        .arg("--root")
        .arg(project.root().as_str())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run stool-packager")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn list_shows_every_configuration() {
    let project = TempProject::with_version("1.0.0");
    let output = run_packager(&project, &["--list"]);

    assert!(output.status.success());
    let stderr = stderr_of(&output);
    for name in ["linux64", "linux32", "win64", "win32"] {
        assert!(stderr.contains(name), "missing {name}: {stderr}");
    }
}

#[test]
fn no_configurations_is_a_successful_no_op() {
    let project = TempProject::with_version("1.0.0");
    let output = run_packager(&project, &[]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).contains("Packaged 0 archives"));
    assert!(file_names(&project.root().join("dist")).is_empty());
}

#[rstest]
#[case::one(&["bogus"])]
#[case::several(&["mac", "LINUX64", "win128"])]
fn unknown_configurations_are_reported_and_skipped(#[case] names: &[&str]) {
    let project = TempProject::with_version("1.0.0");
    let output = run_packager(&project, names);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stderr = stderr_of(&output);
    for name in names {
        assert!(stderr.contains(&format!("Configuration '{name}' does not exist.")));
    }
    assert!(!project.root().join("staging").exists());
}

#[test]
fn quiet_still_reports_unknown_configurations() {
    let project = TempProject::with_version("1.0.0");
    let output = run_packager(&project, &["-q", "bogus"]);

    assert!(output.status.success());
    assert_eq!(stderr_of(&output), "Configuration 'bogus' does not exist.\n");
}

#[test]
fn dry_run_names_archives_without_building() {
    let project = TempProject::with_version("3.1.4");
    let output = run_packager(&project, &["--dry-run", "linux64", "win32"]);

    assert!(output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("stool-3.1.4-linux-x86_64.tar.zst"));
    assert!(stderr.contains("stool-3.1.4-windows-i686.zip"));
    assert!(!project.root().join("dist").exists());
}

#[test]
fn missing_version_file_exits_with_error() {
    let project = TempProject::with_version("1.0.0");
    std::fs::remove_file(project.root().join("version.json")).expect("remove version file");

    let output = run_packager(&project, &["linux64"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("error: "));
}

#[test]
fn blank_version_exits_with_error() {
    let project = TempProject::with_version("  ");
    let output = run_packager(&project, &["linux64"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("version.json"));
}
