//! stool packager CLI entrypoint.
//!
//! Builds the requested configurations and writes a checksummed archive for
//! each into the distribution directory, then prints a summary.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use stool_packager::cli::Cli;
use stool_packager::config::{PackagerConfig, SETTINGS_FILE_NAME, Settings, absolute_root};
use stool_packager::driver::Driver;
use stool_packager::error::Result;
use stool_packager::exec::SystemCommandExecutor;
use stool_packager::output::{
    Progress, configuration_list_text, summary_message, write_stderr_line,
};
use stool_packager::registry::{HostFamily, Registry};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let registry = Registry::standard(HostFamily::current());

    if cli.list {
        write_stderr_line(stderr, configuration_list_text(&registry));
        return Ok(());
    }

    let config = resolve_config(cli)?;
    let executor = SystemCommandExecutor;
    let driver = Driver::new(&registry, &config, &executor);

    // Dry-run mode: describe the run without side effects
    if cli.dry_run {
        write_stderr_line(stderr, driver.plan(&cli.configurations));
        return Ok(());
    }

    let report = {
        let mut progress = Progress::new(&mut *stderr, cli.quiet);
        driver.run(&cli.configurations, &mut progress)?
    };

    if !cli.quiet {
        write_stderr_line(stderr, summary_message(&report));
    }
    Ok(())
}

/// Layers defaults, the settings file and CLI flags into one configuration.
fn resolve_config(cli: &Cli) -> Result<PackagerConfig> {
    let root = absolute_root(cli.root.as_deref())?;
    let settings = Settings::load(&settings_path(cli, &root), cli.config.is_some())?;
    PackagerConfig::resolve(&root, settings.merge(cli.overrides()), HostFamily::current())
}

/// An explicit `--config` is taken relative to the project root and must
/// exist; otherwise `packager.toml` in the root is used when present.
fn settings_path(cli: &Cli, root: &Utf8Path) -> Utf8PathBuf {
    match &cli.config {
        Some(path) => root.join(path),
        None => root.join(SETTINGS_FILE_NAME),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stool_packager::error::PackagerError;
    use stool_packager::version::VERSION_FILE_NAME;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir creation succeeds");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp path");
        (dir, root)
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = PackagerError::ToolFailed {
            tool: "cargo".to_owned(),
            exit: "101".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(stderr_text, "error: external tool failed: cargo, exit=101\n");
    }

    #[test]
    fn list_prints_configurations_without_a_project() {
        let cli = Cli::parse_from(["stool-packager", "--list"]);
        let mut stderr = Vec::new();
        run(&cli, &mut stderr).expect("list succeeds");

        let text = String::from_utf8(stderr).expect("utf8");
        for name in ["linux64", "linux32", "win64", "win32"] {
            assert!(text.contains(name), "missing {name} in {text}");
        }
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join(VERSION_FILE_NAME), r#"{"FullVersion":"2.0.0"}"#)
            .expect("write version file");
        let cli = Cli::parse_from([
            "stool-packager",
            "--root",
            root.as_str(),
            "--dry-run",
            "linux64",
        ]);

        let mut stderr = Vec::new();
        run(&cli, &mut stderr).expect("dry run succeeds");

        let text = String::from_utf8(stderr).expect("utf8");
        assert!(text.contains("stool-2.0.0-linux-x86_64.tar.zst"));
        assert!(!root.join("dist").exists());
        assert!(!root.join("staging").exists());
    }

    #[test]
    fn missing_version_file_is_fatal() {
        let (_dir, root) = temp_root();
        let cli = Cli::parse_from(["stool-packager", "--root", root.as_str(), "linux64"]);

        let err = run(&cli, &mut Vec::new()).expect_err("version file is missing");
        assert!(matches!(err, PackagerError::VersionFile { .. }));
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join(VERSION_FILE_NAME), r#"{"FullVersion":"2.0.0"}"#)
            .expect("write version file");
        let cli = Cli::parse_from([
            "stool-packager",
            "--root",
            root.as_str(),
            "--config",
            "release.toml",
        ]);

        let err = resolve_config(&cli).expect_err("config file is missing");
        assert!(matches!(err, PackagerError::ConfigFile { .. }));
    }

    #[rstest]
    #[case::cli_wins(Some("from-cli"), "from-cli")]
    #[case::file_used(None, "from-file")]
    fn cli_flags_override_settings_file(#[case] flag: Option<&str>, #[case] expected: &str) {
        let (_dir, root) = temp_root();
        std::fs::write(root.join(VERSION_FILE_NAME), r#"{"FullVersion":"2.0.0"}"#)
            .expect("write version file");
        std::fs::write(root.join(SETTINGS_FILE_NAME), "app_name = \"from-file\"\n")
            .expect("write settings");

        let mut args = vec!["stool-packager", "--root", root.as_str()];
        if let Some(value) = flag {
            args.extend(["--app-name", value]);
        }
        let config = resolve_config(&Cli::parse_from(args)).expect("config resolves");
        assert_eq!(config.app_name, expected);
    }
}
