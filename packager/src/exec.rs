//! External tool invocation.
//!
//! Every external program the packager runs (`cargo`, `tar`, `7z`) goes
//! through the [`CommandExecutor`] seam so tests can substitute a stub.
//! [`ToolRunner`] layers the tool failure policy on top: a non-zero exit
//! either aborts the pipeline or is logged and tolerated.

use crate::error::{PackagerError, Result};
use crate::output::Progress;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::process::{Command, ExitStatus};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run, looked up on `PATH`.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory of the child process.
    pub current_dir: Utf8PathBuf,
}

impl Invocation {
    /// Describe a command run from `current_dir`.
    pub fn new<I, S>(program: &str, args: I, current_dir: &Utf8Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_owned(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: current_dir.to_owned(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, " (in {})", self.current_dir)
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Run the command to completion and return its exit status.
    ///
    /// The child's working directory is `invocation.current_dir`; the
    /// packager's own working directory is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ToolLaunch`] if the program cannot be
    /// spawned.
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

/// Executes commands on the host system, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .status()
            .map_err(|source| PackagerError::ToolLaunch {
                tool: invocation.program.clone(),
                source,
            })
    }
}

/// What to do when an external tool exits unsuccessfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToolFailurePolicy {
    /// Stop the current configuration and the whole run.
    #[default]
    Abort,
    /// Log a warning and carry on with the next stage.
    Warn,
}

/// Runs external tools and applies the failure policy.
pub struct ToolRunner<'a> {
    executor: &'a dyn CommandExecutor,
    policy: ToolFailurePolicy,
}

impl<'a> ToolRunner<'a> {
    /// Create a runner over `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, policy: ToolFailurePolicy) -> Self {
        Self { executor, policy }
    }

    /// Run `invocation`, announcing it under `description`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ToolLaunch`] if the tool cannot be started,
    /// or [`PackagerError::ToolFailed`] if it exits unsuccessfully under
    /// [`ToolFailurePolicy::Abort`].
    pub fn run(
        &self,
        description: &str,
        invocation: &Invocation,
        progress: &mut Progress<'_>,
    ) -> Result<()> {
        progress.heading(description);
        debug!("running {invocation}");

        let status = self.executor.run(invocation)?;
        if status.success() {
            return Ok(());
        }

        let err = PackagerError::ToolFailed {
            tool: invocation.program.clone(),
            exit: exit_label(status),
        };

        match self.policy {
            ToolFailurePolicy::Abort => Err(err),
            ToolFailurePolicy::Warn => {
                info!("{err}; continuing under the `warn` failure policy");
                progress.warn(format!("warning: {err}"));
                Ok(())
            }
        }
    }
}

/// Describe how a process terminated.
fn exit_label(status: ExitStatus) -> String {
    status
        .code()
        .map_or_else(|| "terminated by signal".to_owned(), |code| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::exit_status;
    use rstest::rstest;

    fn cargo_invocation() -> Invocation {
        Invocation::new(
            "cargo",
            ["build", "--release", "--target", "x86_64-unknown-linux-gnu"],
            Utf8Path::new("/repo"),
        )
    }

    #[test]
    fn invocation_display_includes_working_directory() {
        assert_eq!(
            cargo_invocation().to_string(),
            "cargo build --release --target x86_64-unknown-linux-gnu (in /repo)"
        );
    }

    #[test]
    fn successful_tool_passes_through() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|inv| inv.program == "cargo" && inv.current_dir == "/repo")
            .times(1)
            .returning(|_| Ok(exit_status(0)));

        let runner = ToolRunner::new(&executor, ToolFailurePolicy::Abort);
        let mut sink = Vec::new();
        let mut progress = Progress::new(&mut sink, false);
        runner
            .run("Cargo build", &cargo_invocation(), &mut progress)
            .expect("tool succeeds");

        let text = String::from_utf8(sink).expect("utf8");
        assert!(text.contains("--- Cargo build ---"));
    }

    #[test]
    fn abort_policy_surfaces_exit_code() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_| Ok(exit_status(101)));

        let runner = ToolRunner::new(&executor, ToolFailurePolicy::Abort);
        let mut sink = Vec::new();
        let mut progress = Progress::new(&mut sink, true);
        let err = runner
            .run("Cargo build", &cargo_invocation(), &mut progress)
            .expect_err("failure must abort");

        assert_eq!(err.to_string(), "external tool failed: cargo, exit=101");
    }

    #[test]
    fn warn_policy_tolerates_failure_and_reports_it() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_| Ok(exit_status(2)));

        let runner = ToolRunner::new(&executor, ToolFailurePolicy::Warn);
        let mut sink = Vec::new();
        let mut progress = Progress::new(&mut sink, true);
        runner
            .run("Compressing archive", &cargo_invocation(), &mut progress)
            .expect("failure is tolerated");

        let text = String::from_utf8(sink).expect("utf8");
        assert!(text.contains("external tool failed: cargo, exit=2"));
    }

    #[rstest]
    #[case::abort(ToolFailurePolicy::Abort)]
    #[case::warn(ToolFailurePolicy::Warn)]
    fn launch_failure_is_always_fatal(#[case] policy: ToolFailurePolicy) {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|inv| {
            Err(PackagerError::ToolLaunch {
                tool: inv.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        });

        let runner = ToolRunner::new(&executor, policy);
        let mut sink = Vec::new();
        let mut progress = Progress::new(&mut sink, true);
        let err = runner
            .run("Cargo build", &cargo_invocation(), &mut progress)
            .expect_err("launch failure is fatal");
        assert!(matches!(err, PackagerError::ToolLaunch { .. }));
    }

    #[test]
    fn system_executor_reports_missing_program() {
        let invocation = Invocation::new(
            "stool-packager-no-such-program",
            Vec::<String>::new(),
            Utf8Path::new("."),
        );
        let err = SystemCommandExecutor
            .run(&invocation)
            .expect_err("missing program cannot launch");
        assert!(matches!(err, PackagerError::ToolLaunch { tool, .. } if tool == "stool-packager-no-such-program"));
    }

    #[test]
    fn policy_deserialises_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ToolFailurePolicy,
        }
        let parsed: Wrapper = toml::from_str("policy = \"warn\"").expect("valid toml");
        assert_eq!(parsed.policy, ToolFailurePolicy::Warn);
    }
}
