//! Shared test utilities for the packager crate.
//!
//! [`StubExecutor`] stands in for the real toolchain: it records every
//! invocation and can fabricate the files `cargo build`, `tar` and `7z`
//! would have written, so pipelines run end to end inside a temp directory.

use crate::exec::{CommandExecutor, Invocation};
use crate::error::Result;
use camino::Utf8PathBuf;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// A recording `CommandExecutor` that never spawns processes.
#[derive(Debug, Default)]
pub struct StubExecutor {
    calls: RefCell<Vec<Invocation>>,
    exit_codes: HashMap<String, i32>,
    binary: Option<(String, Vec<u8>)>,
    fabricate_archives: bool,
}

impl StubExecutor {
    /// Create a stub where every tool succeeds without side effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `cargo build --target <triple>` write `contents` to the
    /// release output path of `bin_name` under the invocation directory.
    #[must_use]
    pub fn with_binary(mut self, bin_name: &str, contents: &[u8]) -> Self {
        self.binary = Some((bin_name.to_owned(), contents.to_vec()));
        self
    }

    /// Make `tar` and `7z` write a placeholder archive at the path they
    /// were asked to create.
    #[must_use]
    pub fn with_archives(mut self) -> Self {
        self.fabricate_archives = true;
        self
    }

    /// Make every invocation of `program` exit with `code` and skip its
    /// side effects.
    #[must_use]
    pub fn failing(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_owned(), code);
        self
    }

    /// All invocations received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Programs invoked so far, in order.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.program.clone())
            .collect()
    }

    fn write_binary(&self, invocation: &Invocation) -> Result<()> {
        let Some((bin_name, contents)) = &self.binary else {
            return Ok(());
        };
        let Some(triple) = invocation
            .args
            .iter()
            .position(|arg| arg == "--target")
            .and_then(|index| invocation.args.get(index + 1))
        else {
            return Ok(());
        };

        let file_name = if triple.contains("windows") {
            format!("{bin_name}.exe")
        } else {
            bin_name.clone()
        };
        let release_dir = invocation
            .current_dir
            .join("target")
            .join(triple)
            .join("release");
        fs::create_dir_all(&release_dir)?;
        fs::write(release_dir.join(file_name), contents)?;
        Ok(())
    }

    fn write_archive(&self, invocation: &Invocation) -> Result<()> {
        if !self.fabricate_archives {
            return Ok(());
        }
        let Some(target) = invocation
            .args
            .iter()
            .find(|arg| arg.ends_with(".tar.zst") || arg.ends_with(".zip"))
        else {
            return Ok(());
        };
        let contents = format!("{} archive of {}", invocation.program, invocation.current_dir);
        fs::write(Utf8PathBuf::from(target), contents)?;
        Ok(())
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
        self.calls.borrow_mut().push(invocation.clone());

        if let Some(code) = self.exit_codes.get(&invocation.program) {
            return Ok(exit_status(*code));
        }

        match invocation.program.as_str() {
            "cargo" => self.write_binary(invocation)?,
            "tar" | "7z" => self.write_archive(invocation)?,
            _ => {}
        }
        Ok(exit_status(0))
    }
}
