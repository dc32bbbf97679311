//! Test support utilities for packager behavioural tests.
//!
//! Provides a throwaway project root with a `version.json`, plus helpers for
//! inspecting the distribution directory afterwards.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use camino::{Utf8Path, Utf8PathBuf};
use stool_packager::archive::packaging::ArchiverBackend;
use stool_packager::config::{PackagerConfig, Settings};
use stool_packager::exec::ToolFailurePolicy;
use stool_packager::registry::HostFamily;
use stool_packager::version::VERSION_FILE_NAME;
use tempfile::TempDir;

/// A temporary project root. The directory is removed on drop.
pub struct TempProject {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl TempProject {
    /// Create a project whose `version.json` declares `version`.
    pub fn with_version(version: &str) -> Self {
        let dir = TempDir::new().expect("temp dir creation succeeds");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp path");
        std::fs::write(
            root.join(VERSION_FILE_NAME),
            format!(r#"{{"FullVersion":"{version}"}}"#),
        )
        .expect("write version file");
        Self { _dir: dir, root }
    }

    /// The project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Resolve a configuration for this project on a non-Windows host.
    pub fn config(&self, archiver: ArchiverBackend, policy: ToolFailurePolicy) -> PackagerConfig {
        let settings = Settings {
            archiver: Some(archiver),
            on_tool_failure: Some(policy),
            ..Settings::default()
        };
        PackagerConfig::resolve(&self.root, settings, HostFamily::Other)
            .expect("config resolves")
    }
}

/// Sorted file names in `dir`, or an empty list if it does not exist.
pub fn file_names(dir: &Utf8Path) -> Vec<String> {
    let Ok(entries) = dir.read_dir_utf8() else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.expect("dir entry").file_name().to_owned())
        .collect();
    names.sort();
    names
}
