//! Error types for the release packager.
//!
//! Each variant names the stage that failed and carries enough context to
//! tell the user which file or tool was involved.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging a release.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The version metadata file is missing, unreadable, or malformed.
    #[error("cannot load version from {path}: {reason}")]
    VersionFile {
        /// Path of the version metadata file.
        path: Utf8PathBuf,
        /// Description of what went wrong.
        reason: String,
    },

    /// The packager settings file could not be read or parsed.
    #[error("invalid packager settings at {path}: {reason}")]
    ConfigFile {
        /// Path of the settings file.
        path: Utf8PathBuf,
        /// Description of the parse or read error.
        reason: String,
    },

    /// A path required by the packager is not usable.
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// Description of the problem.
        reason: String,
    },

    /// An external tool could not be started at all.
    #[error("failed to launch {tool}")]
    ToolLaunch {
        /// Name of the program that could not be spawned.
        tool: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran but reported failure.
    #[error("external tool failed: {tool}, exit={exit}")]
    ToolFailed {
        /// Name of the program that failed.
        tool: String,
        /// Exit code, or a description of how the process terminated.
        exit: String,
    },

    /// The staging directory could not be reset.
    #[error("staging failed at {path}: {reason}")]
    StagingFailed {
        /// The staging directory.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The built binary could not be copied into the staging directory.
    #[error("cannot collect {source_path}: {reason}")]
    CollectFailed {
        /// Path the binary was expected at.
        source_path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The distribution archive could not be written.
    #[error("archive creation failed for {path}: {reason}")]
    ArchiveFailed {
        /// Destination path of the archive.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failed_names_tool_and_exit_code() {
        let err = PackagerError::ToolFailed {
            tool: "cargo".to_owned(),
            exit: "101".to_owned(),
        };
        assert_eq!(err.to_string(), "external tool failed: cargo, exit=101");
    }

    #[test]
    fn tool_launch_preserves_source() {
        let err = PackagerError::ToolLaunch {
            tool: "7z".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("7z"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn version_file_error_includes_path() {
        let err = PackagerError::VersionFile {
            path: Utf8PathBuf::from("/repo/version.json"),
            reason: "missing field `FullVersion`".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo/version.json"));
        assert!(msg.contains("FullVersion"));
    }

    #[test]
    fn collect_failed_includes_source_path() {
        let err = PackagerError::CollectFailed {
            source_path: Utf8PathBuf::from("target/x86_64-unknown-linux-gnu/release/stool"),
            reason: "not found".to_owned(),
        };
        assert!(err.to_string().contains("release/stool"));
    }
}
