//! Packager configuration.
//!
//! Settings are layered: built-in defaults, then an optional
//! `packager.toml` in the project root, then command-line flags. The result
//! is resolved once into an immutable [`PackagerConfig`] that every stage
//! receives by reference.

use crate::archive::packaging::ArchiverBackend;
use crate::error::{PackagerError, Result};
use crate::exec::ToolFailurePolicy;
use crate::registry::HostFamily;
use crate::version::{VERSION_FILE_NAME, Version};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;

/// Name of the optional settings file inside the project root.
pub const SETTINGS_FILE_NAME: &str = "packager.toml";

/// Application name used in archive names when none is configured.
pub const DEFAULT_APP_NAME: &str = "stool";

/// Distribution directory name under the project root.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Staging root directory name under the project root.
pub const DEFAULT_STAGING_DIR: &str = "staging";

/// Partial packager settings, as read from `packager.toml` or the CLI.
///
/// Every field is optional; unset fields fall through to the next layer.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Application name used in archive names.
    pub app_name: Option<String>,
    /// Binary name produced by cargo, without any executable suffix.
    pub bin_name: Option<String>,
    /// Distribution output directory.
    pub dist_dir: Option<Utf8PathBuf>,
    /// Root under which per-configuration staging directories live.
    pub staging_dir: Option<Utf8PathBuf>,
    /// Version metadata file.
    pub version_file: Option<Utf8PathBuf>,
    /// Archive backend.
    pub archiver: Option<ArchiverBackend>,
    /// What to do when an external tool fails.
    pub on_tool_failure: Option<ToolFailurePolicy>,
}

impl Settings {
    /// Parse settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed or contains
    /// unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use stool_packager::config::Settings;
    ///
    /// let settings = Settings::parse("app_name = \"stool-pro\"").expect("valid settings");
    /// assert_eq!(settings.app_name.as_deref(), Some("stool-pro"));
    /// assert!(settings.bin_name.is_none());
    /// ```
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields empty settings unless `required` is set.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ConfigFile`] if the file cannot be read or
    /// parsed, or is required but absent.
    pub fn load(path: &Utf8Path, required: bool) -> Result<Self> {
        let config_error = |reason: String| PackagerError::ConfigFile {
            path: path.to_owned(),
            reason,
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!("no settings file at {path}; using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(config_error(e.to_string())),
        };

        Self::parse(&contents).map_err(|e| config_error(e.to_string()))
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            app_name: overrides.app_name.or(self.app_name),
            bin_name: overrides.bin_name.or(self.bin_name),
            dist_dir: overrides.dist_dir.or(self.dist_dir),
            staging_dir: overrides.staging_dir.or(self.staging_dir),
            version_file: overrides.version_file.or(self.version_file),
            archiver: overrides.archiver.or(self.archiver),
            on_tool_failure: overrides.on_tool_failure.or(self.on_tool_failure),
        }
    }
}

/// Fully resolved, immutable packager configuration.
#[derive(Clone, Debug)]
pub struct PackagerConfig {
    /// Project root; cargo runs here and its `target/` tree lives here.
    pub root: Utf8PathBuf,
    /// Distribution output directory.
    pub dist_dir: Utf8PathBuf,
    /// Root of the per-configuration staging directories.
    pub staging_root: Utf8PathBuf,
    /// Application name used in archive names.
    pub app_name: String,
    /// Binary name produced by cargo.
    pub bin_name: String,
    /// The release version, loaded once.
    pub version: Version,
    /// Archive backend.
    pub archiver: ArchiverBackend,
    /// What to do when an external tool fails.
    pub tool_failure: ToolFailurePolicy,
    /// Host the packager runs on.
    pub host: HostFamily,
}

impl PackagerConfig {
    /// Resolve `settings` against the absolute project `root` and load the
    /// version file.
    ///
    /// Relative paths in `settings` are taken relative to `root`. The binary
    /// name defaults to the application name.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::VersionFile`] if the version cannot be
    /// loaded.
    pub fn resolve(root: &Utf8Path, settings: Settings, host: HostFamily) -> Result<Self> {
        let under_root = |path: Option<Utf8PathBuf>, default: &str| match path {
            Some(path) => root.join(path),
            None => root.join(default),
        };

        let version_file = under_root(settings.version_file, VERSION_FILE_NAME);
        let version = Version::load(&version_file)?;
        let app_name = settings
            .app_name
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned());
        let bin_name = settings.bin_name.unwrap_or_else(|| app_name.clone());

        Ok(Self {
            root: root.to_owned(),
            dist_dir: under_root(settings.dist_dir, DEFAULT_DIST_DIR),
            staging_root: under_root(settings.staging_dir, DEFAULT_STAGING_DIR),
            app_name,
            bin_name,
            version,
            archiver: settings.archiver.unwrap_or_default(),
            tool_failure: settings.on_tool_failure.unwrap_or_default(),
            host,
        })
    }
}

/// Turn an optional user-supplied root into an absolute UTF-8 path,
/// defaulting to the current directory.
///
/// External archivers run inside the staging directory, so every path
/// handed to them must be absolute.
///
/// # Errors
///
/// Returns [`PackagerError::InvalidPath`] if the path cannot be made
/// absolute or is not valid UTF-8.
pub fn absolute_root(root: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let invalid = |reason: String| PackagerError::InvalidPath { reason };
    let relative = root.unwrap_or(Utf8Path::new("."));
    let absolute = std::path::absolute(relative)
        .map_err(|e| invalid(format!("cannot resolve {relative}: {e}")))?;
    Utf8PathBuf::try_from(absolute)
        .map_err(|e| invalid(format!("project root is not valid UTF-8: {e}")))
}
