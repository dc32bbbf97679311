//! Release version loading.
//!
//! The version used to name archives lives in a JSON metadata file at the
//! project root (normally `version.json`) under the `FullVersion` key. It is
//! read once at start-up and never changes afterwards.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::fmt;

/// Name of the version metadata file inside the project root.
pub const VERSION_FILE_NAME: &str = "version.json";

#[derive(Debug, Deserialize)]
struct VersionDocument {
    #[serde(rename = "FullVersion")]
    full_version: String,
}

/// The full version string of the release being packaged.
///
/// # Examples
///
/// ```
/// use stool_packager::version::Version;
///
/// let version = Version::parse(r#"{"FullVersion": "1.2.3"}"#).expect("valid document");
/// assert_eq!(version.as_str(), "1.2.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Load the version from a metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::VersionFile`] if the file cannot be read,
    /// is not valid JSON, or lacks a non-blank `FullVersion` string.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| PackagerError::VersionFile {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;

        Self::parse(&contents).map_err(|reason| PackagerError::VersionFile {
            path: path.to_owned(),
            reason,
        })
    }

    /// Parse a version metadata document.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the document is malformed or
    /// the `FullVersion` field is missing or blank.
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let document: VersionDocument =
            serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let version = document.full_version.trim();
        if version.is_empty() {
            return Err("FullVersion is blank".to_owned());
        }
        Ok(Self(version.to_owned()))
    }

    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
