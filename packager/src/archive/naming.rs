//! Distribution archive naming.
//!
//! Archives are named `<app>-<version>-<platform>.<ext>`, and each one has a
//! checksum side-file named `<archive>.sha256.txt`.

use crate::target::ArchiveKind;
use crate::version::Version;
use std::fmt;

/// Suffix appended to an archive file name to form its checksum file name.
pub const CHECKSUM_SUFFIX: &str = ".sha256.txt";

/// A fully-qualified distribution archive name.
///
/// # Examples
///
/// ```
/// use stool_packager::archive::naming::ArchiveName;
/// use stool_packager::target::ArchiveKind;
/// use stool_packager::version::Version;
///
/// let version = Version::parse(r#"{"FullVersion":"1.2.3"}"#).expect("valid");
/// let name = ArchiveName::new("stool", &version, "linux-x86_64", ArchiveKind::TarZst);
/// assert_eq!(name.filename(), "stool-1.2.3-linux-x86_64.tar.zst");
/// assert_eq!(name.checksum_filename(), "stool-1.2.3-linux-x86_64.tar.zst.sha256.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    stem: String,
    kind: ArchiveKind,
}

impl ArchiveName {
    /// Build an archive name from its components.
    #[must_use]
    pub fn new(app_name: &str, version: &Version, platform: &str, kind: ArchiveKind) -> Self {
        Self {
            stem: format!("{app_name}-{version}-{platform}"),
            kind,
        }
    }

    /// The archive format.
    #[must_use]
    pub const fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// The archive file name including extension.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("{}.{}", self.stem, self.kind.extension())
    }

    /// The checksum side-file name.
    #[must_use]
    pub fn checksum_filename(&self) -> String {
        format!("{}{CHECKSUM_SUFFIX}", self.filename())
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}
