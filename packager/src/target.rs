//! Target descriptors for cross-compiled release builds.
//!
//! A descriptor ties together everything that varies per target: the
//! platform label used in archive names, the compiler target triple, the
//! executable naming convention, and the archive format.

use std::fmt;

/// Operating system family of a build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Linux and other POSIX-like systems.
    Posix,
    /// Microsoft Windows.
    Windows,
}

/// Distribution archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// A zstd-compressed tarball (`.tar.zst`).
    TarZst,
    /// A zip file (`.zip`).
    Zip,
}

impl ArchiveKind {
    /// Return the file extension, without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

/// Describes how to build and package one target.
///
/// # Examples
///
/// ```
/// use stool_packager::target::{ArchiveKind, PlatformFamily, TargetDescriptor};
///
/// let win = TargetDescriptor::new("windows-x86_64", "x86_64-pc-windows-gnu", PlatformFamily::Windows);
/// assert_eq!(win.executable_name("stool"), "stool.exe");
/// assert_eq!(win.archive_kind(), ArchiveKind::Zip);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    platform: &'static str,
    triple: &'static str,
    family: PlatformFamily,
}

impl TargetDescriptor {
    /// Create a descriptor from its parts.
    #[must_use]
    pub const fn new(platform: &'static str, triple: &'static str, family: PlatformFamily) -> Self {
        Self {
            platform,
            triple,
            family,
        }
    }

    /// Platform label used in archive names, e.g. `linux-x86_64`.
    #[must_use]
    pub const fn platform(&self) -> &'static str {
        self.platform
    }

    /// Compiler target triple, e.g. `x86_64-unknown-linux-gnu`.
    #[must_use]
    pub const fn triple(&self) -> &'static str {
        self.triple
    }

    /// Archive format for this target's family.
    #[must_use]
    pub const fn archive_kind(&self) -> ArchiveKind {
        match self.family {
            PlatformFamily::Posix => ArchiveKind::TarZst,
            PlatformFamily::Windows => ArchiveKind::Zip,
        }
    }

    /// Executable file name the compiler produces for `bin_name`.
    #[must_use]
    pub fn executable_name(&self, bin_name: &str) -> String {
        match self.family {
            PlatformFamily::Posix => bin_name.to_owned(),
            PlatformFamily::Windows => format!("{bin_name}.exe"),
        }
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.platform, self.triple)
    }
}
