//! Registry of named build configurations.
//!
//! Maps configuration names given on the command line (`linux64`, `win32`,
//! ...) to the target each one builds. Windows targets use the MSVC ABI
//! when packaging on a Windows host and the GNU ABI when cross-compiling
//! from anywhere else.

use crate::target::{PlatformFamily, TargetDescriptor};

/// Operating system family of the machine running the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFamily {
    /// A Windows host.
    Windows,
    /// Any non-Windows host.
    Other,
}

impl HostFamily {
    /// Detect the family of the current host.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// A named build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    name: &'static str,
    target: TargetDescriptor,
}

impl Configuration {
    /// The configuration name, e.g. `linux64`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The target this configuration builds.
    #[must_use]
    pub const fn target(&self) -> &TargetDescriptor {
        &self.target
    }
}

/// The fixed set of configurations the packager knows how to build.
///
/// # Examples
///
/// ```
/// use stool_packager::registry::{HostFamily, Registry};
///
/// let registry = Registry::standard(HostFamily::Other);
/// let win64 = registry.get("win64").expect("win64 is registered");
/// assert_eq!(win64.target().triple(), "x86_64-pc-windows-gnu");
/// assert!(registry.get("macos").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    configurations: Vec<Configuration>,
}

impl Registry {
    /// Build the standard registry for the given host.
    #[must_use]
    pub fn standard(host: HostFamily) -> Self {
        let (win64_triple, win32_triple) = match host {
            HostFamily::Windows => ("x86_64-pc-windows-msvc", "i686-pc-windows-msvc"),
            HostFamily::Other => ("x86_64-pc-windows-gnu", "i686-pc-windows-gnu"),
        };

        let configurations = vec![
            Configuration {
                name: "linux64",
                target: TargetDescriptor::new(
                    "linux-x86_64",
                    "x86_64-unknown-linux-gnu",
                    PlatformFamily::Posix,
                ),
            },
            Configuration {
                name: "linux32",
                target: TargetDescriptor::new(
                    "linux-i686",
                    "i686-unknown-linux-gnu",
                    PlatformFamily::Posix,
                ),
            },
            Configuration {
                name: "win64",
                target: TargetDescriptor::new(
                    "windows-x86_64",
                    win64_triple,
                    PlatformFamily::Windows,
                ),
            },
            Configuration {
                name: "win32",
                target: TargetDescriptor::new(
                    "windows-i686",
                    win32_triple,
                    PlatformFamily::Windows,
                ),
            },
        ];

        Self { configurations }
    }

    /// Look up a configuration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Iterate over all configurations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }
}
