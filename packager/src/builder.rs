//! Cargo build orchestration for release targets.
//!
//! Builds the project in release mode for a single target triple. The
//! compiler owns its output tree (`<root>/target/<triple>/release`); this
//! module only knows where to look for the finished binary.

use crate::error::Result;
use crate::exec::{Invocation, ToolRunner};
use crate::output::Progress;
use crate::target::TargetDescriptor;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// Runs `cargo build --release` for one target at a time.
pub struct Builder<'a> {
    root: &'a Utf8Path,
    tools: &'a ToolRunner<'a>,
}

impl<'a> Builder<'a> {
    /// Create a builder for the project at `root`.
    #[must_use]
    pub fn new(root: &'a Utf8Path, tools: &'a ToolRunner<'a>) -> Self {
        Self { root, tools }
    }

    /// The cargo command that builds `target`.
    #[must_use]
    pub fn invocation(&self, target: &TargetDescriptor) -> Invocation {
        Invocation::new(
            "cargo",
            ["build", "--release", "--target", target.triple()],
            self.root,
        )
    }

    /// Build the project for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if cargo cannot be launched, or if it fails and the
    /// tool failure policy is `abort`.
    pub fn build(&self, target: &TargetDescriptor, progress: &mut Progress<'_>) -> Result<()> {
        info!("building {target}");
        progress.heading("BUILDING");
        self.tools
            .run("Cargo build", &self.invocation(target), progress)
    }
}

/// Path where cargo leaves the release binary for `triple`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use stool_packager::builder::release_binary_path;
///
/// let path = release_binary_path(Utf8Path::new("/repo"), "i686-unknown-linux-gnu", "stool");
/// assert_eq!(path, "/repo/target/i686-unknown-linux-gnu/release/stool");
/// ```
#[must_use]
pub fn release_binary_path(root: &Utf8Path, triple: &str, executable: &str) -> Utf8PathBuf {
    root.join("target")
        .join(triple)
        .join("release")
        .join(executable)
}
