//! Staging directory management.
//!
//! Each configuration gets its own staging directory under the staging
//! root. It is wiped and recreated before every build, then receives the
//! single binary that ends up in the archive.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs::{self, FileTimes};
use std::io;

/// Prepares per-configuration staging directories.
pub struct Stager {
    staging_root: Utf8PathBuf,
}

impl Stager {
    /// Create a stager rooted at `staging_root`.
    #[must_use]
    pub fn new(staging_root: Utf8PathBuf) -> Self {
        Self { staging_root }
    }

    /// Return the staging directory for `configuration`.
    #[must_use]
    pub fn staging_path(&self, configuration: &str) -> Utf8PathBuf {
        self.staging_root.join(configuration)
    }

    /// Remove any previous staging directory for `configuration` and create
    /// an empty one in its place.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingFailed`] if the old directory cannot
    /// be removed or the new one cannot be created.
    pub fn reset(&self, configuration: &str) -> Result<Utf8PathBuf> {
        let path = self.staging_path(configuration);
        let staging_failed = |e: io::Error| PackagerError::StagingFailed {
            path: path.clone(),
            reason: e.to_string(),
        };

        match fs::remove_dir_all(&path) {
            Ok(()) => debug!("removed stale staging directory {path}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(staging_failed(e)),
        }
        fs::create_dir_all(&path).map_err(staging_failed)?;

        Ok(path)
    }

    /// Copy `source` into `staging_dir`, keeping its file name, permissions
    /// and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CollectFailed`] if the source is missing or
    /// cannot be copied.
    pub fn collect(&self, staging_dir: &Utf8Path, source: &Utf8Path) -> Result<Utf8PathBuf> {
        let collect_failed = |e: io::Error| PackagerError::CollectFailed {
            source_path: source.to_owned(),
            reason: e.to_string(),
        };

        let file_name = source.file_name().ok_or_else(|| PackagerError::CollectFailed {
            source_path: source.to_owned(),
            reason: "path has no file name".to_owned(),
        })?;
        let dest = staging_dir.join(file_name);

        copy_with_metadata(source, &dest).map_err(collect_failed)?;

        Ok(dest)
    }
}

/// Copy the bytes of `source` to `dest`, then its timestamps and
/// permissions.
///
/// Permissions are applied last; the copy stays writable until then.
fn copy_with_metadata(source: &Utf8Path, dest: &Utf8Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut reader = fs::File::open(source)?;
    let mut writer = fs::File::create(dest)?;
    io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    drop(writer);

    fs::set_permissions(dest, metadata.permissions())
}
