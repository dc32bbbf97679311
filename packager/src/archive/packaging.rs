//! Archive creation for staged release binaries.
//!
//! Compresses the contents of a staging directory into the distribution
//! directory, then writes the checksum side-file. Two backends produce the
//! same formats: `external` shells out to `tar` / `7z` with the staging
//! directory as the child's working directory, `native` writes the archive
//! in-process with the `tar`, `zstd` and `zip` crates.

use super::checksum::{Sha256Digest, write_checksum_file};
use super::naming::ArchiveName;
use crate::error::{PackagerError, Result};
use crate::exec::{Invocation, ToolRunner};
use crate::output::Progress;
use crate::target::ArchiveKind;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::io;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// zstd level passed to the encoder; 0 selects the library default.
const ZSTD_LEVEL: i32 = 0;

/// Deflate level for zip archives, the maximum the format supports.
const ZIP_LEVEL: i64 = 9;

/// How archives are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverBackend {
    /// Run `tar` for tarballs and `7z` for zip files.
    #[default]
    External,
    /// Write archives in-process.
    Native,
}

/// Files produced by [`Archiver::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutput {
    /// Path to the archive in the distribution directory.
    pub archive_path: Utf8PathBuf,
    /// Path to the `.sha256.txt` side-file.
    pub checksum_path: Utf8PathBuf,
    /// Digest written to the side-file.
    pub digest: Sha256Digest,
}

/// Writes archives and checksums into the distribution directory.
pub struct Archiver<'a> {
    dist_dir: &'a Utf8Path,
    backend: ArchiverBackend,
    tools: &'a ToolRunner<'a>,
}

impl<'a> Archiver<'a> {
    /// Create an archiver writing into `dist_dir`.
    #[must_use]
    pub fn new(dist_dir: &'a Utf8Path, backend: ArchiverBackend, tools: &'a ToolRunner<'a>) -> Self {
        Self {
            dist_dir,
            backend,
            tools,
        }
    }

    /// Destination path for `name`.
    #[must_use]
    pub fn archive_path(&self, name: &ArchiveName) -> Utf8PathBuf {
        self.dist_dir.join(name.filename())
    }

    /// Archive everything in `staging_dir` as `name` and write its checksum.
    ///
    /// Any existing archive at the destination is removed first, so the
    /// result never contains entries from an earlier run.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ArchiveFailed`] if the archive cannot be
    /// written or was not produced, a tool error from the external backend,
    /// or [`PackagerError::Io`] for directory and checksum I/O failures.
    pub fn create(
        &self,
        name: &ArchiveName,
        staging_dir: &Utf8Path,
        progress: &mut Progress<'_>,
    ) -> Result<ArchiveOutput> {
        fs::create_dir_all(self.dist_dir)?;

        let archive_path = self.archive_path(name);
        remove_file_if_exists(&archive_path)?;
        info!("creating {archive_path} from {staging_dir}");

        match self.backend {
            ArchiverBackend::External => {
                let invocation = external_invocation(name.kind(), &archive_path, staging_dir);
                self.tools
                    .run("Compressing archive", &invocation, progress)?;
            }
            ArchiverBackend::Native => {
                progress.heading("Compressing archive");
                write_native(name.kind(), &archive_path, staging_dir)?;
            }
        }

        if !archive_path.is_file() {
            return Err(PackagerError::ArchiveFailed {
                path: archive_path,
                reason: "the archiver did not produce a file".to_owned(),
            });
        }

        let (checksum_path, digest) = write_checksum_file(&archive_path)?;
        debug!("{checksum_path}: {digest}");

        Ok(ArchiveOutput {
            archive_path,
            checksum_path,
            digest,
        })
    }
}

/// The external command that archives `staging_dir` into `archive_path`.
///
/// The archive path must be absolute because the tool runs inside the
/// staging directory.
#[must_use]
pub fn external_invocation(
    kind: ArchiveKind,
    archive_path: &Utf8Path,
    staging_dir: &Utf8Path,
) -> Invocation {
    match kind {
        ArchiveKind::TarZst => {
            Invocation::new("tar", ["acf", archive_path.as_str(), "."], staging_dir)
        }
        ArchiveKind::Zip => Invocation::new(
            "7z",
            ["a", "-mx9", archive_path.as_str(), "*"],
            staging_dir,
        ),
    }
}

fn remove_file_if_exists(path: &Utf8Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed previous archive {path}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_native(kind: ArchiveKind, archive_path: &Utf8Path, staging_dir: &Utf8Path) -> Result<()> {
    let result = match kind {
        ArchiveKind::TarZst => write_tar_zst(archive_path, staging_dir).map_err(|e| e.to_string()),
        ArchiveKind::Zip => write_zip(archive_path, staging_dir).map_err(|e| e.to_string()),
    };
    result.map_err(|reason| PackagerError::ArchiveFailed {
        path: archive_path.to_owned(),
        reason,
    })
}

/// A top-level entry of the staging directory.
struct StagedEntry {
    path: Utf8PathBuf,
    name: String,
    is_dir: bool,
}

/// List the entries of `dir`, sorted by name for reproducible archives.
fn staged_entries(dir: &Utf8Path) -> io::Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        entries.push(StagedEntry {
            path: entry.path().to_owned(),
            name: entry.file_name().to_owned(),
            is_dir: entry.file_type()?.is_dir(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Write a `.tar.zst` archive of the contents of `staging_dir`.
fn write_tar_zst(archive_path: &Utf8Path, staging_dir: &Utf8Path) -> io::Result<()> {
    let output_file = fs::File::create(archive_path)?;
    let encoder = zstd::Encoder::new(output_file, ZSTD_LEVEL)?;
    let mut archive = tar::Builder::new(encoder);

    for entry in staged_entries(staging_dir)? {
        if entry.is_dir {
            archive.append_dir_all(&entry.name, &entry.path)?;
        } else {
            archive.append_path_with_name(&entry.path, &entry.name)?;
        }
    }

    archive.into_inner()?.finish()?;
    Ok(())
}

/// Write a maximum-compression `.zip` archive of the contents of
/// `staging_dir`.
fn write_zip(archive_path: &Utf8Path, staging_dir: &Utf8Path) -> zip::result::ZipResult<()> {
    let output_file = fs::File::create(archive_path)?;
    let mut writer = zip::ZipWriter::new(output_file);
    append_zip_dir(&mut writer, staging_dir, "")?;
    writer.finish()?;
    Ok(())
}

fn append_zip_dir(
    writer: &mut zip::ZipWriter<fs::File>,
    dir: &Utf8Path,
    prefix: &str,
) -> zip::result::ZipResult<()> {
    for entry in staged_entries(dir)? {
        let name = format!("{prefix}{}", entry.name);
        let options = zip_options(&entry.path)?;
        if entry.is_dir {
            writer.add_directory(format!("{name}/"), options)?;
            append_zip_dir(writer, &entry.path, &format!("{name}/"))?;
        } else {
            writer.start_file(name, options)?;
            let mut source = fs::File::open(&entry.path)?;
            io::copy(&mut source, writer)?;
        }
    }
    Ok(())
}

fn zip_options(path: &Utf8Path) -> io::Result<SimpleFileOptions> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(ZIP_LEVEL));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(path)?.permissions().mode();
        Ok(options.unix_permissions(mode))
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(options)
    }
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
