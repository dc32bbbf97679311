//! Per-configuration packaging pipeline.
//!
//! Runs the four stages for one configuration in order: reset the staging
//! directory, build, collect the binary, archive and checksum. The first
//! fatal error stops the pipeline.

use crate::archive::naming::ArchiveName;
use crate::archive::packaging::{ArchiveOutput, Archiver};
use crate::builder::{Builder, release_binary_path};
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::{CommandExecutor, ToolRunner};
use crate::output::Progress;
use crate::registry::Configuration;
use crate::stager::Stager;
use camino::Utf8PathBuf;
use log::info;

/// Shared inputs for every pipeline run.
pub struct PipelineContext<'a> {
    /// Resolved configuration.
    pub config: &'a PackagerConfig,
    /// Executor for cargo and the archivers.
    pub executor: &'a dyn CommandExecutor,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    /// Name of the configuration that was packaged.
    pub configuration: String,
    /// Staging directory used for this run.
    pub staging_path: Utf8PathBuf,
    /// Path to the archive.
    pub archive_path: Utf8PathBuf,
    /// Path to the checksum side-file.
    pub checksum_path: Utf8PathBuf,
    /// SHA-256 digest of the archive, as lowercase hex.
    pub digest: String,
}

/// Archive name `configuration` will be packaged under.
#[must_use]
pub fn archive_name_for(config: &PackagerConfig, configuration: &Configuration) -> ArchiveName {
    let target = configuration.target();
    ArchiveName::new(
        &config.app_name,
        &config.version,
        target.platform(),
        target.archive_kind(),
    )
}

/// Where the binary for `configuration` is expected after the build.
#[must_use]
pub fn binary_source_for(config: &PackagerConfig, configuration: &Configuration) -> Utf8PathBuf {
    let target = configuration.target();
    release_binary_path(
        &config.root,
        target.triple(),
        &target.executable_name(&config.bin_name),
    )
}

/// Build and package a single configuration.
///
/// # Errors
///
/// Returns the first fatal error from any stage: staging, building (under
/// the `abort` policy), collecting the binary, or archiving.
pub fn package_configuration(
    context: &PipelineContext<'_>,
    configuration: &Configuration,
    progress: &mut Progress<'_>,
) -> Result<PackageOutput> {
    let config = context.config;
    let name = configuration.name();
    info!("packaging {name} for {}", configuration.target());

    let stager = Stager::new(config.staging_root.clone());
    let staging_path = stager.reset(name)?;

    let tools = ToolRunner::new(context.executor, config.tool_failure);
    Builder::new(&config.root, &tools).build(configuration.target(), progress)?;

    progress.heading("COPYING BIN");
    stager.collect(&staging_path, &binary_source_for(config, configuration))?;

    let archiver = Archiver::new(&config.dist_dir, config.archiver, &tools);
    let ArchiveOutput {
        archive_path,
        checksum_path,
        digest,
    } = archiver.create(
        &archive_name_for(config, configuration),
        &staging_path,
        progress,
    )?;
    progress.line(format!("Created {archive_path}"));

    Ok(PackageOutput {
        configuration: name.to_owned(),
        staging_path,
        archive_path,
        checksum_path,
        digest: digest.as_str().to_owned(),
    })
}
