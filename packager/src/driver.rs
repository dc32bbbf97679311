//! Runs the packaging pipeline for each requested configuration.
//!
//! Configuration names are processed strictly in the order given. Unknown
//! names are reported and skipped; any other failure stops the run.

use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::output::Progress;
use crate::pipeline::{
    PackageOutput, PipelineContext, archive_name_for, binary_source_for, package_configuration,
};
use crate::registry::Registry;
use log::info;

/// Outcome of a complete run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Outputs of every configuration that was packaged, in order.
    pub packaged: Vec<PackageOutput>,
    /// Requested names that matched no configuration, in order.
    pub skipped: Vec<String>,
}

/// Sequences pipeline runs over a list of configuration names.
pub struct Driver<'a> {
    registry: &'a Registry,
    context: PipelineContext<'a>,
}

impl<'a> Driver<'a> {
    /// Create a driver resolving names against `registry`.
    #[must_use]
    pub fn new(
        registry: &'a Registry,
        config: &'a PackagerConfig,
        executor: &'a dyn CommandExecutor,
    ) -> Self {
        Self {
            registry,
            context: PipelineContext { config, executor },
        }
    }

    /// Package every configuration in `names`.
    ///
    /// An empty list does nothing and succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first fatal pipeline error. Configurations after the
    /// failing one are not attempted.
    pub fn run<S: AsRef<str>>(&self, names: &[S], progress: &mut Progress<'_>) -> Result<RunReport> {
        let mut report = RunReport::default();

        for name in names.iter().map(AsRef::as_ref) {
            let Some(configuration) = self.registry.get(name) else {
                info!("skipping unknown configuration {name:?}");
                progress.warn(format!("Configuration '{name}' does not exist."));
                report.skipped.push(name.to_owned());
                continue;
            };

            let output = package_configuration(&self.context, configuration, progress)?;
            report.packaged.push(output);
        }

        Ok(report)
    }

    /// Describe what [`Driver::run`] would do, without touching the
    /// filesystem or running any tool.
    #[must_use]
    pub fn plan<S: AsRef<str>>(&self, names: &[S]) -> String {
        let config = self.context.config;
        let mut text = format!("Would package {} {}:", config.app_name, config.version);

        for name in names.iter().map(AsRef::as_ref) {
            let Some(configuration) = self.registry.get(name) else {
                text.push_str(&format!("\n  {name}: unknown configuration, skipped"));
                continue;
            };
            let target = configuration.target();
            text.push_str(&format!(
                "\n  {name}: cargo build --release --target {}\n    {} -> {}",
                target.triple(),
                binary_source_for(config, configuration),
                config
                    .dist_dir
                    .join(archive_name_for(config, configuration).filename()),
            ));
        }

        text
    }
}
