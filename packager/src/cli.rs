//! CLI argument definitions for the release packager.
//!
//! Kept apart from the entrypoint so the binary stays focused on
//! orchestration and the parser can be tested directly.

use crate::archive::packaging::ArchiverBackend;
use crate::config::Settings;
use crate::exec::ToolFailurePolicy;
use camino::Utf8PathBuf;
use clap::Parser;

/// Build and package stool release archives.
#[derive(Parser, Debug)]
#[command(name = "stool-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build and package stool release archives.\n\n",
    "For each configuration named on the command line, the packager resets a ",
    "staging directory, runs `cargo build --release --target <triple>`, copies ",
    "the binary into staging, and compresses it into dist/ as a .tar.zst ",
    "(Linux) or .zip (Windows) with a .sha256.txt checksum beside it.\n\n",
    "Unknown configuration names are reported and skipped.",
))]
#[command(after_help = concat!(
    "CONFIGURATIONS:\n",
    "  linux64    linux-x86_64     x86_64-unknown-linux-gnu\n",
    "  linux32    linux-i686       i686-unknown-linux-gnu\n",
    "  win64      windows-x86_64   x86_64-pc-windows-msvc (Windows host) or -gnu\n",
    "  win32      windows-i686     i686-pc-windows-msvc (Windows host) or -gnu\n\n",
    "EXAMPLES:\n",
    "  Package both Linux targets:\n",
    "    $ stool-packager linux64 linux32\n\n",
    "  Cross-package Windows with in-process archiving:\n",
    "    $ stool-packager --archiver native win64 win32\n\n",
    "  Reproduce the historic tolerant behaviour:\n",
    "    $ stool-packager --on-tool-failure warn linux64",
))]
pub struct Cli {
    /// Configurations to build, in order.
    #[arg(value_name = "CONFIGURATION")]
    pub configurations: Vec<String>,

    /// Project root containing version.json and the cargo target tree
    /// [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub root: Option<Utf8PathBuf>,

    /// Packager settings file [default: <root>/packager.toml if present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Application name used in archive names [default: stool].
    #[arg(long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Binary name produced by cargo [default: the application name].
    #[arg(long, value_name = "NAME")]
    pub bin_name: Option<String>,

    /// Distribution output directory [default: <root>/dist].
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<Utf8PathBuf>,

    /// Staging root directory [default: <root>/staging].
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<Utf8PathBuf>,

    /// Version metadata file [default: <root>/version.json].
    #[arg(long, value_name = "FILE")]
    pub version_file: Option<Utf8PathBuf>,

    /// How archives are produced.
    #[arg(long, value_enum, value_name = "BACKEND")]
    pub archiver: Option<ArchiverBackend>,

    /// What to do when cargo, tar or 7z exits unsuccessfully.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_tool_failure: Option<ToolFailurePolicy>,

    /// List the available configurations and exit.
    #[arg(long)]
    pub list: bool,

    /// Show what would be built and exit without side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Settings given on the command line, to be layered over the file.
    #[must_use]
    pub fn overrides(&self) -> Settings {
        Settings {
            app_name: self.app_name.clone(),
            bin_name: self.bin_name.clone(),
            dist_dir: self.dist_dir.clone(),
            staging_dir: self.staging_dir.clone(),
            version_file: self.version_file.clone(),
            archiver: self.archiver,
            on_tool_failure: self.on_tool_failure,
        }
    }

    /// Default log filter implied by the verbosity flags.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
