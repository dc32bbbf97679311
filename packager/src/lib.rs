//! stool release packager library.
//!
//! This crate cross-compiles the stool binary for a fixed set of named
//! configurations and packages each result as a checksummed archive. It is
//! used by the `stool-packager` CLI binary and can be driven
//! programmatically for testing.
//!
//! # Modules
//!
//! - [`archive`] - Archive naming, creation, and SHA-256 side-files
//! - [`builder`] - Cargo release builds per target triple
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Layered settings and the resolved packager configuration
//! - [`driver`] - Runs the pipeline over the requested configurations
//! - [`error`] - Error types for every stage
//! - [`exec`] - External command execution and the tool failure policy
//! - [`output`] - Progress and summary formatting
//! - [`pipeline`] - The per-configuration stage sequence
//! - [`registry`] - Named build configurations
//! - [`stager`] - Staging directory reset and binary collection
//! - [`target`] - Target descriptors and archive kinds
//! - [`version`] - `version.json` loading

pub mod archive;
pub mod builder;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod exec;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod stager;
pub mod target;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
