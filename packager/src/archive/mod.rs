//! Distribution archives: naming, creation, and checksums.
//!
//! # Sub-modules
//!
//! - [`checksum`] - SHA-256 digests and `.sha256.txt` side-files.
//! - [`naming`] - `<app>-<version>-<platform>.<ext>` archive names.
//! - [`packaging`] - Tarball and zip creation from a staging directory.

pub mod checksum;
pub mod naming;
pub mod packaging;
