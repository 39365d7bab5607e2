//! Foundation types for the arbiter.
//!
//! This module provides the primitive keys everything else is built on:
//! - [`Version`] - Encoded, totally ordered package versions
//! - [`ProjectRoot`] - Normalized project root paths
//! - [`PackageId`], [`ClassName`] - Small-string identifiers
//!
//! This module has NO dependencies on other arbiter modules.

mod root;
mod version;

pub use root::ProjectRoot;
pub use version::Version;

/// A package identifier such as `vendor/package`.
pub type PackageId = smol_str::SmolStr;

/// A fully qualified class name as the host's name resolution sees it.
pub type ClassName = smol_str::SmolStr;
