//! Project discovery and cataloguing.
//!
//! Collaborators that read the package manager's state ([`ProjectSource`]
//! implementations, manifests, installed-state metadata) feed the
//! [`ProjectCatalog`], the first stage of every resolver run.

mod catalog;
mod composer_dir;
mod installed;
mod manifest;
mod source;

pub use catalog::{PackageVersionSet, ProjectCatalog, ProjectRecord};
pub use composer_dir::{ComposerDirSource, parse_class_map, read_class_map};
pub use installed::{InstalledPackage, InstalledRoot, InstalledState};
pub use manifest::{Manifest, ManifestReader};
pub use source::{ClassMap, DiscoveredProject, MemorySource, ProjectSource, Snapshot};
