//! Project catalog: per-root package versions and classmaps.
//!
//! The catalog is built once per resolver run from the discovered loaders,
//! then the global installed-state listing as a fallback. Each root's
//! version set is seeded from installed-state metadata and then overlaid
//! with the identity its own manifest declares.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use crate::base::{ClassName, PackageId, ProjectRoot, Version};
use crate::error::Result;

use super::installed::InstalledState;
use super::manifest::ManifestReader;
use super::source::{ClassMap, DiscoveredProject};

/// Package id → encoded version, for one project.
pub type PackageVersionSet = IndexMap<PackageId, Version>;

/// Everything the catalog knows about one project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRecord {
    root: ProjectRoot,
    versions: PackageVersionSet,
    class_map: Option<ClassMap>,
}

impl ProjectRecord {
    pub fn new(root: ProjectRoot) -> Self {
        Self {
            root,
            versions: PackageVersionSet::new(),
            class_map: None,
        }
    }

    pub fn with_version(mut self, package: &str, version: &str) -> Self {
        self.versions
            .insert(PackageId::new(package), Version::encode(version));
        self
    }

    pub fn with_class(mut self, class: &str, path: &str) -> Self {
        self.class_map
            .get_or_insert_with(ClassMap::new)
            .insert(ClassName::new(class), SmolStr::new(path));
        self
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn versions(&self) -> &PackageVersionSet {
        &self.versions
    }

    /// The loader's classmap; `None` for projects only known from the
    /// global listing.
    pub fn class_map(&self) -> Option<&ClassMap> {
        self.class_map.as_ref()
    }
}

/// All projects of one run, keyed by normalized root in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    records: IndexMap<ProjectRoot, ProjectRecord>,
}

impl ProjectCatalog {
    /// Build the catalog.
    ///
    /// Loaders are processed in order; a root seen twice keeps its first
    /// record. The global listing then adds any root not yet present.
    /// Fails only when a manifest exists but cannot be read or parsed.
    pub fn build(
        discovered: Vec<DiscoveredProject>,
        global_listing: Vec<InstalledState>,
        manifests: &ManifestReader,
        sentinel: &str,
    ) -> Result<Self> {
        let builder = CatalogBuilder { manifests, sentinel };
        let mut records = IndexMap::new();

        for project in discovered {
            let root = ProjectRoot::normalize(&project.root);
            let Entry::Vacant(slot) = records.entry(root.clone()) else {
                tracing::debug!("duplicate loader for {root}, keeping the first");
                continue;
            };
            let versions = builder.version_set(&root, project.installed.as_ref())?;
            tracing::debug!(
                "catalogued {root}: {} packages, {} classes",
                versions.len(),
                project.class_map.len()
            );
            slot.insert(ProjectRecord {
                root,
                versions,
                class_map: Some(project.class_map),
            });
        }

        for installed in global_listing {
            let root = ProjectRoot::normalize(&installed.root.install_path);
            let Entry::Vacant(slot) = records.entry(root.clone()) else {
                continue;
            };
            let versions = builder.version_set(&root, Some(&installed))?;
            tracing::debug!("catalogued {root} from global listing: {} packages", versions.len());
            slot.insert(ProjectRecord {
                root,
                versions,
                class_map: None,
            });
        }

        Ok(Self { records })
    }

    /// Assemble a catalog from prepared records. Later duplicates are dropped.
    pub fn from_records(records: impl IntoIterator<Item = ProjectRecord>) -> Self {
        let mut map = IndexMap::new();
        for record in records {
            map.entry(record.root.clone()).or_insert(record);
        }
        Self { records: map }
    }

    pub fn get(&self, root: &ProjectRoot) -> Option<&ProjectRecord> {
        self.records.get(root)
    }

    pub fn records(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct CatalogBuilder<'a> {
    manifests: &'a ManifestReader,
    sentinel: &'a str,
}

impl CatalogBuilder<'_> {
    fn version_set(
        &self,
        root: &ProjectRoot,
        installed: Option<&InstalledState>,
    ) -> Result<PackageVersionSet> {
        let mut versions = PackageVersionSet::new();

        if let Some(installed) = installed {
            for (package, raw) in installed.known_versions() {
                versions.insert(package.clone(), Version::encode(raw));
            }
        }

        if let Some(manifest) = self.manifests.read(root)? {
            let identity = manifest.identity(self.sentinel);
            let raw = manifest
                .version
                .as_deref()
                .or_else(|| installed.and_then(|state| state.version_of(self.sentinel)))
                .unwrap_or("0.0.0");
            versions.insert(PackageId::new(identity), Version::encode(raw));
        }

        // The sentinel is a self-reference, not a dependency.
        versions.shift_remove(self.sentinel);
        Ok(versions)
    }
}
