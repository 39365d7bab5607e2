//! The resolver facade.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::base::ProjectRoot;
use crate::config::Config;
use crate::error::Result;
use crate::project::{ManifestReader, ProjectCatalog, ProjectSource};
use crate::rank::{self, ClassEntry, MergedClassMap, PrecedenceOrder};

/// Builds merged classmaps from a [`ProjectSource`] and serves lookups.
///
/// `run` rebuilds everything from scratch and publishes the new map with a
/// single pointer swap; lookups keep reading the previous map until then.
/// Concurrent runs are serialized. Nothing is refreshed automatically:
/// call `run` again to pick up new projects.
pub struct ClassResolver<S> {
    source: S,
    manifests: ManifestReader,
    sentinel: String,
    published: RwLock<Arc<MergedClassMap>>,
    run_lock: Mutex<()>,
}

impl<S: ProjectSource> ClassResolver<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, &Config::default())
    }

    pub fn with_config(source: S, config: &Config) -> Self {
        Self {
            source,
            manifests: ManifestReader::new(config.manifest_file.clone()),
            sentinel: config.root_sentinel.clone(),
            published: RwLock::new(Arc::new(MergedClassMap::default())),
            run_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Rebuild the merged classmap and publish it.
    ///
    /// On error the previously published map stays in place. When the
    /// source reports no loaders the run is a no-op and the current map is
    /// returned unchanged.
    pub fn run(&self) -> Result<Arc<MergedClassMap>> {
        let _guard = self.run_lock.lock();

        let discovered = self.source.discovered()?;
        if discovered.is_empty() {
            tracing::debug!("no loaders discovered, keeping published classmap");
            return Ok(self.current());
        }

        let listing = self.source.global_listing()?;
        let catalog = ProjectCatalog::build(discovered, listing, &self.manifests, &self.sentinel)?;
        let merged = Arc::new(rank::merge_catalog(&catalog));

        tracing::info!(
            "resolved {} classes from {} roots ({} conflicts)",
            merged.len(),
            catalog.len(),
            merged.conflicts().count()
        );

        *self.published.write() = Arc::clone(&merged);
        Ok(merged)
    }

    /// File path of `name` in the last published map.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.published.read().get(name).map(str::to_string)
    }

    /// Winning definition of `name`, with the root that provided it.
    pub fn lookup_entry(&self, name: &str) -> Option<ClassEntry> {
        self.published.read().entry(name).cloned()
    }

    /// Definitions of `name` that lost to the published winner.
    pub fn shadowed(&self, name: &str) -> Vec<ClassEntry> {
        self.published.read().shadowed(name).to_vec()
    }

    /// Precedence used by the last run.
    pub fn precedence(&self) -> PrecedenceOrder {
        self.published.read().precedence().clone()
    }

    /// Roots in precedence order.
    pub fn roots(&self) -> Vec<ProjectRoot> {
        self.published.read().precedence().roots().cloned().collect()
    }

    /// The last published map; empty before the first run.
    pub fn current(&self) -> Arc<MergedClassMap> {
        self.published.read().clone()
    }
}
