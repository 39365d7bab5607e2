//! Inputs to catalog construction and the sources that provide them.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::base::ClassName;
use crate::error::{ArbiterError, Result};

use super::installed::InstalledState;

/// Class name → file path, in the order the loader reported them.
pub type ClassMap = IndexMap<ClassName, SmolStr>;

/// One package-manager instance found in the running process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DiscoveredProject {
    /// Project root as the loader reported it; normalized later.
    pub root: PathBuf,
    #[serde(default)]
    pub class_map: ClassMap,
    #[serde(default)]
    pub installed: Option<InstalledState>,
}

impl DiscoveredProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            class_map: ClassMap::new(),
            installed: None,
        }
    }

    pub fn with_class(mut self, class: &str, path: &str) -> Self {
        self.class_map.insert(ClassName::new(class), SmolStr::new(path));
        self
    }

    pub fn with_installed(mut self, installed: InstalledState) -> Self {
        self.installed = Some(installed);
        self
    }
}

/// Provides the raw per-project metadata for one resolver run.
///
/// Called once per run; implementations should report the current state
/// rather than a cached copy so re-running picks up new projects.
pub trait ProjectSource: Send + Sync {
    /// Loaders registered in the process, in registration order.
    fn discovered(&self) -> Result<Vec<DiscoveredProject>>;

    /// Installed-state metadata for every known project, including ones
    /// no registered loader points at.
    fn global_listing(&self) -> Result<Vec<InstalledState>> {
        Ok(Vec::new())
    }
}

impl<T: ProjectSource + ?Sized> ProjectSource for Box<T> {
    fn discovered(&self) -> Result<Vec<DiscoveredProject>> {
        (**self).discovered()
    }

    fn global_listing(&self) -> Result<Vec<InstalledState>> {
        (**self).global_listing()
    }
}

/// A dump of a host's runtime state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub loaders: Vec<DiscoveredProject>,
    #[serde(default)]
    pub installed: Vec<InstalledState>,
}

/// An in-memory [`ProjectSource`].
///
/// Thread-safe via internal locking, so projects can be added between runs.
#[derive(Debug, Default)]
pub struct MemorySource {
    inner: RwLock<Snapshot>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Load a JSON snapshot file.
    pub fn from_snapshot_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ArbiterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = serde_json::from_str(&contents).map_err(|source| ArbiterError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn add_loader(&self, project: DiscoveredProject) {
        self.inner.write().loaders.push(project);
    }

    pub fn add_installed(&self, installed: InstalledState) {
        self.inner.write().installed.push(installed);
    }
}

impl ProjectSource for MemorySource {
    fn discovered(&self) -> Result<Vec<DiscoveredProject>> {
        Ok(self.inner.read().loaders.clone())
    }

    fn global_listing(&self) -> Result<Vec<InstalledState>> {
        Ok(self.inner.read().installed.clone())
    }
}
