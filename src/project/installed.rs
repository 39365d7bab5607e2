//! Installed-state metadata recorded by the package manager.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::base::PackageId;
use crate::error::{ArbiterError, Result};

/// What the package manager recorded about one installed project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InstalledState {
    pub root: InstalledRoot,
    #[serde(default)]
    pub versions: IndexMap<PackageId, InstalledPackage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InstalledRoot {
    #[serde(alias = "installPath", alias = "install-path")]
    pub install_path: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InstalledPackage {
    #[serde(default)]
    pub version: Option<String>,
}

impl InstalledState {
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            root: InstalledRoot {
                install_path: install_path.into(),
            },
            versions: IndexMap::new(),
        }
    }

    /// Record a package version.
    pub fn with_version(mut self, package: &str, version: &str) -> Self {
        self.versions.insert(
            PackageId::new(package),
            InstalledPackage {
                version: Some(version.to_string()),
            },
        );
        self
    }

    /// Record a package whose version is unknown.
    pub fn with_unversioned(mut self, package: &str) -> Self {
        self.versions
            .insert(PackageId::new(package), InstalledPackage::default());
        self
    }

    /// Packages that carry a version, in recorded order.
    pub fn known_versions(&self) -> impl Iterator<Item = (&PackageId, &str)> + '_ {
        self.versions
            .iter()
            .filter_map(|(id, pkg)| pkg.version.as_deref().map(|v| (id, v)))
    }

    /// The raw version recorded for `package`, if any.
    pub fn version_of(&self, package: &str) -> Option<&str> {
        self.versions.get(package).and_then(|pkg| pkg.version.as_deref())
    }

    /// Load `<vendor>/composer/installed.json`.
    ///
    /// The project root is the vendor directory's parent. Returns `Ok(None)`
    /// when the file does not exist.
    pub fn from_vendor_dir(vendor_dir: &Path) -> Result<Option<Self>> {
        let path = vendor_dir.join("composer").join("installed.json");
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ArbiterError::Read { path, source }),
        };

        let listing: InstalledJson =
            serde_json::from_str(&contents).map_err(|source| ArbiterError::Installed {
                path: path.clone(),
                source,
            })?;

        let root = vendor_dir.parent().unwrap_or(vendor_dir);
        let mut state = Self::new(root);
        for package in listing.into_packages() {
            state
                .versions
                .insert(package.name, InstalledPackage {
                    version: package.version_normalized.or(package.version),
                });
        }
        Ok(Some(state))
    }
}

/// `installed.json` comes as a bare array (Composer 1) or wrapped in an
/// object with a `packages` key (Composer 2).
#[derive(Deserialize)]
#[serde(untagged)]
enum InstalledJson {
    Wrapped { packages: Vec<InstalledJsonPackage> },
    Bare(Vec<InstalledJsonPackage>),
}

impl InstalledJson {
    fn into_packages(self) -> Vec<InstalledJsonPackage> {
        match self {
            InstalledJson::Wrapped { packages } => packages,
            InstalledJson::Bare(packages) => packages,
        }
    }
}

/// Composer records both the display version (`v1.2.1`, `1.2.3-RC1`) and
/// a normalized four-segment form (`1.2.1.0`, `1.2.3.0-RC1`). The
/// normalized form is preferred when present.
#[derive(Deserialize)]
struct InstalledJsonPackage {
    name: PackageId,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    version_normalized: Option<String>,
}
