//! Project manifests (`composer.json`).
//!
//! Only the self-declared identity and version matter here; every other
//! field of the document is ignored.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::base::ProjectRoot;
use crate::error::{ArbiterError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl Manifest {
    /// Parse a manifest document.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(contents).map_err(|source| ArbiterError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The declared identity, or `sentinel` when the manifest has none.
    pub fn identity<'a>(&'a self, sentinel: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(sentinel)
    }
}

/// Reads manifests from project roots.
#[derive(Clone, Debug)]
pub struct ManifestReader {
    file_name: String,
}

impl ManifestReader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the manifest at `root`, if there is one.
    ///
    /// A missing file yields `Ok(None)`. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn read(&self, root: &ProjectRoot) -> Result<Option<Manifest>> {
        let path = root.join(&self.file_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ArbiterError::Read { path, source }),
        };
        Manifest::parse(&contents, &path).map(Some)
    }
}

impl Default for ManifestReader {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MANIFEST_FILE)
    }
}
