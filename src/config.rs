//! Resolver configuration.
//!
//! Defaults, then an optional TOML file, then `ARBITER_*` environment
//! overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ArbiterError, Result};

pub const DEFAULT_MANIFEST_FILE: &str = "composer.json";
pub const DEFAULT_ROOT_SENTINEL: &str = "__root__";
pub const DEFAULT_SCAN_DEPTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Manifest filename looked up directly inside each project root.
    pub manifest_file: String,
    /// Placeholder identity for projects that declare no package name.
    pub root_sentinel: String,
    /// Vendor directories whose loaders are registered with the host.
    pub vendor_dirs: Vec<PathBuf>,
    /// Directories walked for additional installed-state metadata.
    pub scan_roots: Vec<PathBuf>,
    /// Maximum depth of the scan-root walk.
    pub scan_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            root_sentinel: DEFAULT_ROOT_SENTINEL.to_string(),
            vendor_dirs: Vec::new(),
            scan_roots: Vec::new(),
            scan_depth: DEFAULT_SCAN_DEPTH,
        }
    }
}

impl Config {
    /// Load configuration, reading `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML config file without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ArbiterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ArbiterError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = var("ARBITER_MANIFEST_FILE") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.manifest_file = trimmed.to_string();
            }
        }

        if let Some(raw) = var("ARBITER_ROOT_SENTINEL") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.root_sentinel = trimmed.to_string();
            }
        }

        if let Some(raw) = var("ARBITER_SCAN_DEPTH") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                match trimmed.parse::<usize>() {
                    Ok(depth) => self.scan_depth = depth,
                    Err(err) => {
                        tracing::warn!("invalid ARBITER_SCAN_DEPTH, ignoring: {err}");
                    }
                }
            }
        }
    }
}
