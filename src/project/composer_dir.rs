//! A [`ProjectSource`] reading real Composer vendor directories.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;
use walkdir::WalkDir;

use crate::base::{ClassName, ProjectRoot};
use crate::config::Config;
use crate::error::{ArbiterError, Result};

use super::installed::InstalledState;
use super::source::{ClassMap, DiscoveredProject, ProjectSource};

/// Reads `vendor/composer/*` files from disk on every run.
#[derive(Clone, Debug, Default)]
pub struct ComposerDirSource {
    vendor_dirs: Vec<PathBuf>,
    scan_roots: Vec<PathBuf>,
    scan_depth: usize,
}

impl ComposerDirSource {
    pub fn new(vendor_dirs: Vec<PathBuf>) -> Self {
        Self {
            vendor_dirs,
            scan_roots: Vec::new(),
            scan_depth: crate::config::DEFAULT_SCAN_DEPTH,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            vendor_dirs: config.vendor_dirs.clone(),
            scan_roots: config.scan_roots.clone(),
            scan_depth: config.scan_depth,
        }
    }

    /// Also walk `root` for installed-state metadata of unregistered projects.
    pub fn with_scan_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scan_roots.push(root.into());
        self
    }

    /// Maximum walk depth, shared by every scan root.
    pub fn with_scan_depth(mut self, depth: usize) -> Self {
        self.scan_depth = depth;
        self
    }

    fn load_vendor_dir(&self, vendor_dir: &Path) -> Result<DiscoveredProject> {
        let root = vendor_dir.parent().unwrap_or(vendor_dir);
        Ok(DiscoveredProject {
            root: root.to_path_buf(),
            class_map: read_class_map(vendor_dir)?,
            installed: InstalledState::from_vendor_dir(vendor_dir)?,
        })
    }

    fn scan(&self, scan_root: &Path, found: &mut Vec<InstalledState>) -> Result<()> {
        if !scan_root.is_dir() {
            tracing::debug!("scan root {} does not exist, skipping", scan_root.display());
            return Ok(());
        }

        let mut walker = WalkDir::new(scan_root)
            .max_depth(self.scan_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        // The listing is a fallback; entries that cannot be walked are skipped.
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unwalkable entry under {}: {err}", scan_root.display());
                    continue;
                }
            };
            if !entry.file_type().is_dir() || entry.file_name() != "vendor" {
                continue;
            }
            walker.skip_current_dir();
            if let Some(state) = InstalledState::from_vendor_dir(entry.path())? {
                found.push(state);
            }
        }
        Ok(())
    }
}

impl ProjectSource for ComposerDirSource {
    fn discovered(&self) -> Result<Vec<DiscoveredProject>> {
        self.vendor_dirs
            .iter()
            .map(|dir| self.load_vendor_dir(dir))
            .collect()
    }

    fn global_listing(&self) -> Result<Vec<InstalledState>> {
        let mut found = Vec::new();
        for root in &self.scan_roots {
            self.scan(root, &mut found)?;
        }
        Ok(found)
    }
}

/// Read `<vendor>/composer/autoload_classmap.php`.
///
/// A missing file yields an empty map.
pub fn read_class_map(vendor_dir: &Path) -> Result<ClassMap> {
    let path = vendor_dir.join("composer").join("autoload_classmap.php");
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ClassMap::new()),
        Err(source) => return Err(ArbiterError::Read { path, source }),
    };

    let vendor = ProjectRoot::normalize(vendor_dir);
    let base = ProjectRoot::normalize(vendor_dir.parent().unwrap_or(vendor_dir));
    Ok(parse_class_map(
        &contents,
        vendor.as_str().trim_end_matches('/'),
        base.as_str().trim_end_matches('/'),
    ))
}

/// Parse the generated PHP classmap array.
///
/// Recognizes one `'Name' => <path expr>,` entry per line where the path
/// expression is `$vendorDir . '...'`, `$baseDir . '...'` or a plain quoted
/// string. Anything else is skipped.
pub fn parse_class_map(contents: &str, vendor_dir: &str, base_dir: &str) -> ClassMap {
    let mut map = ClassMap::new();

    for line in contents.lines() {
        let line = line.trim();
        let line = line.strip_suffix(',').unwrap_or(line);
        let Some((key, value)) = line.split_once("=>") else {
            continue;
        };
        let Some(class) = php_string(key.trim()) else {
            continue;
        };

        let value = value.trim();
        let path = match value.split_once('.') {
            Some((var, rest)) if var.trim() == "$vendorDir" => {
                php_string(rest.trim()).map(|rel| format!("{vendor_dir}{rel}"))
            }
            Some((var, rest)) if var.trim() == "$baseDir" => {
                php_string(rest.trim()).map(|rel| format!("{base_dir}{rel}"))
            }
            _ => php_string(value),
        };

        if let Some(path) = path {
            map.insert(ClassName::new(class), SmolStr::new(path));
        }
    }

    map
}

/// Decode a single-quoted PHP string literal.
fn php_string(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '\'')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}
