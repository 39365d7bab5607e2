//! Normalized project root identifiers.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// The normalized absolute path of a project root.
///
/// Always absolute, `/`-separated and terminated by a trailing `/`.
/// Symlinks and `.`/`..` segments are resolved against the filesystem when
/// the path exists, and lexically otherwise, so two spellings of the same
/// location produce equal keys. Cloning is a refcount bump.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProjectRoot(Arc<str>);

impl ProjectRoot {
    /// Normalize a path into a root key.
    ///
    /// Normalizing an already-normalized root returns an equal root.
    pub fn normalize(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| lexical_absolute(path));

        let mut text = resolved.to_string_lossy().replace('\\', "/");
        if let Some(stripped) = text.strip_prefix("//?/") {
            text = stripped.to_string();
        }
        if !text.ends_with('/') {
            text.push('/');
        }
        Self(text.into())
    }

    /// Get the root as a string, including the trailing `/`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the root as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_str())
    }

    /// Path of a file directly inside this root.
    pub fn join(&self, file: impl AsRef<Path>) -> PathBuf {
        self.as_path().join(file)
    }
}

/// Absolutize against the current directory and fold `.`/`..` without
/// touching the filesystem.
fn lexical_absolute(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl fmt::Debug for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectRoot({})", self.0)
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectRoot {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
