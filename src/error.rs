//! Error types for catalog construction and resolver runs.

use std::path::PathBuf;

/// Failures that abort a resolver run.
///
/// Missing files are never errors; only files that exist but cannot be
/// read or parsed end up here.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    /// A file was found but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A project manifest exists but is not a valid manifest document.
    #[error("invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Installed-state metadata exists but is not valid JSON of the expected shape.
    #[error("invalid installed-state metadata {}: {source}", path.display())]
    Installed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A resolver snapshot could not be decoded.
    #[error("invalid snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArbiterError>;
