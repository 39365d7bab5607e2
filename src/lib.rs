//! # classmap-arbiter
//!
//! Decides which of several co-installed, independently vendored package
//! trees provides each class, and serves the resulting classmap.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! host    → Resolver facade, autoload chain hooks
//!   ↓
//! rank    → Freshness scores, precedence order, classmap merge
//!   ↓
//! project → Sources, manifests, installed state, catalog
//!   ↓
//! base    → Primitives (Version, ProjectRoot)
//! ```
//!
//! `config` and `error` are shared by every layer.

/// Foundation types: Version, ProjectRoot, identifiers
pub mod base;

/// Project sources and the per-run catalog
pub mod project;

/// Scoring, ranking and merging
pub mod rank;

/// Resolver facade and name-resolution hooks
pub mod host;

pub mod config;
pub mod error;

pub use base::{ClassName, PackageId, ProjectRoot, Version};
pub use config::Config;
pub use error::{ArbiterError, Result};
pub use host::{AutoloadChain, ClassLocator, ClassResolver, HookHandle};
pub use project::{ComposerDirSource, DiscoveredProject, InstalledState, MemorySource, ProjectSource};
pub use rank::{MergedClassMap, PrecedenceOrder};
