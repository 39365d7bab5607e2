//! Host-facing layer: the resolver facade and its name-resolution hook.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use arbiter::host::{AutoloadChain, ClassResolver};
//! use arbiter::project::ComposerDirSource;
//!
//! let chain = Arc::new(AutoloadChain::new());
//! let resolver = Arc::new(ClassResolver::new(ComposerDirSource::new(vendor_dirs)));
//!
//! let mut hook = resolver.install(Arc::clone(&chain));
//! hook.refresh()?;
//!
//! let path = chain.locate("Acme\\Plugin\\Main");
//! ```

mod hook;
mod resolver;

pub use hook::{AutoloadChain, ClassLocator, HookHandle, HookId};
pub use resolver::ClassResolver;
