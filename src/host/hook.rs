//! Name-resolution hooks.
//!
//! The host owns an [`AutoloadChain`] and consults it whenever it needs to
//! find the file defining a class. A resolver attaches to the chain through
//! a [`HookHandle`], which the host also owns; there is no global registry.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::project::ProjectSource;
use crate::rank::MergedClassMap;

use super::resolver::ClassResolver;

/// Anything that can map a class name to the file defining it.
pub trait ClassLocator: Send + Sync {
    fn locate(&self, name: &str) -> Option<String>;
}

impl<S: ProjectSource> ClassLocator for ClassResolver<S> {
    fn locate(&self, name: &str) -> Option<String> {
        self.lookup(name)
    }
}

/// Identifies one registration in an [`AutoloadChain`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// An ordered chain of class locators; the first hit wins.
///
/// Thread-safe via internal locking.
#[derive(Default)]
pub struct AutoloadChain {
    inner: RwLock<ChainInner>,
}

#[derive(Default)]
struct ChainInner {
    hooks: Vec<(HookId, Arc<dyn ClassLocator>)>,
    next_id: u64,
}

impl AutoloadChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locator at the front (`prepend`) or the back of the chain.
    pub fn register(&self, locator: Arc<dyn ClassLocator>, prepend: bool) -> HookId {
        let mut inner = self.inner.write();
        let id = HookId(inner.next_id);
        inner.next_id += 1;

        if prepend {
            inner.hooks.insert(0, (id, locator));
        } else {
            inner.hooks.push((id, locator));
        }
        id
    }

    /// Remove a registration. Returns `false` if it was not registered.
    pub fn unregister(&self, id: HookId) -> bool {
        let mut inner = self.inner.write();
        let before = inner.hooks.len();
        inner.hooks.retain(|(hook, _)| *hook != id);
        inner.hooks.len() != before
    }

    pub fn contains(&self, id: HookId) -> bool {
        self.inner.read().hooks.iter().any(|(hook, _)| *hook == id)
    }

    /// Ask each locator in order; `None` means the host should fall back
    /// to its own resolution.
    pub fn locate(&self, name: &str) -> Option<String> {
        // Query outside the lock so a locator may touch the chain.
        let hooks: Vec<Arc<dyn ClassLocator>> = self
            .inner
            .read()
            .hooks
            .iter()
            .map(|(_, locator)| Arc::clone(locator))
            .collect();
        hooks.iter().find_map(|locator| locator.locate(name))
    }

    pub fn len(&self) -> usize {
        self.inner.read().hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AutoloadChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoloadChain")
            .field("hooks", &self.len())
            .finish()
    }
}

/// A resolver's attachment to a host chain.
///
/// Dropping the handle unregisters it.
pub struct HookHandle<S: ProjectSource + 'static> {
    resolver: Arc<ClassResolver<S>>,
    chain: Arc<AutoloadChain>,
    registration: Option<(HookId, bool)>,
}

impl<S: ProjectSource + 'static> HookHandle<S> {
    /// Create an unregistered handle.
    pub fn new(resolver: Arc<ClassResolver<S>>, chain: Arc<AutoloadChain>) -> Self {
        Self {
            resolver,
            chain,
            registration: None,
        }
    }

    pub fn resolver(&self) -> &Arc<ClassResolver<S>> {
        &self.resolver
    }

    /// Register the resolver with the chain. Already registered handles
    /// keep their existing position.
    pub fn register(&mut self, prepend: bool) -> HookId {
        if let Some((id, _)) = self.registration {
            return id;
        }
        let locator: Arc<dyn ClassLocator> = self.resolver.clone();
        let id = self.chain.register(locator, prepend);
        self.registration = Some((id, prepend));
        id
    }

    pub fn unregister(&mut self) -> bool {
        match self.registration.take() {
            Some((id, _)) => self.chain.unregister(id),
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Unregister, rebuild the classmap, and register again.
    ///
    /// The hook is re-registered even when the run fails, so the chain
    /// keeps serving the previously published map. A handle that was not
    /// registered is registered at the front.
    pub fn refresh(&mut self) -> Result<Arc<MergedClassMap>> {
        let prepend = self.registration.map_or(true, |(_, prepend)| prepend);
        self.unregister();
        let result = self.resolver.run();
        self.register(prepend);
        result
    }
}

impl<S: ProjectSource + 'static> Drop for HookHandle<S> {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl<S: ProjectSource + 'static> ClassResolver<S> {
    /// Attach this resolver to `chain`, in front of existing locators.
    pub fn install(self: Arc<Self>, chain: Arc<AutoloadChain>) -> HookHandle<S> {
        let mut handle = HookHandle::new(self, chain);
        handle.register(true);
        handle
    }
}
