//! Classmap merging in precedence order.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use crate::base::{ClassName, ProjectRoot};
use crate::project::ProjectCatalog;

use super::precedence::PrecedenceOrder;

/// Where a class definition lives and which project provided it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    pub path: SmolStr,
    pub root: ProjectRoot,
}

/// The merged class name → file path table of one resolver run.
///
/// Immutable once built; a new run produces a new map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedClassMap {
    entries: IndexMap<ClassName, ClassEntry>,
    /// Definitions that lost to a higher-precedence root, per class name.
    shadowed: IndexMap<ClassName, Vec<ClassEntry>>,
    precedence: PrecedenceOrder,
}

impl MergedClassMap {
    /// Fold each root's classmap into a fresh map, walking `order` from the
    /// highest precedence down. The first root to define a name keeps it.
    ///
    /// Roots without a classmap contribute nothing. Key order is the walk
    /// order, then each classmap's own order.
    pub fn merge(catalog: &ProjectCatalog, order: &PrecedenceOrder) -> Self {
        let mut entries: IndexMap<ClassName, ClassEntry> = IndexMap::new();
        let mut shadowed: IndexMap<ClassName, Vec<ClassEntry>> = IndexMap::new();

        for root in order.roots() {
            let Some(class_map) = catalog.get(root).and_then(|record| record.class_map()) else {
                continue;
            };

            for (name, path) in class_map {
                let candidate = ClassEntry {
                    path: path.clone(),
                    root: root.clone(),
                };
                match entries.entry(name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(candidate);
                    }
                    Entry::Occupied(_) => {
                        shadowed.entry(name.clone()).or_default().push(candidate);
                    }
                }
            }
        }

        Self {
            entries,
            shadowed,
            precedence: order.clone(),
        }
    }

    /// File path for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.path.as_str())
    }

    /// Winning definition for `name`, including its root.
    pub fn entry(&self, name: &str) -> Option<&ClassEntry> {
        self.entries.get(name)
    }

    /// Definitions of `name` that lost, highest precedence first.
    pub fn shadowed(&self, name: &str) -> &[ClassEntry] {
        self.shadowed.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every colliding name with its winner and the definitions it shadows.
    pub fn conflicts(&self) -> impl Iterator<Item = (&ClassName, &ClassEntry, &[ClassEntry])> + '_ {
        self.shadowed.iter().filter_map(|(name, losers)| {
            self.entries
                .get(name)
                .map(|winner| (name, winner, losers.as_slice()))
        })
    }

    /// The order that produced this map.
    pub fn precedence(&self) -> &PrecedenceOrder {
        &self.precedence
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassName, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, entry)| (name, entry.path.as_str()))
    }

    /// Plain name → path copy of the table.
    pub fn to_map(&self) -> IndexMap<ClassName, SmolStr> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.path.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
