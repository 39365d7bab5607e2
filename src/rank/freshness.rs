//! Freshness scoring.
//!
//! A package is *contested* when the catalog holds it at two or more
//! distinct versions. Each project is scored from its own version set:
//!
//! - contested package at the latest version: `+1`
//! - contested package behind latest: minus the raw key gap
//! - uncontested package: `+1`
//!
//! Gaps are raw [`Version`] key differences, so a single package one major
//! version behind outweighs any realistic count of `+1` credits.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::base::{PackageId, ProjectRoot, Version};
use crate::project::ProjectCatalog;

/// A project's freshness score. Wide enough that summed gaps cannot overflow.
pub type Score = i128;

/// Latest version of every contested package.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LatestVersionTable {
    latest: IndexMap<PackageId, Version, FxBuildHasher>,
}

#[derive(Clone, Copy)]
struct Observed {
    first: Version,
    max: Version,
    contested: bool,
}

impl LatestVersionTable {
    /// Collect the maximum version of each package observed at more than
    /// one distinct version across the catalog.
    pub fn compute(catalog: &ProjectCatalog) -> Self {
        let mut observed: IndexMap<&PackageId, Observed, FxBuildHasher> = IndexMap::default();

        for record in catalog.records() {
            for (package, &version) in record.versions() {
                observed
                    .entry(package)
                    .and_modify(|seen| {
                        seen.contested |= seen.first != version;
                        seen.max = seen.max.max(version);
                    })
                    .or_insert(Observed {
                        first: version,
                        max: version,
                        contested: false,
                    });
            }
        }

        let latest = observed
            .into_iter()
            .filter(|(_, seen)| seen.contested)
            .map(|(package, seen)| (package.clone(), seen.max))
            .collect();
        Self { latest }
    }

    /// The latest version of `package`, or `None` if it is not contested.
    pub fn get(&self, package: &str) -> Option<Version> {
        self.latest.get(package).copied()
    }

    pub fn is_contested(&self, package: &str) -> bool {
        self.latest.contains_key(package)
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Score of every project in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightTable {
    weights: IndexMap<ProjectRoot, Score>,
}

impl WeightTable {
    pub fn compute(catalog: &ProjectCatalog, latest: &LatestVersionTable) -> Self {
        let weights = catalog
            .records()
            .map(|record| {
                let score: Score = record
                    .versions()
                    .iter()
                    .map(|(package, &version)| package_score(latest.get(package), version))
                    .sum();
                (record.root().clone(), score)
            })
            .collect();
        Self { weights }
    }

    /// Build a table from explicit scores.
    pub fn from_scores(scores: impl IntoIterator<Item = (ProjectRoot, Score)>) -> Self {
        Self {
            weights: scores.into_iter().collect(),
        }
    }

    pub fn get(&self, root: &ProjectRoot) -> Option<Score> {
        self.weights.get(root).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectRoot, Score)> + '_ {
        self.weights.iter().map(|(root, &score)| (root, score))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

fn package_score(latest: Option<Version>, version: Version) -> Score {
    let Some(latest) = latest else {
        return 1;
    };
    match Score::from(latest.key()) - Score::from(version.key()) {
        0 => 1,
        gap => -gap,
    }
}
