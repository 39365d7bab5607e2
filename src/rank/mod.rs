//! Ranking and merging: from a catalog to one merged classmap.
//!
//! ## Pipeline
//!
//! ```text
//! ProjectCatalog
//!   ↓ LatestVersionTable::compute   (contested packages, their newest version)
//!   ↓ WeightTable::compute          (freshness score per root)
//!   ↓ PrecedenceOrder::rank         (score desc, root asc)
//!   ↓ MergedClassMap::merge         (first writer wins)
//! MergedClassMap
//! ```

mod freshness;
mod merge;
mod precedence;

pub use freshness::{LatestVersionTable, Score, WeightTable};
pub use merge::{ClassEntry, MergedClassMap};
pub use precedence::PrecedenceOrder;

use crate::project::ProjectCatalog;

/// Run the whole ranking pipeline over a finished catalog.
pub fn merge_catalog(catalog: &ProjectCatalog) -> MergedClassMap {
    let latest = LatestVersionTable::compute(catalog);
    let weights = WeightTable::compute(catalog, &latest);
    let order = PrecedenceOrder::rank(&weights);

    tracing::debug!(
        "ranked {} roots over {} contested packages",
        order.len(),
        latest.len()
    );

    MergedClassMap::merge(catalog, &order)
}
