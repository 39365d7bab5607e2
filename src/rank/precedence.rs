//! Precedence ordering of project roots.

use std::cmp::Reverse;

use crate::base::ProjectRoot;

use super::freshness::{Score, WeightTable};

/// Project roots from highest to lowest precedence, with their scores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrecedenceOrder {
    ranked: Vec<(ProjectRoot, Score)>,
}

impl PrecedenceOrder {
    /// Rank roots by score, highest first; equal scores keep ascending
    /// root order.
    ///
    /// Sorts by root first and then stable-sorts by descending score, so
    /// the result never depends on the table's iteration order.
    pub fn rank(weights: &WeightTable) -> Self {
        let mut ranked: Vec<(ProjectRoot, Score)> = weights
            .iter()
            .map(|(root, score)| (root.clone(), score))
            .collect();

        ranked.sort_by(|(a, _), (b, _)| a.cmp(b));
        ranked.sort_by_key(|&(_, score)| Reverse(score));

        Self { ranked }
    }

    pub fn roots(&self) -> impl Iterator<Item = &ProjectRoot> {
        self.ranked.iter().map(|(root, _)| root)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectRoot, Score)> + '_ {
        self.ranked.iter().map(|(root, score)| (root, *score))
    }

    /// Position of `root` in the order, 0 being the highest precedence.
    pub fn position(&self, root: &ProjectRoot) -> Option<usize> {
        self.ranked.iter().position(|(r, _)| r == root)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
