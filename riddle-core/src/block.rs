//! Block representations produced by an upstream blocking stage.
//!
//! A block groups entities an upstream blocking algorithm considers
//! comparable. Three shapes exist, and a collection under evaluation is
//! always homogeneous:
//!
//! - [`Block::Unilateral`]: one entity set from a single dataset (dirty
//!   resolution, duplicates may exist within the dataset).
//! - [`Block::Bilateral`]: one entity set per dataset (clean-clean
//!   resolution, duplicates only across datasets).
//! - [`Block::Decomposed`]: a pre-materialized comparison list, produced
//!   by a comparison-cleaning step; its `clean_clean` flag replaces the
//!   shape-based dispatch of the other two variants.
//!
//! Blocks are identified by their ordinal position in the owning
//! collection. Comparison iteration is pure and restartable, and a single
//! block never yields the same unordered pair twice.

use crate::comparison::{Comparison, EntityId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The shape of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Single-dataset entity set (dirty resolution).
    Unilateral,
    /// Two per-dataset entity sets (clean-clean resolution).
    Bilateral,
    /// Pre-materialized comparison list.
    Decomposed,
}

/// A group of entities hypothesized comparable by a blocking algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// Entities drawn from a single dataset. Expansion yields all
    /// unordered pairs: `k·(k−1)/2` comparisons for `k` entities.
    Unilateral {
        /// Ordered, duplicate-free entity set.
        entities: Vec<EntityId>,
    },
    /// One entity set per dataset. Expansion yields the full cross
    /// product: `k1·k2` comparisons.
    Bilateral {
        /// Dataset-1 entities.
        left: Vec<EntityId>,
        /// Dataset-2 entities.
        right: Vec<EntityId>,
    },
    /// Comparisons already materialized and deduplicated upstream.
    Decomposed {
        /// The stored comparisons, yielded verbatim.
        comparisons: Vec<Comparison>,
        /// Whether the comparisons represent clean-clean resolution.
        clean_clean: bool,
    },
}

impl Block {
    /// Create a unilateral (dirty-resolution) block.
    #[must_use]
    pub fn unilateral(entities: Vec<EntityId>) -> Self {
        Self::Unilateral { entities }
    }

    /// Create a bilateral (clean-clean) block.
    #[must_use]
    pub fn bilateral(left: Vec<EntityId>, right: Vec<EntityId>) -> Self {
        Self::Bilateral { left, right }
    }

    /// Create a decomposed block from pre-cleaned comparisons.
    #[must_use]
    pub fn decomposed(comparisons: Vec<Comparison>, clean_clean: bool) -> Self {
        Self::Decomposed {
            comparisons,
            clean_clean,
        }
    }

    /// The shape of this block.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Unilateral { .. } => BlockKind::Unilateral,
            Self::Bilateral { .. } => BlockKind::Bilateral,
            Self::Decomposed { .. } => BlockKind::Decomposed,
        }
    }

    /// Whether this block belongs to a clean-clean resolution run.
    #[must_use]
    pub fn is_clean_clean(&self) -> bool {
        match self {
            Self::Unilateral { .. } => false,
            Self::Bilateral { .. } => true,
            Self::Decomposed { clean_clean, .. } => *clean_clean,
        }
    }

    /// Number of comparisons a full expansion of this block generates.
    #[must_use]
    pub fn comparison_count(&self) -> u64 {
        match self {
            Self::Unilateral { entities } => {
                let k = entities.len() as u64;
                k * k.saturating_sub(1) / 2
            }
            Self::Bilateral { left, right } => left.len() as u64 * right.len() as u64,
            Self::Decomposed { comparisons, .. } => comparisons.len() as u64,
        }
    }

    /// Number of entity-to-block assignments this block contributes.
    ///
    /// Used for cardinality bookkeeping: the entity count for unilateral
    /// blocks, the sum of both side counts for bilateral blocks, and two
    /// assignments per stored comparison for decomposed blocks.
    #[must_use]
    pub fn assignment_count(&self) -> u64 {
        match self {
            Self::Unilateral { entities } => entities.len() as u64,
            Self::Bilateral { left, right } => (left.len() + right.len()) as u64,
            Self::Decomposed { comparisons, .. } => 2 * comparisons.len() as u64,
        }
    }

    /// Lazy iterator over the comparisons this block implies.
    ///
    /// The sequence is finite, restartable, and free of duplicate
    /// unordered pairs within the block.
    #[must_use]
    pub fn comparisons(&self) -> Comparisons<'_> {
        let col = match self {
            Self::Unilateral { .. } => 1,
            _ => 0,
        };
        Comparisons {
            block: self,
            row: 0,
            col,
        }
    }
}

/// Lazy comparison sequence of one block. Created by [`Block::comparisons`].
#[derive(Debug, Clone)]
pub struct Comparisons<'a> {
    block: &'a Block,
    row: usize,
    col: usize,
}

impl Iterator for Comparisons<'_> {
    type Item = Comparison;

    fn next(&mut self) -> Option<Comparison> {
        match self.block {
            Block::Unilateral { entities } => {
                if self.col >= entities.len() {
                    self.row += 1;
                    self.col = self.row + 1;
                }
                if self.col >= entities.len() {
                    return None;
                }
                let c = Comparison::new(entities[self.row], entities[self.col]);
                self.col += 1;
                Some(c)
            }
            Block::Bilateral { left, right } => {
                if right.is_empty() {
                    return None;
                }
                if self.col >= right.len() {
                    self.row += 1;
                    self.col = 0;
                }
                if self.row >= left.len() {
                    return None;
                }
                let c = Comparison::new(left[self.row], right[self.col]);
                self.col += 1;
                Some(c)
            }
            Block::Decomposed { comparisons, .. } => {
                let c = comparisons.get(self.row).copied()?;
                self.row += 1;
                Some(c)
            }
        }
    }
}

/// Determine the shape shared by every block of a collection.
///
/// Returns `Ok(None)` for an empty collection. A collection mixing
/// shapes is a caller contract violation and fails fast rather than
/// being silently misclassified.
pub fn collection_kind(blocks: &[Block]) -> Result<Option<BlockKind>> {
    let Some(first) = blocks.first() else {
        return Ok(None);
    };
    let kind = first.kind();
    if let Some(other) = blocks.iter().find(|b| b.kind() != kind) {
        return Err(Error::contract(format!(
            "mixed block shapes in one collection: {:?} and {:?}",
            kind,
            other.kind()
        )));
    }
    Ok(Some(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unilateral_expansion_is_all_unordered_pairs() {
        let block = Block::unilateral(vec![0, 1, 2, 3]);
        assert_eq!(block.comparison_count(), 6);
        let pairs: Vec<_> = block.comparisons().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], Comparison::new(0, 1));
        assert_eq!(pairs[5], Comparison::new(2, 3));
    }

    #[test]
    fn bilateral_expansion_is_cross_product() {
        let block = Block::bilateral(vec![0, 1], vec![0, 1, 2]);
        assert_eq!(block.comparison_count(), 6);
        assert_eq!(block.comparisons().count(), 6);
        assert_eq!(block.assignment_count(), 5);
    }

    #[test]
    fn decomposed_yields_stored_list_verbatim() {
        let comparisons = vec![Comparison::new(0, 5), Comparison::new(1, 4)];
        let block = Block::decomposed(comparisons.clone(), true);
        assert_eq!(block.comparison_count(), 2);
        assert_eq!(block.assignment_count(), 4);
        assert_eq!(block.comparisons().collect::<Vec<_>>(), comparisons);
    }

    #[test]
    fn no_duplicate_unordered_pair_within_a_block() {
        let block = Block::unilateral(vec![4, 7, 9, 12, 15]);
        let mut seen = HashSet::new();
        for c in block.comparisons() {
            let key = (c.entity1.min(c.entity2), c.entity1.max(c.entity2));
            assert!(seen.insert(key), "pair {key:?} yielded twice");
        }
        assert_eq!(seen.len() as u64, block.comparison_count());
    }

    #[test]
    fn iteration_is_restartable() {
        let block = Block::bilateral(vec![1, 2], vec![3]);
        let first: Vec<_> = block.comparisons().collect();
        let second: Vec<_> = block.comparisons().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_blocks_yield_nothing() {
        assert_eq!(Block::unilateral(vec![]).comparisons().count(), 0);
        assert_eq!(Block::unilateral(vec![3]).comparisons().count(), 0);
        assert_eq!(Block::bilateral(vec![], vec![1]).comparisons().count(), 0);
        assert_eq!(Block::bilateral(vec![1], vec![]).comparisons().count(), 0);
        assert_eq!(Block::decomposed(vec![], false).comparisons().count(), 0);
    }

    #[test]
    fn collection_kind_rejects_mixed_shapes() {
        let blocks = vec![
            Block::unilateral(vec![0, 1]),
            Block::bilateral(vec![0], vec![1]),
        ];
        assert!(collection_kind(&blocks).is_err());
    }

    #[test]
    fn collection_kind_of_empty_collection_is_none() {
        assert_eq!(collection_kind(&[]).unwrap(), None);
    }

    #[test]
    fn collection_kind_of_homogeneous_collection() {
        let blocks = vec![
            Block::unilateral(vec![0, 1]),
            Block::unilateral(vec![2, 3]),
        ];
        assert_eq!(collection_kind(&blocks).unwrap(), Some(BlockKind::Unilateral));
    }
}
