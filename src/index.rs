//! Entity-to-block co-occurrence index.
//!
//! Built once per evaluation run from the full block collection, the
//! index records, for every entity, the ascending list of block ordinals
//! the entity appears in. Two entities share a block iff their adjacency
//! lists intersect, which a two-cursor merge join answers in
//! O(len1 + len2) — essential for "hub" entities with long lists, where
//! a nested scan would be quadratic.
//!
//! Decomposed collections carry pre-resolved comparisons and never build
//! an index.
//!
//! In clean-clean mode the two per-dataset id spaces are concatenated:
//! dataset-1 ids occupy `0..dataset_limit` and dataset-2 ids are stored
//! at `id + dataset_limit`. Adjacency lists are immutable once built.

use crate::error::{Error, Result};
use riddle_core::{collection_kind, Block, BlockKind, EntityId};

/// Entity→block adjacency index over one block collection.
#[derive(Debug, Clone)]
pub struct BlockIndex {
    /// One ascending, duplicate-free ordinal list per entity slot.
    entity_blocks: Vec<Vec<u32>>,
    /// Boundary separating dataset-1 slots from dataset-2 slots. Zero
    /// in single-dataset mode, and in two-dataset mode when no
    /// dataset-1 entity exists.
    dataset_limit: usize,
    /// Whether the index was built from a bilateral collection. The
    /// dataset limit alone cannot tell a single-dataset index from a
    /// two-dataset index whose dataset 1 is empty.
    bilateral: bool,
}

impl BlockIndex {
    /// Build the index for a unilateral or bilateral collection.
    ///
    /// # Errors
    ///
    /// Returns a contract violation for decomposed or mixed collections.
    pub fn build(blocks: &[Block]) -> Result<Self> {
        let kind = match collection_kind(blocks)? {
            None => {
                return Ok(Self {
                    entity_blocks: Vec::new(),
                    dataset_limit: 0,
                    bilateral: false,
                })
            }
            Some(BlockKind::Decomposed) => {
                return Err(Error::contract(
                    "decomposed blocks carry pre-resolved comparisons and need no index",
                ));
            }
            Some(kind) => kind,
        };

        let mut index = match kind {
            BlockKind::Unilateral => {
                let max_id = blocks
                    .iter()
                    .flat_map(|b| match b {
                        Block::Unilateral { entities } => entities.iter().copied(),
                        _ => unreachable!("homogeneous unilateral collection"),
                    })
                    .max();
                let slots = max_id.map_or(0, |id| id as usize + 1);
                let mut entity_blocks = vec![Vec::new(); slots];
                for (ordinal, block) in blocks.iter().enumerate() {
                    if let Block::Unilateral { entities } = block {
                        for &e in entities {
                            entity_blocks[e as usize].push(ordinal as u32);
                        }
                    }
                }
                Self {
                    entity_blocks,
                    dataset_limit: 0,
                    bilateral: false,
                }
            }
            BlockKind::Bilateral => {
                let (mut dataset_limit, mut d2_slots) = (0usize, 0usize);
                for block in blocks {
                    if let Block::Bilateral { left, right } = block {
                        for &e in left {
                            dataset_limit = dataset_limit.max(e as usize + 1);
                        }
                        for &e in right {
                            d2_slots = d2_slots.max(e as usize + 1);
                        }
                    }
                }
                let mut entity_blocks = vec![Vec::new(); dataset_limit + d2_slots];
                for (ordinal, block) in blocks.iter().enumerate() {
                    if let Block::Bilateral { left, right } = block {
                        for &e in left {
                            entity_blocks[e as usize].push(ordinal as u32);
                        }
                        for &e in right {
                            entity_blocks[e as usize + dataset_limit].push(ordinal as u32);
                        }
                    }
                }
                Self {
                    entity_blocks,
                    dataset_limit,
                    bilateral: true,
                }
            }
            BlockKind::Decomposed => unreachable!("rejected above"),
        };

        // Ordinals arrive in block order; sorting and deduping makes the
        // ascending invariant explicit and tolerates malformed blocks
        // that repeat an entity.
        for list in &mut index.entity_blocks {
            list.sort_unstable();
            list.dedup();
        }
        Ok(index)
    }

    /// Adjacency list of `entity` on the given dataset side, or `None`
    /// if the entity appears in no block.
    ///
    /// # Panics
    ///
    /// A side other than 0 or 1, or side 1 on a single-dataset index,
    /// is a caller contract violation.
    #[must_use]
    pub fn entity_blocks(&self, entity: EntityId, side: usize) -> Option<&[u32]> {
        assert!(side <= 1, "dataset index out of range: {side}");
        assert!(
            side == 0 || self.bilateral,
            "dataset index 1 requested on a single-dataset index"
        );
        // Dataset-1 ids live below the limit; anything past it would
        // alias a dataset-2 slot.
        if self.bilateral && side == 0 && entity as usize >= self.dataset_limit {
            return None;
        }
        let slot = entity as usize + side * self.dataset_limit;
        match self.entity_blocks.get(slot) {
            Some(list) if !list.is_empty() => Some(list),
            _ => None,
        }
    }

    /// Whether two entities share at least one block.
    ///
    /// Fetches the side-0 list of `e1` and the side-1 (clean-clean) or
    /// side-0 (dirty) list of `e2`, then merge-joins the two ascending
    /// lists. An entity absent from every block never co-occurs.
    #[must_use]
    pub fn co_occur(&self, e1: EntityId, e2: EntityId, clean_clean: bool) -> bool {
        let Some(blocks1) = self.entity_blocks(e1, 0) else {
            return false;
        };
        let Some(blocks2) = self.entity_blocks(e2, usize::from(clean_clean)) else {
            return false;
        };

        let (mut i, mut j) = (0, 0);
        while i < blocks1.len() && j < blocks2.len() {
            match blocks1[i].cmp(&blocks2[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// Total number of entity slots (both sides in clean-clean mode).
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_blocks.len()
    }

    /// Boundary separating dataset-1 slots from dataset-2 slots. Zero
    /// in single-dataset mode, and in two-dataset mode when no
    /// dataset-1 entity exists.
    #[must_use]
    pub fn dataset_limit(&self) -> usize {
        self.dataset_limit
    }

    /// Number of distinct entities on `side` that appear in at least one
    /// block.
    ///
    /// # Panics
    ///
    /// Same side contract as [`BlockIndex::entity_blocks`].
    #[must_use]
    pub fn entities_in_blocks(&self, side: usize) -> usize {
        assert!(side <= 1, "dataset index out of range: {side}");
        assert!(
            side == 0 || self.bilateral,
            "dataset index 1 requested on a single-dataset index"
        );
        let range = if !self.bilateral {
            0..self.entity_blocks.len()
        } else if side == 0 {
            0..self.dataset_limit
        } else {
            self.dataset_limit..self.entity_blocks.len()
        };
        self.entity_blocks[range]
            .iter()
            .filter(|list| !list.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unilateral_index() -> BlockIndex {
        // Block 0: {0,1,2}  Block 1: {1,3}  Block 2: {0,1}
        let blocks = vec![
            Block::unilateral(vec![0, 1, 2]),
            Block::unilateral(vec![1, 3]),
            Block::unilateral(vec![0, 1]),
        ];
        BlockIndex::build(&blocks).unwrap()
    }

    #[test]
    fn adjacency_lists_are_strictly_ascending() {
        let index = unilateral_index();
        for e in 0..4 {
            if let Some(list) = index.entity_blocks(e, 0) {
                assert!(list.windows(2).all(|w| w[0] < w[1]), "entity {e}: {list:?}");
            }
        }
        assert_eq!(index.entity_blocks(1, 0), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn co_occur_finds_shared_block() {
        let index = unilateral_index();
        assert!(index.co_occur(0, 2, false));
        assert!(index.co_occur(1, 3, false));
        assert!(!index.co_occur(2, 3, false));
    }

    #[test]
    fn co_occur_is_symmetric() {
        let index = unilateral_index();
        for a in 0..4u32 {
            for b in 0..4u32 {
                assert_eq!(
                    index.co_occur(a, b, false),
                    index.co_occur(b, a, false),
                    "asymmetric for ({a},{b})"
                );
            }
        }
    }

    #[test]
    fn absent_entity_never_co_occurs() {
        let index = unilateral_index();
        assert!(!index.co_occur(0, 99, false));
        assert!(!index.co_occur(99, 0, false));
    }

    #[test]
    fn bilateral_sides_are_kept_apart() {
        // Left ids and right ids overlap numerically but denote
        // different entities.
        let blocks = vec![
            Block::bilateral(vec![0, 1], vec![0]),
            Block::bilateral(vec![1], vec![1]),
        ];
        let index = BlockIndex::build(&blocks).unwrap();
        assert_eq!(index.dataset_limit(), 2);
        assert_eq!(index.entity_count(), 4);
        assert!(index.co_occur(0, 0, true));
        assert!(index.co_occur(1, 1, true));
        assert!(!index.co_occur(0, 1, true));
        assert_eq!(index.entities_in_blocks(0), 2);
        assert_eq!(index.entities_in_blocks(1), 2);
    }

    #[test]
    fn bilateral_index_with_empty_dataset_one_neither_panics_nor_miscounts() {
        let blocks = vec![Block::bilateral(vec![], vec![1])];
        let index = BlockIndex::build(&blocks).unwrap();
        assert_eq!(index.dataset_limit(), 0);
        assert_eq!(index.entities_in_blocks(0), 0);
        assert_eq!(index.entities_in_blocks(1), 1);
        assert_eq!(index.entity_blocks(1, 0), None);
        assert!(!index.co_occur(0, 1, true));
    }

    #[test]
    fn side_zero_id_past_the_limit_is_absent_on_a_bilateral_index() {
        // Dataset-2 slots sit right after the limit; a stray dataset-1
        // id must not read them.
        let blocks = vec![Block::bilateral(vec![0], vec![0, 1])];
        let index = BlockIndex::build(&blocks).unwrap();
        assert_eq!(index.dataset_limit(), 1);
        assert_eq!(index.entity_blocks(1, 0), None);
        assert_eq!(index.entity_blocks(2, 0), None);
        assert!(index.co_occur(0, 1, true));
        assert!(!index.co_occur(1, 0, true));
    }

    #[test]
    fn decomposed_collection_is_rejected() {
        let blocks = vec![Block::decomposed(vec![], false)];
        assert!(BlockIndex::build(&blocks).is_err());
    }

    #[test]
    #[should_panic(expected = "single-dataset index")]
    fn side_one_on_unilateral_index_panics() {
        let index = unilateral_index();
        let _ = index.entity_blocks(0, 1);
    }

    #[test]
    fn empty_collection_builds_empty_index() {
        let index = BlockIndex::build(&[]).unwrap();
        assert_eq!(index.entity_count(), 0);
        assert!(!index.co_occur(0, 1, false));
    }
}
