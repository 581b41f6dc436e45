//! Comparison-cleaning collaborators.
//!
//! Classification must never double-count a pair reachable from two
//! different blocks, so unilateral and bilateral collections pass
//! through a cleaner before a row stream is produced. The cleaner is an
//! external collaborator consumed at its contract; a hash-join default
//! is provided so the engine works out of the box.

use crate::error::{Error, Result};
use riddle_core::{collection_kind, Block, BlockKind, EntityId};
use std::collections::HashSet;

/// External comparison-cleaning service.
///
/// # Contract
///
/// Given a homogeneous unilateral or bilateral collection, the output is
/// a decomposed collection in which every unordered pair appears at most
/// once overall, with the clean-clean flag preserved. Classifying the
/// output therefore yields exactly one TP or FP row per distinct pair
/// implied by the input blocks.
pub trait ComparisonCleaner {
    /// Rewrite `blocks` as deduplicated decomposed blocks.
    fn clean(&self, blocks: &[Block]) -> Result<Vec<Block>>;
}

/// Default cleaner: keeps the first occurrence of every pair, in block
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonPropagation;

impl ComparisonPropagation {
    /// Create the default cleaner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComparisonCleaner for ComparisonPropagation {
    fn clean(&self, blocks: &[Block]) -> Result<Vec<Block>> {
        let kind = match collection_kind(blocks)? {
            None => return Ok(Vec::new()),
            Some(BlockKind::Decomposed) => {
                return Err(Error::contract(
                    "decomposed blocks are already deduplicated",
                ));
            }
            Some(kind) => kind,
        };
        let clean_clean = kind == BlockKind::Bilateral;

        let mut seen: HashSet<(EntityId, EntityId)> = HashSet::new();
        let mut comparisons = Vec::new();
        for block in blocks {
            for c in block.comparisons() {
                // Sides are fixed in clean-clean mode; dirty pairs are
                // unordered and need a canonical key.
                let key = if clean_clean || c.entity1 <= c.entity2 {
                    (c.entity1, c.entity2)
                } else {
                    (c.entity2, c.entity1)
                };
                if seen.insert(key) {
                    comparisons.push(c);
                }
            }
        }
        Ok(vec![Block::decomposed(comparisons, clean_clean)])
    }
}
