//! Entity pair types: candidate comparisons and ground-truth duplicates.

use serde::{Deserialize, Serialize};

/// Dense non-negative entity identifier, assigned by upstream profile
/// loading. In clean-clean resolution each dataset uses its own 0-based
/// id space; the co-occurrence index concatenates the two spaces at the
/// dataset limit.
pub type EntityId = u32;

/// One candidate entity pair implied by a block.
///
/// The pair is unordered in meaning: in dirty resolution `(a, b)` and
/// `(b, a)` denote the same comparison. In clean-clean resolution
/// `entity1` is always the dataset-1 member and `entity2` the dataset-2
/// member, so the field order carries the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    /// First entity (dataset 1 in clean-clean resolution).
    pub entity1: EntityId,
    /// Second entity (dataset 2 in clean-clean resolution).
    pub entity2: EntityId,
}

impl Comparison {
    /// Create a new comparison.
    #[must_use]
    pub fn new(entity1: EntityId, entity2: EntityId) -> Self {
        Self { entity1, entity2 }
    }
}

/// An entity pair known a priori to be a true match.
///
/// Same side convention as [`Comparison`]: in clean-clean resolution
/// `entity1` belongs to dataset 1 and `entity2` to dataset 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// First entity (dataset 1 in clean-clean resolution).
    pub entity1: EntityId,
    /// Second entity (dataset 2 in clean-clean resolution).
    pub entity2: EntityId,
}

impl DuplicatePair {
    /// Create a new ground-truth pair.
    #[must_use]
    pub fn new(entity1: EntityId, entity2: EntityId) -> Self {
        Self { entity1, entity2 }
    }
}

impl From<Comparison> for DuplicatePair {
    fn from(c: Comparison) -> Self {
        Self::new(c.entity1, c.entity2)
    }
}
