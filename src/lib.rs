//! # riddle
//!
//! Blocking evaluation for entity resolution.
//!
//! A blocking stage groups entities into *blocks* so that only entities
//! sharing a block are ever compared. `riddle` measures how well such a
//! stage did: given the blocks and a ground-truth duplicate set, it
//! classifies every implied comparison (TP/FP/FN) and aggregates the
//! standard quality figures — pairs completeness (recall-like), pairs
//! quality (precision-like), F-measure — along with structural block
//! statistics.
//!
//! - **Block model** ([`Block`]): unilateral (dirty), bilateral
//!   (clean-clean) and decomposed (pre-cleaned) blocks behind one sum
//!   type with a lazy comparison iterator.
//! - **Co-occurrence index** ([`BlockIndex`]): per-entity sorted block
//!   lists; "do these two entities share a block?" answered by a merge
//!   join instead of materializing all pairs.
//! - **Duplicate propagation** ([`DuplicatePropagation`]): credits each
//!   ground-truth pair at most once per run, however many blocks reach
//!   it.
//! - **Evaluator** ([`BlockingEvaluator`]): aggregate statistics or a
//!   classified row stream for a [`sink::ResultSink`] (CSV, XML, RDF,
//!   batched SPARQL/SQL behind injected transports).
//!
//! # Quick start
//!
//! ```rust
//! use riddle::{Block, BlockingEvaluator, DuplicatePair, DuplicatePropagation};
//!
//! // One dirty block over entities {0,1,2}; (0,1) is a known duplicate.
//! let blocks = vec![Block::unilateral(vec![0, 1, 2])];
//! let tracker = DuplicatePropagation::unilateral(vec![DuplicatePair::new(0, 1)]);
//!
//! let mut evaluator = BlockingEvaluator::new(&blocks, tracker);
//! let report = evaluator.statistics()?.expect("collection is not empty");
//!
//! assert_eq!(report.detected_duplicates, 1);
//! assert_eq!(report.pairs_completeness, 1.0);
//! assert!((report.pairs_quality - 1.0 / 3.0).abs() < 1e-9);
//! # Ok::<(), riddle::Error>(())
//! ```
//!
//! # Design notes
//!
//! - One evaluation run owns its index and tracker; nothing is shared
//!   across runs.
//! - Empty input is a warning, not an error. Mixed block shapes and
//!   out-of-range dataset indices fail fast.
//! - Sink failures are reported at the sink boundary and leave the
//!   computed metrics intact.

#![warn(missing_docs)]

pub mod cleaning;
mod error;
pub mod eval;
pub mod index;
pub mod propagation;
pub mod sink;

pub use error::{Error, Result};

// Data-model re-exports from riddle-core.
pub use riddle_core::{
    collection_kind, Attribute, Block, BlockKind, Comparison, Comparisons, DuplicatePair, EntityId,
    EntityProfile,
};

pub use cleaning::{ComparisonCleaner, ComparisonPropagation};
pub use eval::{BlockingEvaluator, BlockingReport};
pub use index::BlockIndex;
pub use propagation::DuplicatePropagation;
