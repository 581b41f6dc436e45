//! Blocking evaluation framework.
//!
//! # Overview
//!
//! Given a homogeneous block collection and a ground-truth duplicate
//! set, this module classifies every implied comparison and aggregates:
//!
//! - **Pairs completeness (PC)**: found ÷ ground truth (recall-like)
//! - **Pairs quality (PQ)**: found ÷ generated comparisons
//!   (precision-like)
//! - **F-measure**: harmonic mean of the two
//! - Structural figures: aggregate cardinality, block assignments,
//!   entities covered and singletons per side
//!
//! # Example
//!
//! ```rust
//! use riddle::{Block, BlockingEvaluator, DuplicatePair, DuplicatePropagation};
//!
//! let blocks = vec![Block::unilateral(vec![0, 1, 2])];
//! let tracker = DuplicatePropagation::unilateral(vec![DuplicatePair::new(0, 1)]);
//! let mut evaluator = BlockingEvaluator::new(&blocks, tracker);
//!
//! let report = evaluator.statistics()?.expect("collection is not empty");
//! assert_eq!(report.aggregate_cardinality, 3);
//! assert_eq!(report.detected_duplicates, 1);
//! assert!((report.pairs_quality - 1.0 / 3.0).abs() < 1e-9);
//! # Ok::<(), riddle::Error>(())
//! ```

pub mod evaluator;
pub mod report;

pub use evaluator::BlockingEvaluator;
pub use report::{f_measure, BlockingReport};
