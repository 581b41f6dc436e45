//! Evaluation of a blocking stage against ground truth.
//!
//! [`BlockingEvaluator`] drives one evaluation pass over a homogeneous
//! block collection. Two routes yield the duplicate count and both must
//! agree:
//!
//! - [`BlockingEvaluator::statistics`] tests every ground-truth pair
//!   against the co-occurrence index (decomposed collections instead
//!   drive their stored comparisons through the tracker). No comparison
//!   stream is materialized.
//! - [`BlockingEvaluator::classify`] produces the classified row stream
//!   (TP/FP per cleaned comparison, FN per missed ground-truth pair) for
//!   a result sink. Unilateral and bilateral collections are cleaned
//!   first so no pair is counted twice.
//!
//! The evaluator owns its index and tracker for the duration of a run;
//! concurrent runs need independent evaluators.

use crate::cleaning::ComparisonCleaner;
use crate::error::{Error, Result};
use crate::eval::report::{f_measure, ratio, BlockingReport};
use crate::index::BlockIndex;
use crate::propagation::DuplicatePropagation;
use crate::sink::{ClassifiedRow, PairLabel, ResultSink};
use riddle_core::{collection_kind, Block, BlockKind, DuplicatePair, EntityId, EntityProfile};
use std::collections::HashSet;

/// Structural figures shared by both evaluation routes.
struct Structure {
    kind: BlockKind,
    clean_clean: bool,
    aggregate_cardinality: u64,
    block_assignments: u64,
    d1_block_assignments: Option<u64>,
    d2_block_assignments: Option<u64>,
    entities_d1: usize,
    entities_d2: Option<usize>,
    total_entities: Option<usize>,
    dataset_limit: Option<usize>,
}

/// One evaluation run over a block collection and its ground truth.
pub struct BlockingEvaluator<'a> {
    blocks: &'a [Block],
    propagation: DuplicatePropagation,
    index: Option<BlockIndex>,
    report: Option<BlockingReport>,
}

impl<'a> BlockingEvaluator<'a> {
    /// Create an evaluator over `blocks` with its own duplicate tracker.
    ///
    /// The tracker is reset on entry, so a previously used instance can
    /// be handed over.
    #[must_use]
    pub fn new(blocks: &'a [Block], mut propagation: DuplicatePropagation) -> Self {
        propagation.reset();
        Self {
            blocks,
            propagation,
            index: None,
            report: None,
        }
    }

    /// The report of the most recent completed pass, if any.
    ///
    /// Stays valid and retrievable even when [`BlockingEvaluator::classify`]
    /// returned a sink error.
    #[must_use]
    pub fn report(&self) -> Option<&BlockingReport> {
        self.report.as_ref()
    }

    /// The co-occurrence index built for this run, if one was needed.
    #[must_use]
    pub fn index(&self) -> Option<&BlockIndex> {
        self.index.as_ref()
    }

    /// Compute aggregate metrics without materializing a comparison
    /// stream.
    ///
    /// Returns `Ok(None)` (after a warning) for an empty collection.
    ///
    /// # Errors
    ///
    /// Mixed block shapes are a contract violation.
    pub fn statistics(&mut self) -> Result<Option<BlockingReport>> {
        let Some(structure) = self.structure()? else {
            return Ok(None);
        };

        self.propagation.reset();
        if structure.kind == BlockKind::Decomposed {
            for block in self.blocks {
                for c in block.comparisons() {
                    self.propagation.test_and_credit(c.entity1, c.entity2);
                }
            }
        } else if let Some(index) = &self.index {
            let pairs: Vec<DuplicatePair> = self.propagation.ground_truth().to_vec();
            for pair in pairs {
                if index.co_occur(pair.entity1, pair.entity2, structure.clean_clean) {
                    self.propagation.test_and_credit(pair.entity1, pair.entity2);
                }
            }
        }
        Ok(Some(self.finish_report(structure)))
    }

    /// Classify every comparison of the (cleaned) stream and hand the
    /// rows, the false negatives, and the metrics record to `sink`.
    ///
    /// Unilateral and bilateral collections go through `cleaner` first;
    /// decomposed collections are classified verbatim. `profiles_d2` is
    /// required for clean-clean runs and ignored otherwise.
    ///
    /// A failing sink is logged and abandoned, but classification runs
    /// to completion: the metrics stay retrievable through
    /// [`BlockingEvaluator::report`] and the sink error is returned at
    /// the end.
    ///
    /// # Errors
    ///
    /// Contract violations (mixed shapes, missing profiles) and sink
    /// failures.
    pub fn classify(
        &mut self,
        profiles_d1: &[EntityProfile],
        profiles_d2: Option<&[EntityProfile]>,
        cleaner: &dyn ComparisonCleaner,
        sink: &mut dyn ResultSink,
    ) -> Result<Option<BlockingReport>> {
        let Some(structure) = self.structure()? else {
            return Ok(None);
        };
        if structure.clean_clean && profiles_d2.is_none() {
            return Err(Error::contract(
                "clean-clean classification requires dataset-2 profiles",
            ));
        }
        let d2 = profiles_d2.unwrap_or(&[]);

        let cleaned_storage;
        let cleaned: &[Block] = if structure.kind == BlockKind::Decomposed {
            self.blocks
        } else {
            cleaned_storage = cleaner.clean(self.blocks)?;
            &cleaned_storage
        };

        self.propagation.reset();
        let mut sink_error: Option<Error> = None;
        for block in cleaned {
            for c in block.comparisons() {
                let credited = self.propagation.test_and_credit(c.entity1, c.entity2);
                if sink_error.is_some() {
                    continue;
                }
                let label = if credited {
                    PairLabel::TruePositive
                } else {
                    PairLabel::FalsePositive
                };
                let row = build_row(
                    profiles_d1,
                    d2,
                    structure.clean_clean,
                    c.entity1,
                    c.entity2,
                    label,
                )?;
                if let Err(e) = sink.write_row(&row) {
                    log::error!("result sink failed, evaluation continues without it: {e}");
                    sink_error = Some(e);
                }
            }
        }

        let false_negatives: Vec<DuplicatePair> = self.propagation.remaining().collect();
        if sink_error.is_none() {
            for pair in &false_negatives {
                let row = build_row(
                    profiles_d1,
                    d2,
                    structure.clean_clean,
                    pair.entity1,
                    pair.entity2,
                    PairLabel::FalseNegative,
                )?;
                if let Err(e) = sink.write_row(&row) {
                    log::error!("result sink failed, evaluation continues without it: {e}");
                    sink_error = Some(e);
                    break;
                }
            }
        }

        let report = self.finish_report(structure);
        if sink_error.is_none() {
            if let Err(e) = sink
                .write_metrics(&report)
                .and_then(|()| sink.finish())
            {
                log::error!("result sink failed while finishing: {e}");
                sink_error = Some(e);
            }
        }
        match sink_error {
            Some(e) => Err(e),
            None => Ok(Some(report)),
        }
    }

    /// Compute the variant-independent structure of the collection,
    /// building the co-occurrence index when the shape calls for one.
    fn structure(&mut self) -> Result<Option<Structure>> {
        let Some(kind) = collection_kind(self.blocks)? else {
            log::warn!("empty set of blocks was given as input");
            return Ok(None);
        };
        let clean_clean = self.blocks[0].is_clean_clean();

        let aggregate_cardinality = self.blocks.iter().map(Block::comparison_count).sum();
        let block_assignments = self.blocks.iter().map(Block::assignment_count).sum();
        let (mut d1_block_assignments, mut d2_block_assignments) = (None, None);
        if kind == BlockKind::Bilateral {
            let (mut a1, mut a2) = (0u64, 0u64);
            for block in self.blocks {
                if let Block::Bilateral { left, right } = block {
                    a1 += left.len() as u64;
                    a2 += right.len() as u64;
                }
            }
            d1_block_assignments = Some(a1);
            d2_block_assignments = Some(a2);
        }

        let structure = if kind == BlockKind::Decomposed {
            // No index: coverage comes straight from the stored
            // comparisons, with the clean-clean flag deciding sides.
            let mut d1 = HashSet::new();
            let mut d2 = HashSet::new();
            for block in self.blocks {
                for c in block.comparisons() {
                    d1.insert(c.entity1);
                    if clean_clean {
                        d2.insert(c.entity2);
                    } else {
                        d1.insert(c.entity2);
                    }
                }
            }
            Structure {
                kind,
                clean_clean,
                aggregate_cardinality,
                block_assignments,
                d1_block_assignments,
                d2_block_assignments,
                entities_d1: d1.len(),
                entities_d2: clean_clean.then_some(d2.len()),
                total_entities: None,
                dataset_limit: None,
            }
        } else {
            let index = match self.index.take() {
                Some(index) => index,
                None => BlockIndex::build(self.blocks)?,
            };
            let entities_d1 = index.entities_in_blocks(0);
            let entities_d2 = (kind == BlockKind::Bilateral).then(|| index.entities_in_blocks(1));
            let structure = Structure {
                kind,
                clean_clean,
                aggregate_cardinality,
                block_assignments,
                d1_block_assignments,
                d2_block_assignments,
                entities_d1,
                entities_d2,
                total_entities: Some(index.entity_count()),
                dataset_limit: (kind == BlockKind::Bilateral).then(|| index.dataset_limit()),
            };
            self.index = Some(index);
            structure
        };
        Ok(Some(structure))
    }

    /// Fold the tracker outcome into the final report and retain it.
    fn finish_report(&mut self, structure: Structure) -> BlockingReport {
        let found = self.propagation.found_count();
        let ground_truth_size = self.propagation.ground_truth_size();
        let pc = ratio(found as f64, ground_truth_size as f64);
        let pq = ratio(found as f64, structure.aggregate_cardinality as f64);
        let report = BlockingReport {
            kind: structure.kind,
            clean_clean: structure.clean_clean,
            block_count: self.blocks.len(),
            aggregate_cardinality: structure.aggregate_cardinality,
            block_assignments: structure.block_assignments,
            d1_block_assignments: structure.d1_block_assignments,
            d2_block_assignments: structure.d2_block_assignments,
            entities_d1: structure.entities_d1,
            entities_d2: structure.entities_d2,
            total_entities: structure.total_entities,
            dataset_limit: structure.dataset_limit,
            detected_duplicates: found,
            ground_truth_size,
            pairs_completeness: pc,
            pairs_quality: pq,
            f_measure: f_measure(pc, pq),
        };
        self.report = Some(report.clone());
        report
    }
}

fn build_row(
    profiles_d1: &[EntityProfile],
    profiles_d2: &[EntityProfile],
    clean_clean: bool,
    e1: EntityId,
    e2: EntityId,
    label: PairLabel,
) -> Result<ClassifiedRow> {
    let p1 = lookup(profiles_d1, e1)?;
    let p2 = if clean_clean {
        lookup(profiles_d2, e2)?
    } else {
        lookup(profiles_d1, e2)?
    };
    Ok(ClassifiedRow {
        url1: p1.url.clone(),
        url2: p2.url.clone(),
        label,
        profile1: p1.to_string(),
        profile2: p2.to_string(),
    })
}

fn lookup(profiles: &[EntityProfile], id: EntityId) -> Result<&EntityProfile> {
    profiles
        .get(id as usize)
        .ok_or_else(|| Error::contract(format!("no profile for entity id {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use riddle_core::Comparison;

    #[test]
    fn empty_collection_short_circuits_with_no_output() {
        let mut evaluator =
            BlockingEvaluator::new(&[], DuplicatePropagation::unilateral(vec![]));
        assert!(evaluator.statistics().unwrap().is_none());
        assert!(evaluator.report().is_none());
    }

    #[test]
    fn mixed_collection_is_a_contract_violation() {
        let blocks = vec![
            Block::unilateral(vec![0, 1]),
            Block::decomposed(vec![Comparison::new(0, 1)], false),
        ];
        let mut evaluator =
            BlockingEvaluator::new(&blocks, DuplicatePropagation::unilateral(vec![]));
        assert!(matches!(
            evaluator.statistics(),
            Err(Error::Core(riddle_core::Error::Contract(_)))
        ));
    }

    #[test]
    fn decomposed_statistics_credit_stored_comparisons() {
        let blocks = vec![Block::decomposed(
            vec![
                Comparison::new(0, 1),
                Comparison::new(0, 2),
                Comparison::new(0, 1), // repeat never double-counts
            ],
            false,
        )];
        let dp = DuplicatePropagation::unilateral(vec![DuplicatePair::new(0, 1)]);
        let mut evaluator = BlockingEvaluator::new(&blocks, dp);
        let report = evaluator.statistics().unwrap().unwrap();
        assert_eq!(report.detected_duplicates, 1);
        assert_eq!(report.aggregate_cardinality, 3);
        assert_eq!(report.entities_d1, 3);
        assert_eq!(report.total_entities, None);
    }

    #[test]
    fn bilateral_collection_with_empty_dataset_one_is_valid_input() {
        let blocks = vec![Block::bilateral(vec![], vec![1])];
        let dp = DuplicatePropagation::bilateral(vec![DuplicatePair::new(0, 1)]);
        let mut evaluator = BlockingEvaluator::new(&blocks, dp);
        let report = evaluator.statistics().unwrap().unwrap();
        assert_eq!(report.aggregate_cardinality, 0);
        assert_eq!(report.entities_d1, 0);
        assert_eq!(report.entities_d2, Some(1));
        assert_eq!(report.detected_duplicates, 0);
        assert_eq!(report.f_measure, 0.0);
    }

    #[test]
    fn clean_clean_classification_without_d2_profiles_is_rejected() {
        let blocks = vec![Block::bilateral(vec![0], vec![0])];
        let dp = DuplicatePropagation::bilateral(vec![]);
        let mut evaluator = BlockingEvaluator::new(&blocks, dp);
        let profiles = vec![EntityProfile::new("a")];
        let mut sink = crate::sink::VecSink::new();
        let err = evaluator.classify(
            &profiles,
            None,
            &crate::cleaning::ComparisonPropagation::new(),
            &mut sink,
        );
        assert!(matches!(err, Err(Error::Contract(_))));
    }
}
