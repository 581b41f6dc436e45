//! Aggregate metrics and structural statistics for one evaluation run.

use crate::error::Result;
use riddle_core::BlockKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Harmonic mean of pairs completeness and pairs quality.
///
/// Yields 0.0 unless both inputs are positive; division by zero is the
/// one tolerated arithmetic edge case and resolves to 0.0 rather than
/// an error. (With exactly one positive input the harmonic mean is 0
/// anyway, so the two-sided guard changes nothing — see the unit test.)
#[must_use]
pub fn f_measure(pc: f64, pq: f64) -> f64 {
    if 0.0 < pc && 0.0 < pq {
        2.0 * pc * pq / (pc + pq)
    } else {
        0.0
    }
}

/// Safe ratio: 0.0 when the denominator is zero.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Metrics record of one blocking evaluation run.
///
/// Naming note: `pairs_completeness` is found ÷ ground truth
/// (conventionally *recall*) and `pairs_quality` is found ÷ generated
/// comparisons (conventionally *precision*). The names are kept from
/// blocking literature; don't assume they line up with IR terminology
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingReport {
    /// Shape shared by every block of the evaluated collection.
    pub kind: BlockKind,
    /// Whether the run is clean-clean (two-dataset) resolution.
    pub clean_clean: bool,
    /// Number of blocks evaluated.
    pub block_count: usize,
    /// Total comparisons a full expansion of all blocks generates.
    pub aggregate_cardinality: u64,
    /// Total entity-to-block assignments across all blocks.
    pub block_assignments: u64,
    /// Dataset-1 assignments (bilateral collections only).
    pub d1_block_assignments: Option<u64>,
    /// Dataset-2 assignments (bilateral collections only).
    pub d2_block_assignments: Option<u64>,
    /// Distinct dataset-1 entities appearing in at least one block.
    pub entities_d1: usize,
    /// Distinct dataset-2 entities appearing in at least one block
    /// (clean-clean runs only).
    pub entities_d2: Option<usize>,
    /// Size of the full entity id space, both sides (absent for
    /// decomposed collections, which carry no index).
    pub total_entities: Option<usize>,
    /// Boundary separating dataset-1 ids from dataset-2 ids (bilateral
    /// collections only).
    pub dataset_limit: Option<usize>,
    /// Ground-truth duplicates credited in this run.
    pub detected_duplicates: usize,
    /// Total ground-truth size (the completeness denominator).
    pub ground_truth_size: usize,
    /// Found ÷ ground truth (recall-like).
    pub pairs_completeness: f64,
    /// Found ÷ aggregate cardinality (precision-like).
    pub pairs_quality: f64,
    /// Harmonic mean of the two, 0.0 unless both are positive.
    pub f_measure: f64,
}

impl BlockingReport {
    /// Human-readable multi-line summary of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Pretty-printed JSON rendering of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BlockingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks = self.block_count as f64;
        writeln!(f, "Blocks\t:\t{}", self.block_count)?;
        writeln!(f, "Aggregate cardinality\t:\t{}", self.aggregate_cardinality)?;
        writeln!(
            f,
            "CC\t:\t{:.4}",
            ratio(
                self.block_assignments as f64,
                self.aggregate_cardinality as f64
            )
        )?;
        match self.kind {
            BlockKind::Unilateral => {
                if let Some(total) = self.total_entities {
                    writeln!(f, "Total entities\t:\t{total}")?;
                    writeln!(f, "Entities in blocks\t:\t{}", self.entities_d1)?;
                    writeln!(
                        f,
                        "Singleton entities\t:\t{}",
                        total.saturating_sub(self.entities_d1)
                    )?;
                }
                writeln!(
                    f,
                    "Average block\t:\t{:.4}",
                    ratio(self.block_assignments as f64, blocks)
                )?;
                writeln!(
                    f,
                    "BC\t:\t{:.4}",
                    ratio(self.block_assignments as f64, self.entities_d1 as f64)
                )?;
            }
            BlockKind::Bilateral => {
                let limit = self.dataset_limit.unwrap_or(0);
                let total = self.total_entities.unwrap_or(0);
                let d2 = self.entities_d2.unwrap_or(0);
                let a1 = self.d1_block_assignments.unwrap_or(0) as f64;
                let a2 = self.d2_block_assignments.unwrap_or(0) as f64;
                writeln!(f, "Total entities D1\t:\t{limit}")?;
                writeln!(
                    f,
                    "Singleton entities D1\t:\t{}",
                    limit.saturating_sub(self.entities_d1)
                )?;
                writeln!(f, "Total entities D2\t:\t{}", total.saturating_sub(limit))?;
                writeln!(
                    f,
                    "Singleton entities D2\t:\t{}",
                    total.saturating_sub(limit).saturating_sub(d2)
                )?;
                writeln!(f, "Entities in blocks\t:\t{}", self.entities_d1 + d2)?;
                writeln!(
                    f,
                    "Average block\t:\t{:.4}-{:.4}",
                    ratio(a1, blocks),
                    ratio(a2, blocks)
                )?;
                writeln!(f, "iBC_1\t:\t{:.4}", ratio(a1, self.entities_d1 as f64))?;
                writeln!(f, "iBC_2\t:\t{:.4}", ratio(a2, d2 as f64))?;
                writeln!(
                    f,
                    "oBC\t:\t{:.4}",
                    ratio(a1 + a2, (self.entities_d1 + d2) as f64)
                )?;
            }
            BlockKind::Decomposed => {
                let covered = self.entities_d1 + self.entities_d2.unwrap_or(0);
                writeln!(f, "Entities in blocks\t:\t{covered}")?;
            }
        }
        writeln!(f, "Detected duplicates\t:\t{}", self.detected_duplicates)?;
        writeln!(f, "PC\t:\t{}", self.pairs_completeness)?;
        writeln!(f, "PQ\t:\t{}", self.pairs_quality)?;
        write!(f, "F-Measure\t:\t{}", self.f_measure)
    }
}
