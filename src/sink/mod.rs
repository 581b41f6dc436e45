//! Result sinks for classified comparisons.
//!
//! A sink receives the classified row stream of one evaluation run (one
//! row per cleaned comparison, labeled TP or FP, then one FN row per
//! missed ground-truth pair) followed by the metrics record. Failures
//! are surfaced at the sink boundary and never invalidate the metrics
//! the evaluator computed.
//!
//! The batched sinks ([`SparqlSink`], [`SqlSink`]) accumulate rows and
//! flush at [`SINK_BATCH_SIZE`] to bound buffering and amortize
//! round-trips; a final partial batch is always flushed by
//! [`ResultSink::finish`]. Remote transports are injected
//! ([`UpdateEndpoint`], [`SqlExecutor`]) — wiring an actual HTTP or
//! database client is the caller's concern.

mod csv;
mod rdf;
mod sparql;
mod sql;
mod xml;

pub use csv::CsvSink;
pub use rdf::RdfSink;
pub use sparql::{SparqlSink, UpdateEndpoint};
pub use sql::{DbConfig, SqlDialect, SqlExecutor, SqlSink};
pub use xml::XmlSink;

use crate::error::Result;
use crate::eval::BlockingReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows accumulated before the batched sinks flush.
pub const SINK_BATCH_SIZE: usize = 1000;

/// Classification of one emitted pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairLabel {
    /// A newly credited ground-truth duplicate.
    TruePositive,
    /// A superfluous comparison: not ground truth, or already credited.
    FalsePositive,
    /// A ground-truth duplicate no block ever co-located.
    FalseNegative,
}

impl PairLabel {
    /// Short label as written by the sinks.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TruePositive => "TP",
            Self::FalsePositive => "FP",
            Self::FalseNegative => "FN",
        }
    }
}

impl fmt::Display for PairLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified pair, rendered for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    /// Display identifier of the first entity.
    pub url1: String,
    /// Display identifier of the second entity.
    pub url2: String,
    /// TP/FP/FN classification.
    pub label: PairLabel,
    /// Attribute dump of the first entity.
    pub profile1: String,
    /// Attribute dump of the second entity.
    pub profile2: String,
}

/// Destination for the classified rows and metrics of one run.
pub trait ResultSink {
    /// Write one classified row.
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()>;

    /// Write the aggregate metrics record.
    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()>;

    /// Flush buffered output, including any partial batch. Called once,
    /// after the last row and the metrics.
    fn finish(&mut self) -> Result<()>;
}

/// In-memory sink collecting rows and the metrics record.
///
/// Useful in tests and wherever the rows are post-processed in process.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    /// Rows received so far.
    pub rows: Vec<ClassifiedRow>,
    /// Metrics record, once received.
    pub metrics: Option<BlockingReport>,
}

impl VecSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for VecSink {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        self.metrics = Some(report.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
