//! Delimited-text result sink.

use super::{ClassifiedRow, ResultSink};
use crate::error::Result;
use crate::eval::BlockingReport;
use std::io::Write;

/// Writes one comma-separated line per classified pair, followed by the
/// headline metrics, to any [`Write`] target.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    /// Create a sink over `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        writeln!(
            self.out,
            "{},{},{},Profile 1:[{}],Profile 2:[{}]",
            row.url1, row.url2, row.label, row.profile1, row.profile2
        )?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        writeln!(
            self.out,
            "Pairs Quality (Precision)\t:\t{}",
            report.pairs_quality
        )?;
        writeln!(
            self.out,
            "Pairs Completeness (Recall)\t:\t{}",
            report.pairs_completeness
        )?;
        writeln!(self.out, "F-Measure\t:\t{}", report.f_measure)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
