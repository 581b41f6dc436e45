//! Tag-based markup result sink.

use super::{ClassifiedRow, ResultSink};
use crate::error::Result;
use crate::eval::BlockingReport;
use std::io::Write;

/// Writes a generic markup document: one `<pair>` element per row, a
/// `<stats>` element for the metrics, all inside a `<general>` root.
#[derive(Debug)]
pub struct XmlSink<W: Write> {
    out: W,
    counter: usize,
}

impl<W: Write> XmlSink<W> {
    /// Create the sink and write the document prologue.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(out, "<general>")?;
        Ok(Self { out, counter: 0 })
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for XmlSink<W> {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        self.counter += 1;
        writeln!(self.out, "<pair id=\"{}\">", self.counter)?;
        writeln!(self.out, "<url1>{}</url1>", scrub(&row.url1))?;
        writeln!(self.out, "<url2>{}</url2>", scrub(&row.url2))?;
        writeln!(self.out, "<pairType>{}</pairType>", row.label)?;
        writeln!(self.out, "<profile1>{}</profile1>", scrub(&row.profile1))?;
        writeln!(self.out, "<profile2>{}</profile2>", scrub(&row.profile2))?;
        writeln!(self.out, "</pair>")?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        writeln!(self.out, "<stats>")?;
        writeln!(
            self.out,
            "<pairsQuality>{}</pairsQuality>",
            report.pairs_quality
        )?;
        writeln!(
            self.out,
            "<pairsCompleteness>{}</pairsCompleteness>",
            report.pairs_completeness
        )?;
        writeln!(self.out, "<fMeasure>{}</fMeasure>", report.f_measure)?;
        writeln!(self.out, "</stats>")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.out, "</general>")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Ampersands break naive markup consumers; they are stripped from
/// emitted values.
fn scrub(value: &str) -> String {
    value.replace('&', "")
}
