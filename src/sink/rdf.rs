//! RDF/XML result sink.

use super::{ClassifiedRow, ResultSink};
use crate::error::Result;
use crate::eval::BlockingReport;
use std::io::Write;

/// Writes one `rdf:Description` per classified pair plus a `STATS`
/// description for the metrics.
#[derive(Debug)]
pub struct RdfSink<W: Write> {
    out: W,
    counter: usize,
}

impl<W: Write> RdfSink<W> {
    /// Create the sink and write the RDF prologue.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "<?xml version=\"1.0\"?>")?;
        writeln!(out, "<rdf:RDF")?;
        writeln!(
            out,
            "xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\""
        )?;
        writeln!(out, "xmlns:obj=\"https://www.w3schools.com/rdf/\">")?;
        Ok(Self { out, counter: 0 })
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for RdfSink<W> {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        self.counter += 1;
        writeln!(
            self.out,
            "<rdf:Description rdf:about=\"record/{}\">",
            self.counter
        )?;
        writeln!(self.out, "<obj:url1>{}</obj:url1>", scrub(&row.url1))?;
        writeln!(self.out, "<obj:url2>{}</obj:url2>", scrub(&row.url2))?;
        writeln!(self.out, "<obj:pairType>{}</obj:pairType>", row.label)?;
        writeln!(
            self.out,
            "<obj:profile1>{}</obj:profile1>",
            scrub(&row.profile1)
        )?;
        writeln!(
            self.out,
            "<obj:profile2>{}</obj:profile2>",
            scrub(&row.profile2)
        )?;
        writeln!(self.out, "</rdf:Description>")?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        writeln!(self.out, "<rdf:Description rdf:about=\"STATS\">")?;
        writeln!(
            self.out,
            "<obj:pairsQuality>{}</obj:pairsQuality>",
            report.pairs_quality
        )?;
        writeln!(
            self.out,
            "<obj:pairsCompleteness>{}</obj:pairsCompleteness>",
            report.pairs_completeness
        )?;
        writeln!(self.out, "<obj:fMeasure>{}</obj:fMeasure>", report.f_measure)?;
        writeln!(self.out, "</rdf:Description>")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.out, "</rdf:RDF>")?;
        self.out.flush()?;
        Ok(())
    }
}

fn scrub(value: &str) -> String {
    value.replace('&', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::PairLabel;

    #[test]
    fn descriptions_are_numbered_records() {
        let mut sink = RdfSink::new(Vec::new()).unwrap();
        for label in [PairLabel::TruePositive, PairLabel::FalsePositive] {
            sink.write_row(&ClassifiedRow {
                url1: "u1".into(),
                url2: "u2".into(),
                label,
                profile1: "p1".into(),
                profile2: "p2".into(),
            })
            .unwrap();
        }
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("rdf:about=\"record/1\""));
        assert!(text.contains("rdf:about=\"record/2\""));
        assert!(text.trim_end().ends_with("</rdf:RDF>"));
    }
}
