//! Batched SPARQL update sink.

use super::{ClassifiedRow, ResultSink, SINK_BATCH_SIZE};
use crate::error::Result;
use crate::eval::BlockingReport;

/// Remote SPARQL update endpoint, injected by the caller.
///
/// An implementation typically posts the update to an HTTP endpoint;
/// tests use an in-memory recorder.
pub trait UpdateEndpoint {
    /// Execute one SPARQL update request.
    fn execute(&mut self, update: &str) -> Result<()>;
}

/// Accumulates row triples and flushes one `INSERT DATA` update per
/// [`SINK_BATCH_SIZE`] rows; [`ResultSink::finish`] flushes the final
/// partial batch.
#[derive(Debug)]
pub struct SparqlSink<E: UpdateEndpoint> {
    endpoint: E,
    graph: String,
    triples: String,
    pending_rows: usize,
    next_record: usize,
}

impl<E: UpdateEndpoint> SparqlSink<E> {
    /// Create a sink inserting into the named graph of `endpoint`.
    pub fn new(endpoint: E, graph: impl Into<String>) -> Self {
        Self {
            endpoint,
            graph: graph.into(),
            triples: String::new(),
            pending_rows: 0,
            next_record: 0,
        }
    }

    /// Consume the sink and return the endpoint.
    pub fn into_inner(self) -> E {
        self.endpoint
    }

    fn triple(&mut self, subject: &str, predicate: &str, object: &str) {
        self.triples.push_str(&format!(
            "<{subject}> <{predicate}> \"{}\" .\n",
            literal(object)
        ));
    }

    fn flush(&mut self) -> Result<()> {
        if self.triples.is_empty() {
            return Ok(());
        }
        let update = format!(
            "INSERT DATA {{ GRAPH <{}> {{\n{}}} }}",
            self.graph, self.triples
        );
        self.endpoint.execute(&update)?;
        self.triples.clear();
        self.pending_rows = 0;
        Ok(())
    }
}

impl<E: UpdateEndpoint> ResultSink for SparqlSink<E> {
    fn write_row(&mut self, row: &ClassifiedRow) -> Result<()> {
        self.next_record += 1;
        let subject = format!("record/{}", self.next_record);
        self.triple(&subject, "url1", &row.url1);
        self.triple(&subject, "url2", &row.url2);
        self.triple(&subject, "pairType", row.label.as_str());
        self.triple(&subject, "profile1", &row.profile1);
        self.triple(&subject, "profile2", &row.profile2);
        self.pending_rows += 1;
        if self.pending_rows == SINK_BATCH_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    fn write_metrics(&mut self, report: &BlockingReport) -> Result<()> {
        self.triple("STATS", "pairsQuality", &report.pairs_quality.to_string());
        self.triple(
            "STATS",
            "pairsCompleteness",
            &report.pairs_completeness.to_string(),
        );
        self.triple("STATS", "fMeasure", &report.f_measure.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

/// SPARQL string literals take no raw quotes or ampersands from us.
fn literal(value: &str) -> String {
    value.replace('&', "").replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::PairLabel;

    #[derive(Default)]
    struct RecordingEndpoint {
        updates: Vec<String>,
    }

    impl UpdateEndpoint for RecordingEndpoint {
        fn execute(&mut self, update: &str) -> Result<()> {
            self.updates.push(update.to_owned());
            Ok(())
        }
    }

    fn row() -> ClassifiedRow {
        ClassifiedRow {
            url1: "u1".into(),
            url2: "u2".into(),
            label: PairLabel::FalsePositive,
            profile1: "p1".into(),
            profile2: "p2".into(),
        }
    }

    #[test]
    fn nothing_is_sent_before_the_batch_boundary() {
        let mut sink = SparqlSink::new(RecordingEndpoint::default(), "http://g/1");
        for _ in 0..SINK_BATCH_SIZE - 1 {
            sink.write_row(&row()).unwrap();
        }
        assert!(sink.endpoint.updates.is_empty());
        sink.write_row(&row()).unwrap();
        assert_eq!(sink.endpoint.updates.len(), 1);
    }

    #[test]
    fn finish_flushes_the_partial_batch() {
        let mut sink = SparqlSink::new(RecordingEndpoint::default(), "http://g/1");
        sink.write_row(&row()).unwrap();
        sink.finish().unwrap();
        let endpoint = sink.into_inner();
        assert_eq!(endpoint.updates.len(), 1);
        assert!(endpoint.updates[0].starts_with("INSERT DATA { GRAPH <http://g/1> {"));
        assert!(endpoint.updates[0].contains("<record/1> <pairType> \"FP\" ."));
    }

    #[test]
    fn finish_with_nothing_pending_sends_nothing() {
        let mut sink = SparqlSink::new(RecordingEndpoint::default(), "http://g/1");
        sink.finish().unwrap();
        assert!(sink.endpoint.updates.is_empty());
    }
}
