//! Batching and file-output behavior of the result sinks.

use riddle::eval::BlockingReport;
use riddle::sink::{
    ClassifiedRow, CsvSink, DbConfig, PairLabel, ResultSink, SparqlSink, SqlExecutor, SqlSink,
    UpdateEndpoint, SINK_BATCH_SIZE,
};
use riddle::{Block, BlockingEvaluator, ComparisonPropagation, DuplicatePropagation, EntityProfile};
use riddle::{DuplicatePair, Result};
use std::io::Read;

fn row(i: usize) -> ClassifiedRow {
    ClassifiedRow {
        url1: format!("http://d1/{i}"),
        url2: format!("http://d2/{i}"),
        label: PairLabel::FalsePositive,
        profile1: "p1".into(),
        profile2: "p2".into(),
    }
}

#[derive(Default)]
struct CountingEndpoint {
    batch_rows: Vec<usize>,
}

impl UpdateEndpoint for CountingEndpoint {
    fn execute(&mut self, update: &str) -> Result<()> {
        self.batch_rows.push(update.matches("<pairType>").count());
        Ok(())
    }
}

#[derive(Default)]
struct CountingExecutor {
    batch_rows: Vec<usize>,
}

impl SqlExecutor for CountingExecutor {
    fn execute(&mut self, statement: &str) -> Result<()> {
        self.batch_rows.push(statement.matches("('").count());
        Ok(())
    }
}

/// 2500 rows against the batch boundary of 1000 flush exactly three
/// times: 1000, 1000, then the 500-row remainder on finish.
#[test]
fn sparql_sink_flushes_at_the_batch_boundary() {
    assert_eq!(SINK_BATCH_SIZE, 1000);
    let mut sink = SparqlSink::new(CountingEndpoint::default(), "http://g/eval");
    for i in 0..2500 {
        sink.write_row(&row(i)).unwrap();
    }
    sink.finish().unwrap();
    let endpoint = sink.into_inner();
    assert_eq!(endpoint.batch_rows, vec![1000, 1000, 500]);
}

#[test]
fn sql_sink_flushes_at_the_batch_boundary() {
    let config = DbConfig::new("postgresql://db/er")
        .with_user("u")
        .with_password("p")
        .with_table("results");
    let mut sink = SqlSink::connect(&config, CountingExecutor::default()).unwrap();
    for i in 0..2500 {
        sink.write_row(&row(i)).unwrap();
    }
    sink.finish().unwrap();
    let executor = sink.into_inner();
    assert_eq!(executor.batch_rows, vec![1000, 1000, 500]);
}

/// An exact multiple of the boundary leaves no partial batch behind.
#[test]
fn exact_multiple_needs_no_partial_flush() {
    let mut sink = SparqlSink::new(CountingEndpoint::default(), "http://g/eval");
    for i in 0..2000 {
        sink.write_row(&row(i)).unwrap();
    }
    sink.finish().unwrap();
    let endpoint = sink.into_inner();
    assert_eq!(endpoint.batch_rows, vec![1000, 1000]);
}

/// A full classification run lands in a CSV file on disk.
#[test]
fn classification_writes_a_csv_file() {
    let blocks = vec![Block::unilateral(vec![0, 1, 2])];
    let tracker = DuplicatePropagation::unilateral(vec![DuplicatePair::new(0, 1)]);
    let mut evaluator = BlockingEvaluator::new(&blocks, tracker);

    let profiles: Vec<EntityProfile> = (0..3)
        .map(|i| EntityProfile::new(format!("http://d1/{i}")))
        .collect();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut sink = CsvSink::new(&mut file);
        evaluator
            .classify(&profiles, None, &ComparisonPropagation::new(), &mut sink)
            .unwrap()
            .unwrap();
    }

    let mut text = String::new();
    file.reopen().unwrap().read_to_string(&mut text).unwrap();
    assert_eq!(text.matches(",TP,").count(), 1);
    assert_eq!(text.matches(",FP,").count(), 2);
    assert!(text.contains("Pairs Quality (Precision)"));
    assert!(text.contains("F-Measure"));
}

/// The metrics row the SQL sink appends is flushed with the final
/// partial batch.
#[test]
fn sql_metrics_row_rides_the_final_flush() {
    let config = DbConfig::new("mysql://db/er")
        .with_user("u")
        .with_password("p")
        .with_table("results");
    let mut sink = SqlSink::connect(&config, CountingExecutor::default()).unwrap();
    sink.write_row(&row(0)).unwrap();
    let report = sample_report();
    sink.write_metrics(&report).unwrap();
    sink.finish().unwrap();
    let executor = sink.into_inner();
    assert_eq!(executor.batch_rows, vec![2]);
}

fn sample_report() -> BlockingReport {
    use riddle::BlockKind;
    BlockingReport {
        kind: BlockKind::Unilateral,
        clean_clean: false,
        block_count: 1,
        aggregate_cardinality: 1,
        block_assignments: 2,
        d1_block_assignments: None,
        d2_block_assignments: None,
        entities_d1: 2,
        entities_d2: None,
        total_entities: Some(2),
        dataset_limit: None,
        detected_duplicates: 0,
        ground_truth_size: 0,
        pairs_completeness: 0.0,
        pairs_quality: 0.0,
        f_measure: 0.0,
    }
}
