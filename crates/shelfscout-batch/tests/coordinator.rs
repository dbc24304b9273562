//! Batch runs over a mock LLM and a scripted catalog

use serde_json::json;
use shelfscout_batch::{
    BatchConfig, BatchCoordinator, BatchError, ItemPipeline, JsonLinesSink, MemorySink,
};
use shelfscout_domain::traits::RecordSink;
use shelfscout_domain::{FailureKind, ItemRecord, ItemStatus, WorkItem};
use shelfscout_extractor::{ExtractorConfig, LlmIntentExtractor};
use shelfscout_llm::MockProvider;
use shelfscout_search::{
    MockCatalog, ReducerConfig, ResponseReducer, SearchConfig, SearchError, SearchOrchestrator,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;

type Pipeline = ItemPipeline<LlmIntentExtractor<MockProvider>, MockCatalog>;

fn pipeline(llm: MockProvider, catalog: &MockCatalog) -> Pipeline {
    ItemPipeline::new(
        LlmIntentExtractor::new(llm, ExtractorConfig::default()).unwrap(),
        SearchOrchestrator::new(catalog.clone(), SearchConfig::default()),
        ResponseReducer::new(ReducerConfig::default()),
    )
}

fn fast(flush_every: usize) -> BatchConfig {
    BatchConfig {
        delay_between_items_ms: 0,
        flush_every,
        ..BatchConfig::default()
    }
}

fn hoodie_llm() -> MockProvider {
    let mut llm = MockProvider::new("I cannot help with that");
    llm.add_response(
        "green hoodies",
        r#"{"keywords": ["green", "hoodies"], "filters": {"colors": ["green"], "productType": "hoodies"}, "cleanQuery": "green hoodies"}"#,
    );
    llm.add_response(
        "wool socks",
        r#"{"keywords": ["wool", "socks"], "filters": {"materials": ["wool"]}, "cleanQuery": "wool socks"}"#,
    );
    llm
}

fn hoodie_discovery() -> serde_json::Value {
    json!({
        "products": [],
        "available_filters": [
            {"label": "Type", "values": {"input_options": [{"input": "{\"productType\":\"Hoodies\"}"}]}},
            {"label": "Color", "values": {"input_options": [
                {"input": "{\"variantOption\":{\"name\":\"Color\",\"value\":\"Green\"}}"}
            ]}}
        ]
    })
}

#[tokio::test]
async fn test_mixed_batch_isolates_failures() {
    let catalog = MockCatalog::new();
    catalog
        .push_response(hoodie_discovery())
        .push_response(json!({"products": [
            {"id": "h1", "title": "Forest Hoodie", "price_range": {"min": "49.00", "max": "59.00", "currency": "USD"}}
        ]}))
        .push_error(SearchError::Timeout(30));

    let items = vec![
        WorkItem::new(1, "i want green hoodies"),
        WorkItem::new(2, "   "),
        WorkItem::new(3, "red scarves").with_prior_output("{\"done\": true}"),
        WorkItem::new(4, "xyzzy"),
        WorkItem::new(5, "warm wool socks"),
    ];

    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), fast(2)).unwrap();
    let mut sink = MemorySink::new();
    let report = coordinator.run(&items, &mut sink).await;

    let metrics = &report.metrics;
    assert_eq!(metrics.total_items, 5);
    assert_eq!(metrics.skipped, 2);
    assert_eq!(metrics.processed, 3);
    assert_eq!(metrics.succeeded, 1);
    assert_eq!(metrics.failures_of(FailureKind::Extraction), 1);
    assert_eq!(metrics.failures_of(FailureKind::Discovery), 1);
    assert_eq!(metrics.products_found, 1);
    assert!(!report.interrupted);

    assert_eq!(sink.write_count(), 2);
    let records = sink.records();
    let rows: Vec<_> = records.iter().map(|r| r.row_number).collect();
    assert_eq!(rows, [1, 4, 5]);

    let hoodie = &records[0];
    assert_eq!(hoodie.status, ItemStatus::Success);
    assert_eq!(hoodie.filters_used.len(), 2);
    let product = &hoodie.result.as_ref().unwrap().products[0];
    assert_eq!(product.price_min, Some(49.0));
    assert_eq!(product.currency.as_deref(), Some("USD"));

    let socks = &records[2];
    assert_eq!(socks.failure, Some(FailureKind::Discovery));
    assert!(socks.error_message.as_deref().unwrap().contains("discovery"));
    assert!(socks.intent.is_some());
    assert!(socks.targeted_query.is_none());

    // two calls for the hoodie, one discovery call for the socks
    assert_eq!(catalog.call_count(), 3);
}

#[tokio::test]
async fn test_blank_items_processed_when_skip_disabled() {
    let catalog = MockCatalog::new();
    let config = BatchConfig {
        skip_processed: false,
        ..fast(10)
    };
    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), config).unwrap();
    let mut sink = MemorySink::new();

    let report = coordinator.run(&[WorkItem::new(1, "")], &mut sink).await;

    assert_eq!(report.metrics.skipped, 0);
    assert_eq!(report.metrics.failures_of(FailureKind::Extraction), 1);
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_delay_only_between_items() {
    let catalog = MockCatalog::new().with_fallback(json!({"products": []}));
    let config = BatchConfig {
        delay_between_items_ms: 1000,
        ..BatchConfig::default()
    };
    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), config).unwrap();
    let items: Vec<_> = (1..=3).map(|row| WorkItem::new(row, "green hoodies")).collect();

    let started = tokio::time::Instant::now();
    let report = coordinator.run(&items, &mut MemorySink::new()).await;

    assert_eq!(report.metrics.succeeded, 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(2000), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(3000), "elapsed {:?}", elapsed);
}

struct BrokenSink {
    attempts: usize,
}

impl RecordSink for BrokenSink {
    type Error = BatchError;

    fn write(&mut self, _records: &[ItemRecord]) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err(BatchError::Sink("disk full".into()))
    }
}

#[tokio::test]
async fn test_sink_errors_do_not_abort() {
    let catalog = MockCatalog::new().with_fallback(json!({"products": []}));
    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), fast(2)).unwrap();
    let items: Vec<_> = (1..=5).map(|row| WorkItem::new(row, "green hoodies")).collect();
    let mut sink = BrokenSink { attempts: 0 };

    let report = coordinator.run(&items, &mut sink).await;

    assert_eq!(report.metrics.processed, 5);
    assert_eq!(sink.attempts, 3);
    assert_eq!(report.metrics.sink_errors, 3);
    assert_eq!(report.metrics.unsaved_records, 5);
}

#[tokio::test]
async fn test_shutdown_stops_between_items() {
    let catalog = MockCatalog::new().with_fallback(json!({"products": []}));
    let (tx, rx) = watch::channel(false);
    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), fast(10))
        .unwrap()
        .with_shutdown(rx)
        .with_progress(move |progress| {
            if progress.processed == 2 {
                let _ = tx.send(true);
            }
        });
    let items: Vec<_> = (1..=5).map(|row| WorkItem::new(row, "green hoodies")).collect();
    let mut sink = MemorySink::new();

    let report = coordinator.run(&items, &mut sink).await;

    assert!(report.interrupted);
    assert_eq!(report.metrics.processed, 2);
    assert_eq!(sink.records().len(), 2);
}

#[tokio::test]
async fn test_records_persist_as_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.jsonl");
    let catalog = MockCatalog::new().with_fallback(json!({"products": [{"id": "1", "title": "Hoodie"}]}));
    let mut coordinator = BatchCoordinator::new(pipeline(hoodie_llm(), &catalog), fast(1)).unwrap();
    let mut sink = JsonLinesSink::create(&path).unwrap();

    coordinator
        .run(&[WorkItem::new(1, "green hoodies"), WorkItem::new(2, "xyzzy")], &mut sink)
        .await;
    drop(sink);

    let lines: Vec<ItemRecord> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].is_success());
    assert_eq!(lines[1].failure, Some(FailureKind::Extraction));
}
