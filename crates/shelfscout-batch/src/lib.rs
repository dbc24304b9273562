//! ShelfScout Batch Processing
//!
//! Runs a list of free-text search intents through extraction, two-phase
//! search and reduction, one item at a time, and persists one record per
//! item.
//!
//! # Overview
//!
//! - **Skip logic**: items that already carry output, or have blank input,
//!   are counted as skipped and never processed
//! - **Failure isolation**: every stage failure becomes a failed record; the
//!   batch always continues with the next item
//! - **Pacing**: a fixed delay separates processed items (none after the
//!   last one)
//! - **Chunked persistence**: records reach the [`RecordSink`] in chunks of
//!   `flush_every`; sink errors are logged and counted
//! - **Metrics**: success and per-stage failure counts, success rate and
//!   timing, rendered by [`BatchMetrics::summary`]
//!
//! # Usage
//!
//! ```no_run
//! use shelfscout_batch::{load_items, BatchConfig, BatchCoordinator, ItemPipeline, JsonLinesSink};
//! use shelfscout_extractor::{ExtractorConfig, LlmIntentExtractor};
//! use shelfscout_llm::OllamaProvider;
//! use shelfscout_search::{
//!     ClientConfig, McpCatalogClient, ReducerConfig, ResponseReducer, SearchConfig, SearchOrchestrator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = OllamaProvider::default_endpoint("llama3")?;
//!     let extractor = LlmIntentExtractor::new(llm, ExtractorConfig::default())?;
//!     let client = McpCatalogClient::new(ClientConfig::new("https://shop.example/api/mcp"))?;
//!     let pipeline = ItemPipeline::new(
//!         extractor,
//!         SearchOrchestrator::new(client, SearchConfig::default()),
//!         ResponseReducer::new(ReducerConfig::default()),
//!     );
//!
//!     let items = load_items("queries.txt")?;
//!     let mut sink = JsonLinesSink::create("results.jsonl")?;
//!     let mut coordinator = BatchCoordinator::new(pipeline, BatchConfig::default())?;
//!
//!     let report = coordinator.run(&items, &mut sink).await;
//!     println!("{}", report.metrics.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [batch]
//! skip_processed = true
//! delay_between_items_ms = 1000
//! flush_every = 50
//! ```
//!
//! [`RecordSink`]: shelfscout_domain::traits::RecordSink

#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod metrics;
mod pipeline;
mod sink;
mod source;

pub use config::BatchConfig;
pub use coordinator::{BatchCoordinator, BatchReport, Progress};
pub use error::{BatchError, PipelineError};
pub use metrics::BatchMetrics;
pub use pipeline::ItemPipeline;
pub use sink::{JsonLinesSink, MemorySink};
pub use source::{load_items, parse_items, SourceFormat};
