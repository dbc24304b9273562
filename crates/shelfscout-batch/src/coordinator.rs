//! Batch coordinator
//!
//! Drives a list of work items through the [`ItemPipeline`] one at a time.
//! A failing item never stops the batch: it becomes a failed record and the
//! coordinator moves on. Records are handed to the sink in chunks; a sink
//! error is logged and counted, and the run continues.

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::metrics::BatchMetrics;
use crate::pipeline::ItemPipeline;
use shelfscout_domain::traits::{CatalogSearch, IntentExtractor, RecordSink};
use shelfscout_domain::{ItemRecord, WorkItem};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Progress notification sent after each processed item
#[derive(Debug, Clone)]
pub struct Progress<'a> {
    /// Items processed so far in this run
    pub processed: usize,
    /// Items that will be processed in this run
    pub total: usize,
    /// The record just produced
    pub record: &'a ItemRecord,
}

/// Result of one batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Identifier of the run, also present in every log line of the run
    pub run_id: Uuid,
    /// Counters for the run
    pub metrics: BatchMetrics,
    /// Whether a shutdown signal cut the run short
    pub interrupted: bool,
}

type ProgressCallback = Box<dyn Fn(&Progress<'_>) + Send + Sync>;

/// Sequential batch driver
pub struct BatchCoordinator<E: IntentExtractor, S: CatalogSearch> {
    pipeline: ItemPipeline<E, S>,
    config: BatchConfig,
    on_progress: Option<ProgressCallback>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<E: IntentExtractor, S: CatalogSearch> BatchCoordinator<E, S> {
    /// Create a coordinator; fails on invalid configuration
    pub fn new(pipeline: ItemPipeline<E, S>, config: BatchConfig) -> Result<Self, BatchError> {
        config.validate().map_err(BatchError::Config)?;
        Ok(Self {
            pipeline,
            config,
            on_progress: None,
            shutdown: None,
        })
    }

    /// Call `callback` after every processed item
    pub fn with_progress(mut self, callback: impl Fn(&Progress<'_>) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Stop between items once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Access the configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Access the pipeline
    pub fn pipeline(&self) -> &ItemPipeline<E, S> {
        &self.pipeline
    }

    /// Process every item and write the records to `sink`
    pub async fn run<K>(&mut self, items: &[WorkItem], sink: &mut K) -> BatchReport
    where
        K: RecordSink,
    {
        let run_id = Uuid::now_v7();
        let mut metrics = BatchMetrics::new();
        metrics.total_items = items.len();

        let pending: Vec<&WorkItem> = items
            .iter()
            .filter(|item| {
                let skip = self.config.skip_processed && (item.is_processed() || !item.has_input());
                if skip {
                    debug!(%run_id, row = item.row_number, "Skipping item");
                    metrics.record_skipped();
                }
                !skip
            })
            .collect();

        info!(
            %run_id,
            total = items.len(),
            pending = pending.len(),
            skipped = metrics.skipped,
            "Batch started"
        );

        let total = pending.len();
        let mut buffer: Vec<ItemRecord> = Vec::with_capacity(self.config.flush_every.min(total));
        let mut interrupted = false;

        for (index, item) in pending.iter().enumerate() {
            if self.shutdown_requested() {
                warn!(%run_id, processed = index, total, "Shutdown requested, stopping batch");
                interrupted = true;
                break;
            }

            let record = self.pipeline.process(item).await;
            metrics.record_item(&record);

            if record.is_success() {
                info!(
                    %run_id,
                    row = record.row_number,
                    products = record.product_count(),
                    ms = record.processing_time_ms,
                    "[{}/{}] ok",
                    index + 1,
                    total
                );
            } else {
                warn!(
                    %run_id,
                    row = record.row_number,
                    failure = ?record.failure,
                    "[{}/{}] failed: {}",
                    index + 1,
                    total,
                    record.error_message.as_deref().unwrap_or("unknown error")
                );
            }

            if let Some(callback) = &self.on_progress {
                callback(&Progress {
                    processed: index + 1,
                    total,
                    record: &record,
                });
            }

            buffer.push(record);
            if buffer.len() >= self.config.flush_every {
                Self::flush(sink, &mut buffer, &mut metrics, run_id);
            }

            let is_last = index + 1 == total;
            if !is_last && self.pause().await {
                warn!(%run_id, processed = index + 1, total, "Shutdown requested, stopping batch");
                interrupted = true;
                break;
            }
        }

        Self::flush(sink, &mut buffer, &mut metrics, run_id);

        info!(%run_id, "Batch finished\n{}", metrics.summary());

        BatchReport {
            run_id,
            metrics,
            interrupted,
        }
    }

    fn flush<K: RecordSink>(
        sink: &mut K,
        buffer: &mut Vec<ItemRecord>,
        metrics: &mut BatchMetrics,
        run_id: Uuid,
    ) {
        if buffer.is_empty() {
            return;
        }
        match sink.write(buffer) {
            Ok(()) => debug!(%run_id, records = buffer.len(), "Flushed records"),
            Err(e) => {
                error!(%run_id, records = buffer.len(), "Sink write failed: {}", e);
                metrics.record_sink_error(buffer.len());
            }
        }
        buffer.clear();
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Sleep the inter-item delay; returns true if shutdown arrived meanwhile
    async fn pause(&mut self) -> bool {
        let delay = self.config.delay();
        if delay.is_zero() {
            return self.shutdown_requested();
        }
        match self.shutdown.as_mut() {
            Some(rx) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => *rx.borrow(),
                    Ok(()) = rx.changed() => *rx.borrow(),
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                false
            }
        }
    }
}
