//! Metrics collection for batch runs

use serde::Serialize;
use shelfscout_domain::{FailureKind, ItemRecord};
use std::collections::BTreeMap;

/// Aggregate counters of one batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchMetrics {
    /// Items handed to the coordinator
    pub total_items: usize,

    /// Items that went through the pipeline
    pub processed: usize,

    /// Items that completed successfully (including degraded ones)
    pub succeeded: usize,

    /// Failed items per failing stage
    pub failures: BTreeMap<FailureKind, usize>,

    /// Items skipped as already processed or blank
    pub skipped: usize,

    /// Successful items whose result could not be reduced
    pub degraded: usize,

    /// Products across all reduced results
    pub products_found: usize,

    /// Sink writes that failed
    pub sink_errors: usize,

    /// Records lost to failed sink writes
    pub unsaved_records: usize,

    /// Processing time summed over processed items (milliseconds)
    pub total_time_ms: u64,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one finished record
    pub fn record_item(&mut self, record: &ItemRecord) {
        self.processed += 1;
        self.total_time_ms += record.processing_time_ms;

        if record.is_success() {
            self.succeeded += 1;
            self.products_found += record.product_count();
            if record.failure == Some(FailureKind::Reduction) {
                self.degraded += 1;
            }
        } else {
            let kind = record.failure.unwrap_or(FailureKind::Extraction);
            *self.failures.entry(kind).or_insert(0) += 1;
        }
    }

    /// Record a skipped item
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record a failed sink write of `records` records
    pub fn record_sink_error(&mut self, records: usize) {
        self.sink_errors += 1;
        self.unsaved_records += records;
    }

    /// Failed items across all stages
    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    /// Failed items for one stage
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// Share of processed items that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.processed as f64 * 100.0
    }

    /// Mean processing time per processed item (milliseconds)
    pub fn mean_time_ms(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.total_time_ms as f64 / self.processed as f64
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Items: {}", self.total_items),
            format!("Processed: {}", self.processed),
            format!("Skipped: {}", self.skipped),
            format!("Succeeded: {}", self.succeeded),
            format!("Failed: {}", self.failed()),
            format!("Success rate: {:.1}%", self.success_rate()),
            format!("Products found: {}", self.products_found),
            format!(
                "Processing time: {}ms total, {:.1}ms mean",
                self.total_time_ms,
                self.mean_time_ms()
            ),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failures by stage:".to_string());
            for (kind, count) in &self.failures {
                lines.push(format!("  {}: {}", kind, count));
            }
        }

        if self.degraded > 0 {
            lines.push(format!("Degraded (unreducible result): {}", self.degraded));
        }

        if self.sink_errors > 0 {
            lines.push(format!(
                "Sink errors: {} ({} records not saved)",
                self.sink_errors, self.unsaved_records
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfscout_domain::{ItemStatus, WorkItem};

    fn record(status: ItemStatus, failure: Option<FailureKind>, ms: u64) -> ItemRecord {
        let mut record = ItemRecord::for_item(&WorkItem::new(1, "shirts"));
        record.status = status;
        record.failure = failure;
        record.processing_time_ms = ms;
        record
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = BatchMetrics::new();
        assert_eq!(metrics.processed, 0);
        assert_eq!(metrics.failed(), 0);
        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.mean_time_ms(), 0.0);
    }

    #[test]
    fn test_record_items() {
        let mut metrics = BatchMetrics::new();
        metrics.record_item(&record(ItemStatus::Success, None, 100));
        metrics.record_item(&record(ItemStatus::Success, Some(FailureKind::Reduction), 50));
        metrics.record_item(&record(ItemStatus::Failed, Some(FailureKind::Discovery), 30));
        metrics.record_item(&record(ItemStatus::Failed, Some(FailureKind::Discovery), 20));
        metrics.record_skipped();

        assert_eq!(metrics.processed, 4);
        assert_eq!(metrics.succeeded, 2);
        assert_eq!(metrics.degraded, 1);
        assert_eq!(metrics.failures_of(FailureKind::Discovery), 2);
        assert_eq!(metrics.failures_of(FailureKind::Extraction), 0);
        assert_eq!(metrics.skipped, 1);
        assert_eq!(metrics.success_rate(), 50.0);
        assert_eq!(metrics.total_time_ms, 200);
        assert_eq!(metrics.mean_time_ms(), 50.0);
    }

    #[test]
    fn test_reset() {
        let mut metrics = BatchMetrics::new();
        metrics.record_item(&record(ItemStatus::Success, None, 10));
        metrics.record_sink_error(3);
        metrics.reset();
        assert_eq!(metrics, BatchMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = BatchMetrics::new();
        metrics.total_items = 3;
        metrics.record_item(&record(ItemStatus::Success, None, 100));
        metrics.record_item(&record(ItemStatus::Failed, Some(FailureKind::TargetedSearch), 100));
        metrics.record_skipped();
        metrics.record_sink_error(2);

        let summary = metrics.summary();
        assert!(summary.contains("Processed: 2"));
        assert!(summary.contains("Skipped: 1"));
        assert!(summary.contains("Success rate: 50.0%"));
        assert!(summary.contains("targeted_search: 1"));
        assert!(summary.contains("Sink errors: 1 (2 records not saved)"));
    }
}
