//! Per-item pipeline: extract → two-phase search → reduce

use crate::error::PipelineError;
use shelfscout_domain::traits::{CatalogSearch, IntentExtractor};
use shelfscout_domain::{ItemRecord, ItemStatus, ReducedSearchResult, WorkItem};
use shelfscout_search::{OrchestrationFailure, ResponseReducer, SearchOrchestrator};
use std::time::Instant;
use tracing::{debug, warn};

/// Runs one work item through every stage and records the outcome
pub struct ItemPipeline<E: IntentExtractor, S: CatalogSearch> {
    extractor: E,
    orchestrator: SearchOrchestrator<S>,
    reducer: ResponseReducer,
}

impl<E: IntentExtractor, S: CatalogSearch> ItemPipeline<E, S> {
    /// Assemble a pipeline from its stages
    pub fn new(extractor: E, orchestrator: SearchOrchestrator<S>, reducer: ResponseReducer) -> Self {
        Self {
            extractor,
            orchestrator,
            reducer,
        }
    }

    /// Access the intent extractor
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Access the search orchestrator
    pub fn orchestrator(&self) -> &SearchOrchestrator<S> {
        &self.orchestrator
    }

    /// Process a single free-text query as row 1
    pub async fn process_query(&self, query: &str) -> ItemRecord {
        self.process(&WorkItem::new(1, query)).await
    }

    /// Process one item
    ///
    /// Never fails: stage errors are written into the record together with
    /// every artifact produced before them.
    pub async fn process(&self, item: &WorkItem) -> ItemRecord {
        let started = Instant::now();
        let mut record = ItemRecord::for_item(item);

        match self.execute(item, &mut record).await {
            Ok(()) => record.status = ItemStatus::Success,
            Err(err) => {
                record.status = if err.is_fatal() {
                    ItemStatus::Failed
                } else {
                    ItemStatus::Success
                };
                record.failure = Some(err.kind());
                record.error_message = Some(err.to_string());
            }
        }

        record.processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        record
    }

    async fn execute(&self, item: &WorkItem, record: &mut ItemRecord) -> Result<(), PipelineError> {
        let intent = self
            .extractor
            .extract(&item.input_text)
            .await
            .map_err(|e| PipelineError::ExtractionFailure(e.to_string()))?;
        debug!(
            row = item.row_number,
            keywords = ?intent.keywords,
            filters = ?intent.filters.attribute_names(),
            "Intent extracted"
        );
        record.intent = Some(intent.clone());

        let outcome = self.orchestrator.run(&item.input_text, &intent).await;
        record.discovery_query = Some(outcome.discovery_query.clone());
        if let Some(catalog) = &outcome.catalog {
            record.available_filters = catalog.capabilities();
        }
        record.filters_used = outcome.filters_used.clone();
        record.targeted_query = outcome.targeted_query.clone();

        if let Some(failure) = outcome.failure {
            let message = failure.message().to_string();
            return Err(match failure {
                OrchestrationFailure::Discovery(_) => PipelineError::DiscoveryFailure(message),
                OrchestrationFailure::TargetedSearch(_) => PipelineError::TargetedSearchFailure(message),
            });
        }

        let Some(response) = outcome.response else {
            return Err(PipelineError::TargetedSearchFailure(
                "no response from targeted search".to_string(),
            ));
        };

        match self.reducer.try_reduce(response.body()) {
            Ok(reduction) => {
                record.result = Some(reduction.result);
                record.reduction = Some(reduction.metrics);
                Ok(())
            }
            Err(e) => {
                warn!(row = item.row_number, "Reduction failed, storing empty result: {}", e);
                record.result = Some(ReducedSearchResult::empty());
                Err(PipelineError::ReductionFailure(e.to_string()))
            }
        }
    }
}
