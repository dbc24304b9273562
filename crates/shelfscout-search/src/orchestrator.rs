//! Two-phase search
//!
//! Phase one (discovery) runs a small unfiltered search on a broad query and
//! reads the filter capabilities the endpoint advertises for it. Phase two
//! (targeted) adapts the item's semantic filters against exactly that
//! advertisement and searches again. Capabilities differ between queries,
//! so the catalog from one item is never reused for another.
//!
//! The orchestrator is an explicit state machine:
//!
//! ```text
//! Discovery --ok--> Targeted --ok--> Done
//!     |                 |
//!     +--err--> Failed <+
//! ```
//!
//! A discovery failure ends the item without a targeted call. A targeted
//! failure keeps the discovery query, the catalog and the filters that were
//! attempted.

use crate::adapter::{DroppedAttribute, FilterAdapter};
use crate::catalog::AvailableFilterCatalog;
use crate::config::SearchConfig;
use shelfscout_domain::traits::CatalogSearch;
use shelfscout_domain::{ConcreteFilter, FailureKind, IntentExtraction, SearchRequest, SearchResponse};
use std::fmt;
use tracing::{debug, info, warn};

/// Where the state machine stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Discovery call pending
    Discovery,
    /// Targeted call pending
    Targeted,
    /// Both calls succeeded
    Done,
    /// A call failed
    Failed,
}

/// Why a two-phase search stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationFailure {
    /// Discovery call failed
    Discovery(String),
    /// Targeted call failed
    TargetedSearch(String),
}

impl OrchestrationFailure {
    /// Failure kind for records and metrics
    pub fn kind(&self) -> FailureKind {
        match self {
            OrchestrationFailure::Discovery(_) => FailureKind::Discovery,
            OrchestrationFailure::TargetedSearch(_) => FailureKind::TargetedSearch,
        }
    }

    /// Underlying search error message
    pub fn message(&self) -> &str {
        match self {
            OrchestrationFailure::Discovery(msg) | OrchestrationFailure::TargetedSearch(msg) => msg,
        }
    }
}

impl fmt::Display for OrchestrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestrationFailure::Discovery(msg) => write!(f, "discovery search failed: {}", msg),
            OrchestrationFailure::TargetedSearch(msg) => write!(f, "targeted search failed: {}", msg),
        }
    }
}

impl std::error::Error for OrchestrationFailure {}

/// Everything a two-phase search produced, including partial artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationOutcome {
    /// Terminal phase: `Done` or `Failed`
    pub phase: SearchPhase,
    /// Query sent with the discovery call
    pub discovery_query: String,
    /// Capabilities read from the discovery response
    pub catalog: Option<AvailableFilterCatalog>,
    /// Semantic attributes the adapter could not express
    pub dropped: Vec<DroppedAttribute>,
    /// Concrete filters sent with the targeted call
    pub filters_used: Vec<ConcreteFilter>,
    /// Query sent with the targeted call
    pub targeted_query: Option<String>,
    /// Raw targeted response
    pub response: Option<SearchResponse>,
    /// Failure, when `phase` is `Failed`
    pub failure: Option<OrchestrationFailure>,
}

impl OrchestrationOutcome {
    fn start(discovery_query: String) -> Self {
        Self {
            phase: SearchPhase::Discovery,
            discovery_query,
            catalog: None,
            dropped: Vec::new(),
            filters_used: Vec::new(),
            targeted_query: None,
            response: None,
            failure: None,
        }
    }

    /// Whether both calls succeeded
    pub fn is_done(&self) -> bool {
        self.phase == SearchPhase::Done
    }

    /// Failure kind, if any
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(OrchestrationFailure::kind)
    }
}

/// Drives discovery then targeted search for one item at a time
pub struct SearchOrchestrator<S: CatalogSearch> {
    search: S,
    config: SearchConfig,
}

impl<S: CatalogSearch> SearchOrchestrator<S> {
    /// Create an orchestrator over a catalog search backend
    pub fn new(search: S, config: SearchConfig) -> Self {
        Self { search, config }
    }

    /// Access the configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Access the search backend
    pub fn backend(&self) -> &S {
        &self.search
    }

    /// Discovery query: product type, else first keyword, else the fallback term
    pub fn discovery_query(&self, intent: &IntentExtraction) -> String {
        let product_type = intent
            .filters
            .product_type
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(product_type) = product_type {
            return product_type.to_string();
        }
        if let Some(keyword) = intent.first_keyword() {
            return keyword.to_string();
        }
        warn!(
            fallback = %self.config.fallback_query,
            "Intent has no product type or keyword; using fallback discovery query"
        );
        self.config.fallback_query.clone()
    }

    /// Targeted query: clean query, else all keywords, else the discovery query
    pub fn targeted_query(intent: &IntentExtraction, discovery_query: &str) -> String {
        let clean = intent.clean_query.trim();
        if !clean.is_empty() {
            return clean.to_string();
        }
        let joined = intent.joined_keywords();
        if !joined.trim().is_empty() {
            return joined;
        }
        discovery_query.to_string()
    }

    /// Run both phases for one item
    ///
    /// Never returns an error: failures are carried in the outcome together
    /// with whatever was produced before them.
    pub async fn run(&self, input_text: &str, intent: &IntentExtraction) -> OrchestrationOutcome {
        let context = self.config.context_for(input_text);
        let mut outcome = OrchestrationOutcome::start(self.discovery_query(intent));

        loop {
            match outcome.phase {
                SearchPhase::Discovery => {
                    let request = SearchRequest::new(
                        outcome.discovery_query.as_str(),
                        context.as_str(),
                        self.config.discovery_limit,
                    );
                    debug!(query = %request.query, "Discovery search");

                    match self.search.search(&request).await {
                        Ok(response) => {
                            let catalog = AvailableFilterCatalog::from_response(response.body());
                            let adaptation = FilterAdapter::adapt_with_report(&intent.filters, &catalog);
                            for dropped in &adaptation.dropped {
                                debug!(%dropped, "Semantic filter not applied");
                            }
                            debug!(
                                capabilities = catalog.capability_count(),
                                filters = adaptation.filters.len(),
                                "Discovery complete"
                            );
                            outcome.catalog = Some(catalog);
                            outcome.filters_used = adaptation.filters;
                            outcome.dropped = adaptation.dropped;
                            outcome.phase = SearchPhase::Targeted;
                        }
                        Err(e) => {
                            warn!(query = %outcome.discovery_query, "Discovery search failed: {}", e);
                            outcome.failure = Some(OrchestrationFailure::Discovery(e.to_string()));
                            outcome.phase = SearchPhase::Failed;
                        }
                    }
                }
                SearchPhase::Targeted => {
                    let query = Self::targeted_query(intent, &outcome.discovery_query);
                    let request = SearchRequest::new(query.as_str(), context.as_str(), self.config.targeted_limit)
                        .with_filters(outcome.filters_used.clone());
                    outcome.targeted_query = Some(query);
                    debug!(query = %request.query, filters = request.filters.len(), "Targeted search");

                    match self.search.search(&request).await {
                        Ok(response) => {
                            info!(
                                products = response.product_count(),
                                filters = outcome.filters_used.len(),
                                "Targeted search complete"
                            );
                            outcome.response = Some(response);
                            outcome.phase = SearchPhase::Done;
                        }
                        Err(e) => {
                            warn!(query = %request.query, "Targeted search failed: {}", e);
                            outcome.failure = Some(OrchestrationFailure::TargetedSearch(e.to_string()));
                            outcome.phase = SearchPhase::Failed;
                        }
                    }
                }
                SearchPhase::Done | SearchPhase::Failed => return outcome,
            }
        }
    }
}
