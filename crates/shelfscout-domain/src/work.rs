//! Batch work items and the per-item persistence record

use crate::concrete::ConcreteFilter;
use crate::intent::IntentExtraction;
use crate::reduced::{ReducedSearchResult, ReductionMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of batch input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Position of the item in its source (1-based)
    pub row_number: usize,

    /// Free-text search intent
    pub input_text: String,

    /// Output recorded by an earlier run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_output: Option<String>,
}

impl WorkItem {
    /// Create a fresh item with no prior output
    pub fn new(row_number: usize, input_text: impl Into<String>) -> Self {
        Self {
            row_number,
            input_text: input_text.into(),
            prior_output: None,
        }
    }

    /// Attach output from an earlier run
    pub fn with_prior_output(mut self, output: impl Into<String>) -> Self {
        self.prior_output = Some(output.into());
        self
    }

    /// An item is done once it carries non-blank prior output
    pub fn is_processed(&self) -> bool {
        self.prior_output
            .as_deref()
            .is_some_and(|o| !o.trim().is_empty())
    }

    /// Whether there is any input to process
    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }
}

/// Final outcome of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Pipeline completed
    Success,
    /// Pipeline stopped at a failing stage
    Failed,
}

/// Stage at which an item failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Intent extractor unavailable or returned garbage
    Extraction,
    /// Phase-one search failed; no targeted call was made
    Discovery,
    /// Phase-two search failed; discovery artifacts are still reported
    TargetedSearch,
    /// Raw result could not be reduced
    Reduction,
}

impl FailureKind {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Extraction => "extraction",
            FailureKind::Discovery => "discovery",
            FailureKind::TargetedSearch => "targeted_search",
            FailureKind::Reduction => "reduction",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted outcome of one work item
///
/// Failed records still carry every artifact produced before the failure, so
/// a reader can tell which filters were attempted against which catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Source position of the item
    pub row_number: usize,

    /// Original input text
    pub input_text: String,

    /// Final status
    pub status: ItemStatus,

    /// Failing stage, when failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    /// Human-readable failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Raw intent extraction output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentExtraction>,

    /// Query used for the discovery call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_query: Option<String>,

    /// Capabilities advertised by the discovery response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_filters: Vec<String>,

    /// Query used for the targeted call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted_query: Option<String>,

    /// Concrete filters actually sent with the targeted call
    #[serde(default)]
    pub filters_used: Vec<ConcreteFilter>,

    /// Reduced targeted result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ReducedSearchResult>,

    /// Size accounting of the reduction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction: Option<ReductionMetrics>,

    /// Wall time spent on the item
    pub processing_time_ms: u64,
}

impl ItemRecord {
    /// Start a record for an item; status is failed until marked otherwise
    pub fn for_item(item: &WorkItem) -> Self {
        Self {
            row_number: item.row_number,
            input_text: item.input_text.clone(),
            status: ItemStatus::Failed,
            failure: None,
            error_message: None,
            intent: None,
            discovery_query: None,
            available_filters: Vec::new(),
            targeted_query: None,
            filters_used: Vec::new(),
            result: None,
            reduction: None,
            processing_time_ms: 0,
        }
    }

    /// Whether the item succeeded
    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }

    /// Number of products in the reduced result
    pub fn product_count(&self) -> usize {
        self.result.as_ref().map_or(0, ReducedSearchResult::product_count)
    }
}
