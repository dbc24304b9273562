//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the search core and
//! infrastructure. Implementations live in other crates.

use crate::intent::IntentExtraction;
use crate::search::{SearchRequest, SearchResponse};
use crate::work::ItemRecord;
use async_trait::async_trait;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (shelfscout-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Model identifier, for provenance in records and logs
    fn model_name(&self) -> &str;
}

/// Trait for turning free text into keywords and semantic filters
///
/// Implemented by the application layer (shelfscout-extractor)
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Error type for extraction operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract search intent from a free-text query
    async fn extract(&self, query: &str) -> Result<IntentExtraction, Self::Error>;
}

/// Trait for the third-party catalog search endpoint
///
/// Implemented by the infrastructure layer (shelfscout-search)
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Error type for search calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one search call
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Self::Error>;
}

/// Trait for persisting per-item records
///
/// Implemented by the batch layer (shelfscout-batch)
pub trait RecordSink {
    /// Error type for sink writes
    type Error: std::error::Error;

    /// Append a chunk of records
    fn write(&mut self, records: &[ItemRecord]) -> Result<(), Self::Error>;
}
