//! ShelfScout Search Core
//!
//! Two-phase catalog search against a JSON-RPC `search_shop_catalog` tool.
//!
//! # Architecture
//!
//! ```text
//!                   ┌──────────────────────────────┐
//! IntentExtraction ─▶│ SearchOrchestrator           │
//!                   │  1. discovery (unfiltered)   │──▶ AvailableFilterCatalog
//!                   │  2. FilterAdapter            │◀── (per item, never shared)
//!                   │  3. targeted (filtered)      │
//!                   └──────────────┬───────────────┘
//!                                  ▼
//!                           ResponseReducer ──▶ ReducedSearchResult
//! ```
//!
//! The endpoint rejects filter kinds it did not advertise, so semantic
//! filters are only ever adapted against the capabilities read from the
//! discovery response for the same item. Attributes without a supported
//! concrete kind are dropped and reported, never guessed.
//!
//! # Example Usage
//!
//! ```
//! use serde_json::json;
//! use shelfscout_domain::{IntentExtraction, SemanticFilters};
//! use shelfscout_search::{MockCatalog, SearchConfig, SearchOrchestrator};
//!
//! # tokio_test::block_on(async {
//! let catalog = MockCatalog::new();
//! catalog.push_response(json!({
//!     "products": [],
//!     "available_filters": [{"label": "Color", "values": {"input_options": [
//!         {"input": "{\"variantOption\":{\"name\":\"Color\",\"value\":\"Blue\"}}"}
//!     ]}}]
//! }));
//! catalog.push_response(json!({"products": [{"id": "1", "title": "Oxford Shirt"}]}));
//!
//! let intent = IntentExtraction {
//!     keywords: vec!["shirts".into()],
//!     filters: SemanticFilters { colors: vec!["blue".into()], ..Default::default() },
//!     clean_query: "blue shirts".into(),
//!     ..Default::default()
//! };
//!
//! let orchestrator = SearchOrchestrator::new(catalog, SearchConfig::default());
//! let outcome = orchestrator.run("blue shirts please", &intent).await;
//! assert!(outcome.is_done());
//! assert_eq!(outcome.filters_used.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]

mod adapter;
mod catalog;
mod client;
mod config;
mod error;
mod mock;
mod orchestrator;
pub mod protocol;
mod reducer;

pub use adapter::{
    title_case, Adaptation, DropReason, DroppedAttribute, FilterAdapter, COLOR_OPTION, MATERIAL_KEY,
    SIZE_OPTION,
};
pub use catalog::{AvailableFilterCatalog, MetafieldKey};
pub use client::{interpret_reply, McpCatalogClient};
pub use config::{ClientConfig, ReducerConfig, SearchConfig, DEFAULT_ENDPOINT, DEFAULT_TOOL_NAME};
pub use error::SearchError;
pub use mock::MockCatalog;
pub use orchestrator::{OrchestrationFailure, OrchestrationOutcome, SearchOrchestrator, SearchPhase};
pub use reducer::{Reduction, ResponseReducer, SIZE_ORDER};
