//! ShelfScout Domain Layer
//!
//! This crate contains the data model shared by every other ShelfScout crate.
//! It has no I/O and no infrastructure dependencies beyond `serde`; it defines
//! the value types that flow through the search pipeline and the trait
//! interfaces that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Semantic filter**: a user-intent attribute (color, material, price
//!   ceiling) before any backend-specific translation
//! - **Concrete filter**: a backend-shaped filter value, one of exactly six
//!   kinds the catalog endpoint understands
//! - **Intent extraction**: keywords + semantic filters + clean query, as
//!   produced by the (external) intent extractor
//! - **Work item / item record**: one unit of batch input and the persisted
//!   outcome for it
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Network clients, LLM providers and sinks live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod concrete;
pub mod filters;
pub mod intent;
pub mod reduced;
pub mod search;
pub mod traits;
pub mod work;

// Re-exports for convenience
pub use concrete::{ConcreteFilter, PriceFilter, ProductMetafield, VariantOption};
pub use filters::{PriceRange, SemanticFilters};
pub use intent::IntentExtraction;
pub use reduced::{ReducedProduct, ReducedSearchResult, ReductionMetrics};
pub use search::{SearchRequest, SearchResponse};
pub use work::{FailureKind, ItemRecord, ItemStatus, WorkItem};
