//! ShelfScout Intent Extractor
//!
//! Turns a free-text shopping query into keywords, semantic filters and a
//! clean keyword query using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Query → PromptBuilder → LlmProvider → parser → IntentExtraction
//! ```
//!
//! Model output is parsed tolerantly: markdown fences and surrounding prose
//! are stripped, a missing confidence falls back to a configured default, and
//! the filter map accepts the usual model sloppiness (see
//! `shelfscout_domain::SemanticFilters`). Anything that still cannot be read
//! is an [`ExtractionError`]; the extractor never invents a fallback intent.
//!
//! # Example Usage
//!
//! ```
//! use shelfscout_extractor::{ExtractorConfig, LlmIntentExtractor};
//! use shelfscout_domain::traits::IntentExtractor;
//! use shelfscout_llm::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let llm = MockProvider::new(
//!     r#"{"keywords": ["blue", "shirts"], "filters": {"colors": ["blue"]}, "cleanQuery": "blue shirts"}"#,
//! );
//! let extractor = LlmIntentExtractor::new(llm, ExtractorConfig::default()).unwrap();
//!
//! let intent = extractor.extract("i am looking for blue shirts").await.unwrap();
//! assert_eq!(intent.clean_query, "blue shirts");
//! assert_eq!(intent.confidence, 0.8);
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractionError;
pub use extractor::LlmIntentExtractor;
pub use parser::parse_intent_response;
pub use prompt::PromptBuilder;
