//! Error types for the intent extractor

use thiserror::Error;

/// Errors that can occur during intent extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Query is empty after trimming
    #[error("Query is empty")]
    EmptyQuery,

    /// Query exceeds maximum length
    #[error("Query too long: {0} chars (max: {1})")]
    QueryTooLong(usize, usize),

    /// LLM call did not finish in time
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// Model output was not a usable extraction object
    #[error("Invalid extraction format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Confidence below the configured floor
    #[error("Confidence {0:.2} below minimum {1:.2}")]
    LowConfidence(f64, f64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractionError {
    fn from(e: serde_json::Error) -> Self {
        ExtractionError::JsonParse(e.to_string())
    }
}
