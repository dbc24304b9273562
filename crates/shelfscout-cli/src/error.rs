//! Error types for the CLI application.

use shelfscout_batch::BatchError;
use shelfscout_extractor::ExtractionError;
use shelfscout_llm::LlmError;
use shelfscout_search::SearchError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider could not be set up or called
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Intent extraction failed
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Catalog client error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Batch input, output or configuration error
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// A single query ran through the pipeline and failed
    #[error("Query failed at {stage}: {message}")]
    ItemFailed {
        /// Failing stage
        stage: String,
        /// Failure message from the record
        message: String,
    },

    /// One or more connectivity checks failed
    #[error("{failed} of {total} checks failed")]
    CheckFailed {
        /// Checks that failed
        failed: usize,
        /// Checks run
        total: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
