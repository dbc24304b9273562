//! Error types for batch operations

use shelfscout_domain::FailureKind;
use thiserror::Error;

/// Errors raised by sources, sinks and batch configuration
#[derive(Error, Debug)]
pub enum BatchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Work items could not be loaded
    #[error("Source error: {0}")]
    Source(String),

    /// Records could not be written
    #[error("Sink error: {0}")]
    Sink(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        BatchError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        BatchError::Source(format!("JSON error: {}", err))
    }
}

/// Stage failure of a single item
///
/// Never escapes the coordinator: every variant is turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Intent extractor unavailable or returned garbage
    #[error("intent extraction failed: {0}")]
    ExtractionFailure(String),

    /// Discovery call failed; no targeted call was made
    #[error("discovery search failed: {0}")]
    DiscoveryFailure(String),

    /// Targeted call failed
    #[error("targeted search failed: {0}")]
    TargetedSearchFailure(String),

    /// Targeted result could not be reduced
    #[error("response reduction failed: {0}")]
    ReductionFailure(String),
}

impl PipelineError {
    /// Failure kind recorded for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::ExtractionFailure(_) => FailureKind::Extraction,
            PipelineError::DiscoveryFailure(_) => FailureKind::Discovery,
            PipelineError::TargetedSearchFailure(_) => FailureKind::TargetedSearch,
            PipelineError::ReductionFailure(_) => FailureKind::Reduction,
        }
    }

    /// Whether the item must be marked failed
    ///
    /// Reduction failures degrade to an empty result instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PipelineError::ReductionFailure(_))
    }
}
