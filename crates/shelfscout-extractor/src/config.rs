//! Configuration for the intent extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the intent extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum input query length (characters)
    pub max_query_length: usize,

    /// Maximum time for a single LLM call (seconds)
    pub extraction_timeout_secs: u64,

    /// Confidence assigned when the model omits one
    pub default_confidence: f64,

    /// Extractions below this confidence are rejected (0.0 disables the check)
    pub min_confidence: f64,

    /// Language hint passed to the model
    pub language: String,

    /// Ask the provider for JSON-mode output
    pub structured_output: bool,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_query_length == 0 {
            return Err("max_query_length must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err("default_confidence must be within [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("min_confidence must be within [0.0, 1.0]".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("language must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_query_length: 2_000,
            extraction_timeout_secs: 60,
            default_confidence: 0.8,
            min_confidence: 0.0,
            language: "auto-detect".to_string(),
            structured_output: true,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: short timeout, rejects shaky extractions
    pub fn aggressive() -> Self {
        Self {
            max_query_length: 500,
            extraction_timeout_secs: 20,
            min_confidence: 0.5,
            ..Self::default()
        }
    }

    /// Lenient preset: long timeout, accepts anything parseable
    pub fn lenient() -> Self {
        Self {
            max_query_length: 10_000,
            extraction_timeout_secs: 180,
            min_confidence: 0.0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
