//! Configuration for batch runs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the batch coordinator
///
/// # Examples
///
/// ```
/// use shelfscout_batch::BatchConfig;
///
/// let config = BatchConfig::default();
/// assert_eq!(config.delay_between_items_ms, 1000);
///
/// // Faster pacing, larger flushes
/// let config = BatchConfig::aggressive();
/// assert_eq!(config.flush_every, 100);
///
/// // Gentle on the endpoint, frequent flushes
/// let config = BatchConfig::lenient();
/// assert_eq!(config.delay_between_items_ms, 3000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Skip items that already carry output or have blank input
    /// Default: true
    pub skip_processed: bool,

    /// Pause between consecutive processed items (milliseconds)
    /// Default: 1000
    pub delay_between_items_ms: u64,

    /// Number of records buffered before each sink write
    /// Default: 50
    pub flush_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            skip_processed: true,
            delay_between_items_ms: 1000,
            flush_every: 50,
        }
    }
}

impl BatchConfig {
    /// Short pauses and large flushes, for endpoints with generous limits
    pub fn aggressive() -> Self {
        Self {
            skip_processed: true,
            delay_between_items_ms: 250,
            flush_every: 100,
        }
    }

    /// Long pauses and small flushes, for rate-limited endpoints
    pub fn lenient() -> Self {
        Self {
            skip_processed: true,
            delay_between_items_ms: 3000,
            flush_every: 10,
        }
    }

    /// Delay as Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_items_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.flush_every == 0 {
            return Err("flush_every must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load from a TOML string; missing keys take defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
