//! Configuration for the catalog client, orchestrator and reducer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default tool name on the catalog endpoint
pub const DEFAULT_TOOL_NAME: &str = "search_shop_catalog";

/// Placeholder endpoint; real deployments set their shop's URL
pub const DEFAULT_ENDPOINT: &str = "https://example.myshopify.com/api/mcp";

/// Settings for the JSON-RPC catalog client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint URL receiving JSON-RPC POSTs
    pub endpoint: String,

    /// Tool invoked through `tools/call`
    pub tool_name: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    pub max_retries: u32,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Create a config for an endpoint with default settings
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.tool_name.trim().is_empty() {
            return Err("tool_name must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            headers: BTreeMap::new(),
        }
    }
}

/// Settings for the two-phase search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Product limit of the discovery call
    pub discovery_limit: u32,

    /// Product limit of the targeted call
    pub targeted_limit: u32,

    /// Discovery query used when the intent has no product type or keyword
    pub fallback_query: String,

    /// Context sent with each call; `{query}` is replaced by the input text
    pub context_template: String,
}

impl SearchConfig {
    /// Render the context string for an input text
    pub fn context_for(&self, input_text: &str) -> String {
        self.context_template.replace("{query}", input_text.trim())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.discovery_limit == 0 {
            return Err("discovery_limit must be greater than 0".to_string());
        }
        if self.targeted_limit == 0 {
            return Err("targeted_limit must be greater than 0".to_string());
        }
        if self.fallback_query.trim().is_empty() {
            return Err("fallback_query must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            discovery_limit: 5,
            targeted_limit: 10,
            fallback_query: "products".to_string(),
            context_template: "Customer searching for: {query}".to_string(),
        }
    }
}

/// Settings for response reduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Characters of plain-text description kept before the ellipsis
    pub description_length: usize,

    /// Leading tags kept per product
    pub tag_limit: usize,
}

impl ReducerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.description_length == 0 {
            return Err("description_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            description_length: 200,
            tag_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(SearchConfig::default().validate().is_ok());
        assert!(ReducerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_client_config_validation() {
        assert!(ClientConfig::new("ftp://shop").validate().is_err());
        let config = ClientConfig {
            max_retries: 0,
            ..ClientConfig::new("https://shop.example/api/mcp")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_config_validation() {
        let config = SearchConfig {
            fallback_query: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            targeted_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_context_rendering() {
        let config = SearchConfig::default();
        assert_eq!(
            config.context_for(" blue shirts "),
            "Customer searching for: blue shirts"
        );
    }

    #[test]
    fn test_partial_toml() {
        let config: SearchConfig = toml::from_str("targeted_limit = 20").unwrap();
        assert_eq!(config.targeted_limit, 20);
        assert_eq!(config.discovery_limit, 5);

        let client: ClientConfig = toml::from_str(
            "endpoint = \"https://shop.example/api/mcp\"\n[headers]\nX-Shop = \"demo\"\n",
        )
        .unwrap();
        assert_eq!(client.headers.get("X-Shop").map(String::as_str), Some("demo"));
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }
}
