//! Configuration management for the CLI.
//!
//! One TOML file carries a section per component. Every section and every
//! field is optional; missing values fall back to the component defaults.
//!
//! ```toml
//! [api]
//! endpoint = "https://shop.example/api/mcp"
//! timeout_secs = 30
//! max_retries = 3
//!
//! [llm]
//! provider = "ollama"
//! model = "llama3.1"
//!
//! [search]
//! fallback_query = "bestsellers"
//!
//! [batch]
//! delay_between_items_ms = 1000
//! ```

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use shelfscout_batch::BatchConfig;
use shelfscout_extractor::ExtractorConfig;
use shelfscout_search::{ClientConfig, ReducerConfig, SearchConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under the home directory holding config and history.
pub const CONFIG_DIR: &str = ".shelfscout";

/// Environment variable read for the OpenAI key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfScoutConfig {
    /// Catalog endpoint settings
    pub api: ClientConfig,

    /// LLM provider settings
    pub llm: LlmSettings,

    /// Intent extraction settings
    pub extractor: ExtractorConfig,

    /// Two-phase search settings
    pub search: SearchConfig,

    /// Response reduction settings
    pub reducer: ReducerConfig,

    /// Batch run settings
    pub batch: BatchConfig,

    /// Output settings
    pub output: OutputSettings,
}

/// Which LLM backend extracts intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama instance
    Ollama,
    /// OpenAI-compatible chat completions
    OpenAi,
    /// Canned replies, no network
    Mock,
}

/// LLM provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Backend to use
    pub provider: ProviderKind,

    /// Model name
    pub model: String,

    /// Endpoint override; each provider has its own default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (OpenAI only)
    pub api_key_env: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "llama3.1".to_string(),
            endpoint: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl LlmSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.provider == ProviderKind::OpenAi && self.api_key_env.trim().is_empty() {
            return Err("api_key_env must name an environment variable".to_string());
        }
        Ok(())
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,

    /// REPL history size
    pub history_size: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl ShelfScoutConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(CONFIG_DIR).join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default path is read if
    /// present, otherwise the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::read(&path)?
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Parse from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section; the error names the failing section.
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("api", self.api.validate()),
            ("llm", self.llm.validate()),
            ("extractor", self.extractor.validate()),
            ("search", self.search.validate()),
            ("reducer", self.reducer.validate()),
            ("batch", self.batch.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ShelfScoutConfig::default();
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.output.color);
        // the placeholder endpoint is a valid URL
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ShelfScoutConfig::from_toml(
            r#"
            [api]
            endpoint = "https://shop.example/api/mcp"

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"

            [batch]
            delay_between_items_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.api.endpoint, "https://shop.example/api/mcp");
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.batch.delay_between_items_ms, 250);
        assert_eq!(config.batch.flush_every, 50);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_validation_names_section() {
        let mut config = ShelfScoutConfig::default();
        config.batch.flush_every = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[batch]"), "{}", err);

        let mut config = ShelfScoutConfig::default();
        config.api.endpoint = "ftp://nope".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[api]"), "{}", err);

        let mut config = ShelfScoutConfig::default();
        config.llm.model = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = ShelfScoutConfig::from_toml("[llm]\nprovider = \"claude-local\"\n");
        assert!(matches!(result, Err(CliError::Toml(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ShelfScoutConfig::default();
        config.search.fallback_query = "bestsellers".to_string();
        config.api.headers.insert("X-Shop".to_string(), "demo".to_string());
        config.save(&path).unwrap();

        let loaded = ShelfScoutConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            ShelfScoutConfig::load(Some(&missing)),
            Err(CliError::Config(_))
        ));
    }
}
