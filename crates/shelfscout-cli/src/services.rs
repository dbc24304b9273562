//! Construction of the LLM provider, catalog client and pipeline from config.

use crate::config::{LlmSettings, ProviderKind, ShelfScoutConfig};
use crate::error::Result;
use async_trait::async_trait;
use shelfscout_batch::ItemPipeline;
use shelfscout_domain::traits::LlmProvider;
use shelfscout_extractor::LlmIntentExtractor;
use shelfscout_llm::{LlmError, MockProvider, OllamaProvider, OpenAiProvider};
use shelfscout_search::{McpCatalogClient, ResponseReducer, SearchOrchestrator};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The pipeline type the CLI runs
pub type Pipeline = ItemPipeline<LlmIntentExtractor<AnyProvider>, McpCatalogClient>;

/// LLM provider selected at runtime
#[derive(Debug, Clone)]
pub enum AnyProvider {
    /// Local Ollama
    Ollama(OllamaProvider),
    /// OpenAI-compatible API
    OpenAi(OpenAiProvider),
    /// Canned replies
    Mock(MockProvider),
}

impl AnyProvider {
    /// Build the provider described by `settings`
    pub fn from_settings(settings: &LlmSettings) -> std::result::Result<Self, LlmError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let provider = match settings.provider {
            ProviderKind::Ollama => {
                let provider = match &settings.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint.as_str(), settings.model.as_str())?,
                    None => OllamaProvider::default_endpoint(settings.model.as_str())?,
                };
                AnyProvider::Ollama(
                    provider
                        .with_max_retries(settings.max_retries)
                        .with_timeout(timeout)?,
                )
            }
            ProviderKind::OpenAi => {
                let mut provider =
                    OpenAiProvider::from_env(&settings.api_key_env, settings.model.as_str())?
                        .with_max_retries(settings.max_retries)
                        .with_timeout(timeout)?;
                if let Some(endpoint) = &settings.endpoint {
                    provider = provider.with_base_url(endpoint.as_str());
                }
                AnyProvider::OpenAi(provider)
            }
            ProviderKind::Mock => AnyProvider::Mock(MockProvider::default()),
        };
        Ok(provider)
    }
}

#[async_trait]
impl LlmProvider for AnyProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> std::result::Result<String, Self::Error> {
        match self {
            AnyProvider::Ollama(p) => p.generate(prompt).await,
            AnyProvider::OpenAi(p) => p.generate(prompt).await,
            AnyProvider::Mock(p) => p.generate(prompt).await,
        }
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
    ) -> std::result::Result<String, Self::Error> {
        match self {
            AnyProvider::Ollama(p) => p.generate_structured(prompt, schema).await,
            AnyProvider::OpenAi(p) => p.generate_structured(prompt, schema).await,
            AnyProvider::Mock(p) => p.generate_structured(prompt, schema).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            AnyProvider::Ollama(p) => p.model_name(),
            AnyProvider::OpenAi(p) => p.model_name(),
            AnyProvider::Mock(p) => p.model_name(),
        }
    }
}

/// Everything a command needs to process queries
pub struct Services {
    provider: Arc<AnyProvider>,
    pipeline: Pipeline,
}

impl Services {
    /// Validate `config` and wire the components together
    ///
    /// Nothing is contacted here; connectivity is only exercised by calls.
    pub fn from_config(config: &ShelfScoutConfig) -> Result<Self> {
        config.validate()?;

        let provider = Arc::new(AnyProvider::from_settings(&config.llm)?);
        let extractor =
            LlmIntentExtractor::with_shared_provider(Arc::clone(&provider), config.extractor.clone())?;
        let client = McpCatalogClient::new(config.api.clone())?;
        let pipeline = ItemPipeline::new(
            extractor,
            SearchOrchestrator::new(client, config.search.clone()),
            ResponseReducer::new(config.reducer.clone()),
        );

        info!(
            provider = ?config.llm.provider,
            model = provider.model_name(),
            endpoint = %config.api.endpoint,
            "Services ready"
        );
        Ok(Self { provider, pipeline })
    }

    /// The LLM provider
    pub fn provider(&self) -> &AnyProvider {
        &self.provider
    }

    /// The intent extractor
    pub fn extractor(&self) -> &LlmIntentExtractor<AnyProvider> {
        self.pipeline.extractor()
    }

    /// The catalog client
    pub fn catalog(&self) -> &McpCatalogClient {
        self.pipeline.orchestrator().backend()
    }

    /// The per-item pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Take the pipeline, e.g. to hand it to a batch coordinator
    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_config() -> ShelfScoutConfig {
        let mut config = ShelfScoutConfig::default();
        config.llm.provider = ProviderKind::Mock;
        config.api.endpoint = "http://127.0.0.1:9/mcp".to_string();
        config
    }

    #[tokio::test]
    async fn test_mock_provider_dispatch() {
        let provider = AnyProvider::from_settings(&mock_config().llm).unwrap();
        assert!(matches!(provider, AnyProvider::Mock(_)));
        assert_eq!(provider.model_name(), "mock");
        assert_eq!(provider.generate("anything").await.unwrap(), "Default mock response");
    }

    #[test]
    fn test_ollama_provider_from_settings() {
        let mut settings = LlmSettings::default();
        settings.endpoint = Some("http://gpu-box:11434".to_string());
        let provider = AnyProvider::from_settings(&settings).unwrap();
        assert!(matches!(provider, AnyProvider::Ollama(_)));
        assert_eq!(provider.model_name(), "llama3.1");
    }

    #[test]
    fn test_openai_requires_key_variable() {
        let settings = LlmSettings {
            provider: ProviderKind::OpenAi,
            api_key_env: "SHELFSCOUT_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..LlmSettings::default()
        };
        assert!(matches!(
            AnyProvider::from_settings(&settings),
            Err(LlmError::Authentication(_))
        ));
    }

    #[test]
    fn test_services_wire_config_through() {
        let mut config = mock_config();
        config.search.fallback_query = "bestsellers".to_string();
        let services = Services::from_config(&config).unwrap();

        assert_eq!(services.catalog().config().endpoint, "http://127.0.0.1:9/mcp");
        assert_eq!(services.pipeline().orchestrator().config().fallback_query, "bestsellers");
        assert_eq!(services.extractor().model_name(), "mock");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = mock_config();
        config.search.discovery_limit = 0;
        assert!(Services::from_config(&config).is_err());
    }
}
