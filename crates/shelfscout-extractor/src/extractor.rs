//! Core extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::parser::parse_intent_response;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use shelfscout_domain::traits::{IntentExtractor, LlmProvider};
use shelfscout_domain::IntentExtraction;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const INTENT_SCHEMA: &str = r#"{"type":"object","properties":{"keywords":{"type":"array"},"filters":{"type":"object"},"cleanQuery":{"type":"string"},"confidence":{"type":"number"},"reasoning":{"type":"string"}}}"#;

/// LLM-backed intent extractor
pub struct LlmIntentExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> LlmIntentExtractor<L>
where
    L: LlmProvider + 'static,
{
    /// Create a new extractor
    ///
    /// Fails when the configuration does not validate.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractionError> {
        Self::with_shared_provider(Arc::new(llm_provider), config)
    }

    /// Create an extractor around a provider shared with other components
    pub fn with_shared_provider(
        llm_provider: Arc<L>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractionError> {
        config.validate().map_err(ExtractionError::Config)?;
        Ok(Self {
            llm_provider,
            config,
        })
    }

    /// Access the configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Name of the model behind this extractor
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    async fn call_llm(&self, prompt: &str) -> Result<String, ExtractionError> {
        let result = if self.config.structured_output {
            self.llm_provider
                .generate_structured(prompt, INTENT_SCHEMA)
                .await
        } else {
            self.llm_provider.generate(prompt).await
        };
        result.map_err(|e| ExtractionError::Llm(e.to_string()))
    }

    /// Extract keywords and semantic filters from a query
    pub async fn extract_intent(&self, query: &str) -> Result<IntentExtraction, ExtractionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ExtractionError::EmptyQuery);
        }
        let length = query.chars().count();
        if length > self.config.max_query_length {
            return Err(ExtractionError::QueryTooLong(
                length,
                self.config.max_query_length,
            ));
        }

        let start = Instant::now();
        let prompt = PromptBuilder::new(query)
            .with_language(self.config.language.as_str())
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(self.config.extraction_timeout(), self.call_llm(&prompt))
            .await
            .map_err(|_| ExtractionError::Timeout(self.config.extraction_timeout_secs))??;
        debug!("LLM response length: {} chars", response.len());

        let intent = parse_intent_response(&response, self.config.default_confidence)?;

        if intent.confidence < self.config.min_confidence {
            warn!(
                query,
                confidence = intent.confidence,
                "Rejecting low-confidence extraction"
            );
            return Err(ExtractionError::LowConfidence(
                intent.confidence,
                self.config.min_confidence,
            ));
        }

        info!(
            query,
            clean_query = %intent.clean_query,
            keywords = intent.keywords.len(),
            filters = ?intent.filters.attribute_names(),
            confidence = intent.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Intent extracted"
        );

        Ok(intent)
    }
}

#[async_trait]
impl<L> IntentExtractor for LlmIntentExtractor<L>
where
    L: LlmProvider + 'static,
{
    type Error = ExtractionError;

    async fn extract(&self, query: &str) -> Result<IntentExtraction, Self::Error> {
        self.extract_intent(query).await
    }
}
