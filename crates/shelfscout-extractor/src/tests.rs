//! Extractor tests against the mock provider

use crate::{ExtractionError, ExtractorConfig, LlmIntentExtractor};
use shelfscout_domain::traits::IntentExtractor;
use shelfscout_domain::PriceRange;
use shelfscout_llm::MockProvider;
use std::sync::Arc;

const BLUE_SHIRTS: &str = r#"{
    "keywords": ["blue", "shirts"],
    "filters": {"colors": ["blue"], "productType": "shirts", "price": {"max": 50}},
    "cleanQuery": "blue shirts",
    "confidence": 0.92,
    "reasoning": "color, category and price ceiling"
}"#;

#[tokio::test]
async fn test_full_extraction_flow() {
    let llm = MockProvider::new(BLUE_SHIRTS);
    let extractor = LlmIntentExtractor::new(llm.clone(), ExtractorConfig::default()).unwrap();

    let intent = extractor
        .extract("i am looking for blue shirts under 50")
        .await
        .unwrap();

    assert_eq!(intent.keywords, vec!["blue", "shirts"]);
    assert_eq!(intent.filters.product_type.as_deref(), Some("shirts"));
    assert_eq!(intent.filters.price, Some(PriceRange::new(None, Some(50.0))));
    assert_eq!(intent.confidence, 0.92);
    assert_eq!(llm.call_count(), 1);
    assert!(llm.prompts()[0].contains("i am looking for blue shirts under 50"));
}

#[tokio::test]
async fn test_extraction_with_invalid_json() {
    let llm = MockProvider::new("Sorry, I cannot help with that.");
    let extractor = LlmIntentExtractor::new(llm, ExtractorConfig::default()).unwrap();

    let result = extractor.extract("red dress").await;
    assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
}

#[tokio::test]
async fn test_llm_failure_is_reported() {
    let mut llm = MockProvider::default();
    llm.add_error("broken query");
    let extractor = LlmIntentExtractor::new(llm, ExtractorConfig::default()).unwrap();

    let result = extractor.extract("broken query").await;
    match result {
        Err(ExtractionError::Llm(msg)) => assert!(msg.contains("Mock error")),
        other => panic!("expected LLM error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_and_oversized_queries_skip_the_llm() {
    let llm = MockProvider::new(BLUE_SHIRTS);
    let config = ExtractorConfig {
        max_query_length: 10,
        ..Default::default()
    };
    let extractor = LlmIntentExtractor::new(llm.clone(), config).unwrap();

    assert!(matches!(
        extractor.extract("   ").await,
        Err(ExtractionError::EmptyQuery)
    ));
    assert!(matches!(
        extractor.extract("a very long shopping query").await,
        Err(ExtractionError::QueryTooLong(26, 10))
    ));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_low_confidence_rejected_by_aggressive_preset() {
    let llm = MockProvider::new(r#"{"keywords": ["thing"], "confidence": 0.2}"#);
    let extractor = LlmIntentExtractor::new(llm.clone(), ExtractorConfig::aggressive()).unwrap();
    assert!(matches!(
        extractor.extract("thing").await,
        Err(ExtractionError::LowConfidence(_, _))
    ));

    let lenient = LlmIntentExtractor::new(llm, ExtractorConfig::lenient()).unwrap();
    assert_eq!(lenient.extract("thing").await.unwrap().confidence, 0.2);
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let config = ExtractorConfig {
        extraction_timeout_secs: 0,
        ..Default::default()
    };
    let result = LlmIntentExtractor::new(MockProvider::default(), config);
    assert!(matches!(result, Err(ExtractionError::Config(_))));
}

#[tokio::test]
async fn test_shared_provider_and_per_query_responses() {
    let mut llm = MockProvider::new(r#"{"keywords": []}"#);
    llm.add_response("linen", r#"{"keywords": ["linen"], "filters": {"materials": "linen"}}"#);
    let shared = Arc::new(llm);

    let extractor =
        LlmIntentExtractor::with_shared_provider(Arc::clone(&shared), ExtractorConfig::default())
            .unwrap();
    assert_eq!(extractor.model_name(), "mock");

    let linen = extractor.extract("linen trousers").await.unwrap();
    assert_eq!(linen.filters.materials, vec!["linen"]);

    let other = extractor.extract("anything else").await.unwrap();
    assert!(other.keywords.is_empty());
    assert_eq!(shared.call_count(), 2);
}
