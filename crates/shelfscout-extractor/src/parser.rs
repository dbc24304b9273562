//! Parse LLM output into an intent extraction

use crate::error::ExtractionError;
use serde_json::Value;
use shelfscout_domain::filters::number_from_value;
use shelfscout_domain::IntentExtraction;
use tracing::warn;

/// Parse a model response into an [`IntentExtraction`]
///
/// `default_confidence` fills in a missing or unreadable confidence; any
/// value present is clamped into `[0.0, 1.0]`.
pub fn parse_intent_response(
    response: &str,
    default_confidence: f64,
) -> Result<IntentExtraction, ExtractionError> {
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(json_str)?;

    let Value::Object(mut obj) = json else {
        return Err(ExtractionError::InvalidFormat(
            "Expected a JSON object".to_string(),
        ));
    };

    let confidence = obj
        .remove("confidence")
        .as_ref()
        .and_then(number_from_value)
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(default_confidence);

    // A bare keyword string is common enough to accept
    if let Some(Value::String(keyword)) = obj.get("keywords") {
        let keyword = keyword.clone();
        obj.insert("keywords".to_string(), Value::Array(vec![Value::String(keyword)]));
    }
    if matches!(obj.get("filters"), Some(Value::Null)) {
        obj.remove("filters");
    }
    if let Some(Value::Array(keywords)) = obj.get_mut("keywords") {
        keywords.retain(|k| k.is_string());
    }
    if matches!(obj.get("cleanQuery").or_else(|| obj.get("clean_query")), Some(Value::Null)) {
        obj.remove("cleanQuery");
        obj.remove("clean_query");
    }
    if !matches!(obj.get("reasoning"), Some(Value::String(_)) | None) {
        warn!("Dropping non-string reasoning from model output");
        obj.remove("reasoning");
    }

    let mut extraction: IntentExtraction = serde_json::from_value(Value::Object(obj))
        .map_err(|e| ExtractionError::InvalidFormat(e.to_string()))?;
    extraction.confidence = confidence;
    extraction.clean_query = extraction.clean_query.trim().to_string();

    Ok(extraction)
}

/// Extract the JSON object from a response, handling markdown code blocks
/// and prose around the object
fn extract_json(response: &str) -> Result<&str, ExtractionError> {
    let mut trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::InvalidFormat("Empty response".to_string()));
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip the fence line (```json or ```) and the closing fence
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        trimmed = body.trim_end().trim_end_matches("```").trim();
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed);
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&trimmed[start..=end]),
        _ => Err(ExtractionError::InvalidFormat(
            "No JSON object in response".to_string(),
        )),
    }
}
