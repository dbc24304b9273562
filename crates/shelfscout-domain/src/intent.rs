//! Intent extraction output

use crate::filters::SemanticFilters;
use serde::{Deserialize, Serialize};

/// Structured reading of a free-text search intent
///
/// `confidence` and `reasoning` are opaque metadata to the search core; they
/// are carried through to the persisted record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentExtraction {
    /// Product keywords with conversational filler removed
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Semantic filters recognised in the query
    #[serde(default)]
    pub filters: SemanticFilters,

    /// Normalised query string for keyword search
    #[serde(default, alias = "clean_query")]
    pub clean_query: String,

    /// Extractor confidence in [0.0, 1.0]
    #[serde(default)]
    pub confidence: f64,

    /// Free-text explanation from the extractor
    #[serde(default)]
    pub reasoning: String,
}

impl IntentExtraction {
    /// First non-blank keyword, trimmed
    pub fn first_keyword(&self) -> Option<&str> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .find(|k| !k.is_empty())
    }

    /// Non-blank keywords joined by single spaces
    pub fn joined_keywords(&self) -> String {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
