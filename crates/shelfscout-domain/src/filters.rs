//! Semantic filters - user intent before backend translation
//!
//! A [`SemanticFilters`] value is what the intent extractor hands to the core:
//! attribute names such as `colors` or `productType` mapped to loosely typed
//! values. Model output is not trusted to be well-formed, so deserialization
//! is tolerant: a bare string where a list is expected becomes a one-element
//! list, numbers may arrive as strings, and anything unrecognised is kept in
//! [`SemanticFilters::extra`] instead of failing the whole parse.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Semantic attributes extracted from a free-text search intent
///
/// # Examples
///
/// ```
/// use shelfscout_domain::SemanticFilters;
///
/// let filters: SemanticFilters = serde_json::from_str(
///     r#"{"colors": "blue", "productType": "shirts", "price": {"max": "300"}}"#,
/// ).unwrap();
///
/// assert_eq!(filters.colors, vec!["blue"]);
/// assert_eq!(filters.product_type.as_deref(), Some("shirts"));
/// assert_eq!(filters.price.unwrap().max, Some(300.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticFilters {
    /// Product category, e.g. "polo shirts"
    #[serde(
        default,
        alias = "product_type",
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_type: Option<String>,

    /// Requested colors
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,

    /// Requested sizes
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,

    /// Requested materials
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,

    /// Brand names (kept for audit; no concrete filter exists for brands)
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,

    /// Sale or tag-like terms
    #[serde(
        default,
        alias = "tags",
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sales: Vec<String>,

    /// Price bounds
    #[serde(
        default,
        alias = "priceRange",
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<PriceRange>,

    /// In-stock requirement
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    /// Attributes the core has no mapping for
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SemanticFilters {
    /// True when no attribute at all is present
    pub fn is_empty(&self) -> bool {
        self.attribute_names().is_empty() && self.extra.is_empty()
    }

    /// Names of the known attributes that carry a value, in adapter order
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.product_type.is_some() {
            names.push("productType");
        }
        if !self.colors.is_empty() {
            names.push("colors");
        }
        if !self.sizes.is_empty() {
            names.push("sizes");
        }
        if !self.materials.is_empty() {
            names.push("materials");
        }
        if self.price.is_some() {
            names.push("price");
        }
        if !self.sales.is_empty() {
            names.push("sales");
        }
        if self.available.is_some() {
            names.push("available");
        }
        if !self.brands.is_empty() {
            names.push("brands");
        }
        names
    }
}

/// Numeric price bounds, either side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl PriceRange {
    /// Create a range with both bounds optional
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Build a range from a loosely typed JSON object
    ///
    /// Returns `None` for non-objects and for objects carrying neither bound.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let min = obj.get("min").and_then(number_from_value);
        let max = obj.get("max").and_then(number_from_value);
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self { min, max })
    }
}

/// Read a finite number from a JSON number or a numeric string like "$1,200"
pub fn number_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strings_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => non_blank(s).into_iter().collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Array(items) => items.iter().flat_map(strings_from_value).collect(),
        _ => Vec::new(),
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_from_value(&value))
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_from_value(&value).into_iter().next())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<PriceRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(PriceRange::from_value(&value))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
