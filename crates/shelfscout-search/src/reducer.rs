//! Response reduction
//!
//! Projects a raw catalog search response onto [`ReducedSearchResult`],
//! keeping only what downstream storage needs. Reduction is lossy and
//! tolerant: missing fields become `None` or empty, non-object products are
//! skipped, and only a malformed top-level shape counts as a failure.

use crate::config::ReducerConfig;
use crate::error::SearchError;
use crate::protocol::search_payload;
use regex::Regex;
use serde_json::Value;
use shelfscout_domain::filters::number_from_value;
use shelfscout_domain::{ReducedProduct, ReducedSearchResult, ReductionMetrics};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Apparel sizes recognised in variant titles, smallest first
pub const SIZE_ORDER: [&str; 10] = [
    "XXXS", "XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL", "XXXXL",
];

static FIT_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile(&[
        (r"(?i)oversized", "Oversized"),
        (r"(?i)true[- ]?to[- ]?size", "True-to-size"),
        (r"(?i)regular fit", "Regular"),
        (r"(?i)slim fit", "Slim"),
        (r"(?i)relaxed fit", "Relaxed"),
    ])
});

static CARE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile(&[
        (r"(?i)dry\s*clean\s*only", "Dry clean only"),
        (r"(?i)machine\s*wash(ing)?\s*cold", "Machine wash cold"),
        (r"(?i)do not tumble dry", "Do not tumble dry"),
    ])
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("HTML tag pattern is valid"));

fn compile(patterns: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    patterns
        .iter()
        .map(|(pattern, label)| {
            let re = Regex::new(pattern).expect("attribute pattern is valid");
            (re, *label)
        })
        .collect()
}

/// Reduced result plus its size accounting
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// The projection
    pub result: ReducedSearchResult,
    /// Compact-JSON sizes before and after
    pub metrics: ReductionMetrics,
}

/// Projects raw search responses onto their essential fields
#[derive(Debug, Clone, Default)]
pub struct ResponseReducer {
    config: ReducerConfig,
}

impl ResponseReducer {
    /// Create a reducer
    pub fn new(config: ReducerConfig) -> Self {
        Self { config }
    }

    /// Reduce a response, degrading to an empty result on malformed input
    pub fn reduce(&self, raw: &Value) -> Reduction {
        self.try_reduce(raw).unwrap_or_else(|e| {
            warn!("{}; storing an empty result", e);
            let result = ReducedSearchResult::empty();
            let metrics = ReductionMetrics::from_sizes(json_len(raw), json_len(&result));
            Reduction { result, metrics }
        })
    }

    /// Reduce a response, reporting a malformed top-level shape as an error
    pub fn try_reduce(&self, raw: &Value) -> Result<Reduction, SearchError> {
        let payload = search_payload(raw);
        let Some(obj) = payload.as_object() else {
            return Err(SearchError::Reduction(
                "response is not a JSON object".to_string(),
            ));
        };

        let products: &[Value] = match obj.get("products") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(SearchError::Reduction(
                    "products is not an array".to_string(),
                ))
            }
        };

        let reduced: Vec<ReducedProduct> = products
            .iter()
            .filter_map(|product| self.reduce_product(product))
            .collect();
        if reduced.len() < products.len() {
            debug!(
                skipped = products.len() - reduced.len(),
                "Skipped non-object products"
            );
        }

        let pagination = obj
            .get("pagination_info")
            .or_else(|| obj.get("pagination"))
            .filter(|p| !p.is_null())
            .cloned();

        let result = ReducedSearchResult {
            products: reduced,
            pagination,
        };
        let metrics = ReductionMetrics::from_sizes(json_len(raw), json_len(&result));
        debug!(
            products = result.product_count(),
            original = metrics.original_size,
            reduced = metrics.reduced_size,
            "Response reduced by {:.1}%",
            metrics.reduction_percent
        );

        Ok(Reduction { result, metrics })
    }

    /// Project one raw product; `None` when it is not an object
    pub fn reduce_product(&self, product: &Value) -> Option<ReducedProduct> {
        product.as_object()?;

        let variants: &[Value] = product
            .get("variants")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let price_range = product.get("price_range").or_else(|| product.get("priceRange"));
        let price_min = price_range
            .and_then(|range| range.get("min"))
            .or_else(|| product.get("price_min"))
            .and_then(number_from_value);
        let price_max = price_range
            .and_then(|range| range.get("max"))
            .or_else(|| product.get("price_max"))
            .and_then(number_from_value);
        let currency = price_range
            .and_then(|range| range.get("currency"))
            .or_else(|| product.get("currency"))
            .and_then(non_blank_str);

        let available = if variants.is_empty() {
            None
        } else {
            Some(variants.iter().any(|variant| {
                variant
                    .get("available")
                    .or_else(|| variant.get("availableForSale"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            }))
        };

        Some(ReducedProduct {
            id: first_of(product, &["product_id", "id"])
                .and_then(scalar_string)
                .unwrap_or_default(),
            title: first_of(product, &["title", "name"])
                .and_then(non_blank_str)
                .unwrap_or_default(),
            product_type: first_of(product, &["product_type", "productType"])
                .and_then(non_blank_str),
            price_min,
            price_max,
            currency,
            sizes: extract_sizes(variants),
            available,
            variant_count: variants.len(),
            tags: self.extract_tags(product.get("tags")),
            fit: extract_fit(product),
            care: extract_care(product),
            description: self.extract_description(product),
        })
    }

    fn extract_tags(&self, tags: Option<&Value>) -> Vec<String> {
        let limit = self.config.tag_limit;
        match tags {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(scalar_string)
                .filter(|t| !t.trim().is_empty())
                .take(limit)
                .collect(),
            Some(Value::String(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(limit)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn extract_description(&self, product: &Value) -> Option<String> {
        let raw = first_of(product, &["description", "body_html"]).and_then(Value::as_str)?;
        // Tags are removed, not spaced, so inline markup never splits a word
        let plain = HTML_TAG.replace_all(raw, "");
        let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
        if plain.is_empty() {
            return None;
        }

        let limit = self.config.description_length;
        if plain.chars().count() > limit {
            let truncated: String = plain.chars().take(limit).collect();
            Some(format!("{}...", truncated.trim_end()))
        } else {
            Some(plain)
        }
    }
}

fn json_len<T: serde::Serialize + ?Sized>(value: &T) -> usize {
    serde_json::to_vec(value).map_or(0, |bytes| bytes.len())
}

/// First present, non-null, non-empty-string value among `keys`
fn first_of<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn non_blank_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn extract_sizes(variants: &[Value]) -> Vec<String> {
    let found: Vec<String> = variants
        .iter()
        .filter_map(|variant| first_of(variant, &["size", "option1", "title"]))
        .filter_map(Value::as_str)
        .map(|size| size.trim().to_uppercase())
        .collect();
    SIZE_ORDER
        .iter()
        .filter(|size| found.iter().any(|f| f == *size))
        .map(|size| size.to_string())
        .collect()
}

fn text_of(product: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| product.get(key).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_fit(product: &Value) -> Option<String> {
    let text = text_of(product, &["description", "body_html", "title"]);
    FIT_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|(_, label)| label.to_string())
}

fn extract_care(product: &Value) -> Option<String> {
    let text = text_of(product, &["description", "body_html", "care_instructions"]);
    let notes: Vec<&str> = CARE_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(&text))
        .map(|(_, label)| *label)
        .collect();
    if notes.is_empty() {
        None
    } else {
        Some(notes.join(", "))
    }
}
