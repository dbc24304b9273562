//! Reduced search results - the storage projection of a catalog response

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Essential fields of one product
///
/// Absent fields are omitted when serialized so the projection stays small.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReducedProduct {
    /// Product identifier
    pub id: String,

    /// Product title
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Product type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Lowest price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,

    /// Highest price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,

    /// ISO currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Known apparel sizes, smallest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,

    /// Whether any variant is in stock; unknown without variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    /// Number of variants in the raw product
    #[serde(default, skip_serializing_if = "is_zero")]
    pub variant_count: usize,

    /// Leading tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Fit note detected in the product text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,

    /// Care notes detected in the product text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,

    /// Plain-text description, truncated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Reduced form of a whole search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReducedSearchResult {
    /// Projected products in response order
    #[serde(default)]
    pub products: Vec<ReducedProduct>,

    /// Pagination block copied unchanged from the raw response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Value>,
}

impl ReducedSearchResult {
    /// An empty result with zero products
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of products kept
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Titles of the kept products, in order
    pub fn titles(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.title.as_str()).collect()
    }
}

/// Size accounting for one reduction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReductionMetrics {
    /// Serialized size of the raw response (bytes)
    pub original_size: usize,

    /// Serialized size of the reduced result (bytes)
    pub reduced_size: usize,

    /// `(1 - reduced / original) * 100`, or 0 when the original is empty
    pub reduction_percent: f64,
}

impl ReductionMetrics {
    /// Compute metrics from two serialized sizes
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfscout_domain::ReductionMetrics;
    ///
    /// let metrics = ReductionMetrics::from_sizes(1000, 250);
    /// assert_eq!(metrics.reduction_percent, 75.0);
    /// assert_eq!(ReductionMetrics::from_sizes(0, 10).reduction_percent, 0.0);
    /// ```
    pub fn from_sizes(original_size: usize, reduced_size: usize) -> Self {
        let reduction_percent = if original_size == 0 {
            0.0
        } else {
            (1.0 - reduced_size as f64 / original_size as f64) * 100.0
        };
        Self {
            original_size,
            reduced_size,
            reduction_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let product = ReducedProduct {
            id: "gid://shopify/Product/1".into(),
            title: "Tee".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value, json!({"id": "gid://shopify/Product/1", "title": "Tee"}));
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let product: ReducedProduct = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert_eq!(product.price_min, None);
        assert_eq!(product.price_max, None);
        assert!(product.tags.is_empty());
        assert_eq!(product.variant_count, 0);
    }

    #[test]
    fn test_empty_result() {
        let result = ReducedSearchResult::empty();
        assert_eq!(result.product_count(), 0);
        assert!(result.pagination.is_none());
    }

    #[test]
    fn test_reduction_percent() {
        let metrics = ReductionMetrics::from_sizes(400, 100);
        assert!((metrics.reduction_percent - 75.0).abs() < 1e-9);

        let growth = ReductionMetrics::from_sizes(100, 150);
        assert!((growth.reduction_percent + 50.0).abs() < 1e-9);
    }
}
