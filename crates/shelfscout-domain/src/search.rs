//! Catalog search request and response values

use crate::concrete::ConcreteFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments of one catalog search call
///
/// `filters` is omitted from the serialized form when empty: an absent
/// filters argument and an empty array are not equivalent on every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Keyword query
    pub query: String,

    /// Free-text shopping context passed to the endpoint
    pub context: String,

    /// Maximum number of products to return
    pub limit: u32,

    /// Concrete filters; empty means keyword search only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ConcreteFilter>,

    /// Pagination cursor from a previous response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl SearchRequest {
    /// Create an unfiltered request
    pub fn new(query: impl Into<String>, context: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            context: context.into(),
            limit,
            filters: Vec::new(),
            after: None,
        }
    }

    /// Attach concrete filters
    pub fn with_filters(mut self, filters: Vec<ConcreteFilter>) -> Self {
        self.filters = filters;
        self
    }

    /// Continue from a pagination cursor
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Whether any filter is attached
    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }
}

/// Decoded body of a successful catalog search
///
/// The body is kept as raw JSON: the capability extractor and the reducer
/// each read the parts they need and tolerate anything missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResponse {
    body: Value,
}

impl SearchResponse {
    /// Wrap a decoded body
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Borrow the raw body
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Take ownership of the raw body
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Number of entries in the top-level `products` array, if present
    pub fn product_count(&self) -> usize {
        self.body
            .get("products")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Cursor for the next page, when the endpoint reports one
    pub fn end_cursor(&self) -> Option<&str> {
        let pagination = self
            .body
            .get("pagination")
            .or_else(|| self.body.get("pagination_info"))?;
        let has_next = pagination
            .get("hasNextPage")
            .or_else(|| pagination.get("has_next_page"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !has_next {
            return None;
        }
        pagination
            .get("endCursor")
            .or_else(|| pagination.get("end_cursor"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unfiltered_request_omits_filters() {
        let request = SearchRequest::new("shirts", "Customer searching for: shirts", 5);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"query": "shirts", "context": "Customer searching for: shirts", "limit": 5})
        );
        assert!(!request.is_filtered());
    }

    #[test]
    fn test_filtered_request_with_cursor() {
        let request = SearchRequest::new("shirts", "", 10)
            .with_filters(vec![ConcreteFilter::Tag("sale".into())])
            .with_after("abc");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["filters"], json!([{"tag": "sale"}]));
        assert_eq!(value["after"], json!("abc"));
        assert!(request.is_filtered());
    }

    #[test]
    fn test_end_cursor() {
        let response = SearchResponse::new(json!({
            "products": [{}, {}],
            "pagination": {"hasNextPage": true, "endCursor": "cur-1"}
        }));
        assert_eq!(response.end_cursor(), Some("cur-1"));
        assert_eq!(response.product_count(), 2);

        let last_page = SearchResponse::new(json!({
            "pagination": {"hasNextPage": false, "endCursor": "cur-2"}
        }));
        assert_eq!(last_page.end_cursor(), None);
        assert_eq!(last_page.product_count(), 0);
    }
}
