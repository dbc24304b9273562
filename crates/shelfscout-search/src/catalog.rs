//! Available-filter catalog
//!
//! A discovery response advertises which filter inputs the endpoint will
//! accept for the current catalog slice. [`AvailableFilterCatalog`] reads that
//! advertisement into flat, queryable form. It is built fresh from every
//! discovery response and never merged across items.
//!
//! The advertisement looks like this (abridged):
//!
//! ```text
//! "available_filters": [
//!   {"label": "Color",
//!    "values": {"label": ["Blue", "Red"],
//!               "input_options": [{"input": "{\"variantOption\":{\"name\":\"Color\",\"value\":\"Blue\"}}"}]}},
//!   {"label": "Price", "values": {"input_options": [{"input": {"price": {"min": 0, "max": 100}}}]}}
//! ]
//! ```
//!
//! Inputs may be JSON objects or JSON strings holding an object; options may
//! wrap the input in `{"input": ...}` or be the input themselves.

use crate::protocol::search_payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A metafield filter dimension, addressed by namespace and key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldKey {
    /// Metafield namespace, verbatim
    pub namespace: String,
    /// Metafield key, verbatim
    pub key: String,
}

impl fmt::Display for MetafieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// Filter capabilities advertised by one discovery response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableFilterCatalog {
    labels: Vec<String>,
    product_type: bool,
    price: bool,
    available: bool,
    tag: bool,
    variant_options: Vec<String>,
    metafields: Vec<MetafieldKey>,
}

impl AvailableFilterCatalog {
    /// A catalog advertising nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the advertised filters from a discovery response body
    ///
    /// Never fails: a missing or malformed filter section yields a catalog
    /// with zero capabilities. JSON-RPC envelopes are unwrapped first.
    pub fn from_response(body: &Value) -> Self {
        let payload = search_payload(body);
        let mut catalog = Self::default();

        let entries = payload
            .get("available_filters")
            .or_else(|| payload.get("availableFilters"))
            .and_then(Value::as_array);
        let Some(entries) = entries else {
            return catalog;
        };

        for entry in entries {
            if let Some(label) = entry.get("label").and_then(Value::as_str) {
                let label = label.trim();
                if !label.is_empty() && !catalog.labels.iter().any(|l| l == label) {
                    catalog.labels.push(label.to_string());
                }
            }

            let options = entry
                .get("values")
                .and_then(|values| values.get("input_options"))
                .or_else(|| entry.get("input_options"))
                .and_then(Value::as_array);
            for option in options.into_iter().flatten() {
                let input = option.get("input").unwrap_or(option);
                if let Some(input) = decode_input(input) {
                    catalog.record_input(&input);
                }
            }
        }

        catalog
    }

    fn record_input(&mut self, input: &Value) {
        let Some(obj) = input.as_object() else {
            return;
        };
        for (kind, value) in obj {
            match kind.as_str() {
                "productType" => self.product_type = true,
                "price" => self.price = true,
                "available" => self.available = true,
                "tag" => self.tag = true,
                "variantOption" => {
                    if let Some(name) = value.get("name").and_then(Value::as_str) {
                        self.add_variant_option(name);
                    }
                }
                "productMetafield" => {
                    let namespace = value.get("namespace").and_then(Value::as_str);
                    let key = value.get("key").and_then(Value::as_str);
                    if let (Some(namespace), Some(key)) = (namespace, key) {
                        self.add_metafield(namespace, key);
                    }
                }
                _ => {}
            }
        }
    }

    fn add_variant_option(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && self.variant_option(name).is_none() {
            self.variant_options.push(name.to_string());
        }
    }

    fn add_metafield(&mut self, namespace: &str, key: &str) {
        let entry = MetafieldKey {
            namespace: namespace.to_string(),
            key: key.to_string(),
        };
        if !self.metafields.contains(&entry) {
            self.metafields.push(entry);
        }
    }

    /// Mark product type as supported
    pub fn with_product_type(mut self) -> Self {
        self.product_type = true;
        self
    }

    /// Mark price as supported
    pub fn with_price(mut self) -> Self {
        self.price = true;
        self
    }

    /// Mark availability as supported
    pub fn with_available(mut self) -> Self {
        self.available = true;
        self
    }

    /// Mark tags as supported
    pub fn with_tag(mut self) -> Self {
        self.tag = true;
        self
    }

    /// Add a supported variant option name
    pub fn with_variant_option(mut self, name: &str) -> Self {
        self.add_variant_option(name);
        self
    }

    /// Add a supported metafield pair
    pub fn with_metafield(mut self, namespace: &str, key: &str) -> Self {
        self.add_metafield(namespace, key);
        self
    }

    /// Whether product type filters are accepted
    pub fn supports_product_type(&self) -> bool {
        self.product_type
    }

    /// Whether price filters are accepted
    pub fn supports_price(&self) -> bool {
        self.price
    }

    /// Whether availability filters are accepted
    pub fn supports_available(&self) -> bool {
        self.available
    }

    /// Whether tag filters are accepted
    pub fn supports_tag(&self) -> bool {
        self.tag
    }

    /// Advertised spelling of a variant option, matched case-insensitively
    pub fn variant_option(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.variant_options
            .iter()
            .find(|advertised| advertised.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Advertised variant option names in discovery order
    pub fn variant_option_names(&self) -> &[String] {
        &self.variant_options
    }

    /// First advertised metafield pair whose key equals `key`, ignoring case
    pub fn metafield_for_key(&self, key: &str) -> Option<&MetafieldKey> {
        self.metafields
            .iter()
            .find(|field| field.key.eq_ignore_ascii_case(key))
    }

    /// Advertised metafield pairs in discovery order
    pub fn metafields(&self) -> &[MetafieldKey] {
        &self.metafields
    }

    /// Filter labels as advertised, in order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct capabilities
    pub fn capability_count(&self) -> usize {
        [self.product_type, self.price, self.available, self.tag]
            .iter()
            .filter(|flag| **flag)
            .count()
            + self.variant_options.len()
            + self.metafields.len()
    }

    /// Whether nothing is supported
    pub fn is_empty(&self) -> bool {
        self.capability_count() == 0
    }

    /// One line per capability, for records and logs
    ///
    /// ```
    /// use shelfscout_search::AvailableFilterCatalog;
    ///
    /// let catalog = AvailableFilterCatalog::empty()
    ///     .with_product_type()
    ///     .with_variant_option("Color")
    ///     .with_metafield("custom", "material");
    /// assert_eq!(
    ///     catalog.capabilities(),
    ///     vec!["productType", "variantOption:Color", "productMetafield:custom.material"]
    /// );
    /// ```
    pub fn capabilities(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.capability_count());
        if self.product_type {
            out.push("productType".to_string());
        }
        out.extend(
            self.variant_options
                .iter()
                .map(|name| format!("variantOption:{}", name)),
        );
        out.extend(
            self.metafields
                .iter()
                .map(|field| format!("productMetafield:{}", field)),
        );
        if self.price {
            out.push("price".to_string());
        }
        if self.tag {
            out.push("tag".to_string());
        }
        if self.available {
            out.push("available".to_string());
        }
        out
    }
}

fn decode_input(input: &Value) -> Option<Value> {
    match input {
        Value::Object(_) => Some(input.clone()),
        Value::String(text) => serde_json::from_str::<Value>(text)
            .ok()
            .filter(Value::is_object),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "products": [],
            "available_filters": [
                {"label": "Product type", "values": {"input_options": [
                    {"input": "{\"productType\":\"Shirts\"}"}
                ]}},
                {"label": "Color", "values": {"label": ["Blue", "Red"], "input_options": [
                    {"input": "{\"variantOption\":{\"name\":\"Color\",\"value\":\"Blue\"}}"},
                    {"input": {"variantOption": {"name": "Color", "value": "Red"}}}
                ]}},
                {"label": "Material", "input_options": [
                    {"input": {"productMetafield": {"namespace": "custom", "key": "material", "value": "Cotton"}}}
                ]},
                {"label": "Price", "values": {"input_options": ["{\"price\":{\"min\":0,\"max\":120}}"]}},
                {"label": "Availability", "values": {"input_options": [{"input": "{\"available\":true}"}]}}
            ]
        })
    }

    #[test]
    fn test_reads_every_capability_kind() {
        let catalog = AvailableFilterCatalog::from_response(&sample_response());

        assert!(catalog.supports_product_type());
        assert!(catalog.supports_price());
        assert!(catalog.supports_available());
        assert!(!catalog.supports_tag());
        assert_eq!(catalog.variant_option_names(), ["Color"]);
        assert_eq!(
            catalog.metafield_for_key("material"),
            Some(&MetafieldKey {
                namespace: "custom".into(),
                key: "material".into()
            })
        );
        assert_eq!(
            catalog.labels(),
            ["Product type", "Color", "Material", "Price", "Availability"]
        );
        assert_eq!(catalog.capability_count(), 5);
    }

    #[test]
    fn test_camel_case_section_and_envelope() {
        let inner = json!({"availableFilters": [
            {"label": "Tag", "values": {"input_options": [{"input": "{\"tag\":\"sale\"}"}]}}
        ]});
        let envelope = json!({
            "jsonrpc": "2.0",
            "result": {"content": [{"type": "text", "text": inner.to_string()}]}
        });
        let catalog = AvailableFilterCatalog::from_response(&envelope);
        assert!(catalog.supports_tag());
        assert_eq!(catalog.capabilities(), vec!["tag"]);
    }

    #[test]
    fn test_malformed_sections_yield_empty_catalog() {
        for body in [
            json!(null),
            json!("text"),
            json!({"products": []}),
            json!({"available_filters": "oops"}),
            json!({"available_filters": [42, {"label": 7}, {"values": {"input_options": ["not json", 3]}}]}),
        ] {
            let catalog = AvailableFilterCatalog::from_response(&body);
            assert!(catalog.is_empty(), "expected empty catalog for {}", body);
        }
    }

    #[test]
    fn test_variant_lookup_is_case_insensitive() {
        let catalog = AvailableFilterCatalog::from_response(&json!({"available_filters": [
            {"label": "Colour", "values": {"input_options": [
                {"input": {"variantOption": {"name": "colour", "value": "blue"}}},
                {"input": {"variantOption": {"name": "COLOUR", "value": "red"}}}
            ]}}
        ]}));
        assert_eq!(catalog.variant_option("Colour"), Some("colour"));
        assert_eq!(catalog.variant_option_names().len(), 1);
        assert_eq!(catalog.variant_option("Size"), None);
    }

    #[test]
    fn test_metafield_lookup_returns_first_pair() {
        let catalog = AvailableFilterCatalog::empty()
            .with_metafield("shopify", "fabric")
            .with_metafield("custom", "Material")
            .with_metafield("legacy", "material");
        let found = catalog.metafield_for_key("MATERIAL").unwrap();
        assert_eq!(found.namespace, "custom");
        assert_eq!(found.key, "Material");
        assert!(catalog.metafield_for_key("materials").is_none());
    }
}
