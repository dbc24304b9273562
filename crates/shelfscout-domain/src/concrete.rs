//! Concrete filters - the catalog endpoint's own filter vocabulary
//!
//! The endpoint accepts a list of single-key objects, each naming exactly one
//! filter kind. [`ConcreteFilter`] is the closed set of those kinds; its serde
//! representation (externally tagged, camelCase) is the wire shape:
//!
//! ```text
//! {"productType": "Shirts"}
//! {"variantOption": {"name": "Color", "value": "Blue"}}
//! {"price": {"min": 0.0, "max": 50.0}}
//! {"tag": "sale"}
//! {"productMetafield": {"namespace": "custom", "key": "material", "value": "Cotton"}}
//! {"available": true}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One filter entry sent to the targeted search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConcreteFilter {
    /// Restrict to a product type
    ProductType(String),
    /// Restrict to variants carrying an option value (Color, Size, ...)
    VariantOption(VariantOption),
    /// Restrict to a price window
    Price(PriceFilter),
    /// Restrict to products carrying a tag
    Tag(String),
    /// Restrict on a product metafield
    ProductMetafield(ProductMetafield),
    /// Restrict on stock availability
    Available(bool),
}

impl ConcreteFilter {
    /// Wire name of the filter kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConcreteFilter::ProductType(_) => "productType",
            ConcreteFilter::VariantOption(_) => "variantOption",
            ConcreteFilter::Price(_) => "price",
            ConcreteFilter::Tag(_) => "tag",
            ConcreteFilter::ProductMetafield(_) => "productMetafield",
            ConcreteFilter::Available(_) => "available",
        }
    }

    /// Shorthand for a variant option filter
    pub fn variant_option(name: impl Into<String>, value: impl Into<String>) -> Self {
        ConcreteFilter::VariantOption(VariantOption {
            name: name.into(),
            value: value.into(),
        })
    }
}

impl fmt::Display for ConcreteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteFilter::ProductType(value) => write!(f, "productType={}", value),
            ConcreteFilter::VariantOption(option) => {
                write!(f, "variantOption {}={}", option.name, option.value)
            }
            ConcreteFilter::Price(price) => write!(f, "price {}..{}", price.min, price.max),
            ConcreteFilter::Tag(tag) => write!(f, "tag={}", tag),
            ConcreteFilter::ProductMetafield(field) => write!(
                f,
                "productMetafield {}.{}={}",
                field.namespace, field.key, field.value
            ),
            ConcreteFilter::Available(available) => write!(f, "available={}", available),
        }
    }
}

/// Variant option name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Option name as advertised by the endpoint (e.g. "Color")
    pub name: String,
    /// Option value (e.g. "Blue")
    pub value: String,
}

/// Price window; both bounds are always sent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceFilter {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

/// Metafield filter addressed by namespace and key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetafield {
    /// Metafield namespace, copied verbatim from the advertised capability
    pub namespace: String,
    /// Metafield key, copied verbatim from the advertised capability
    pub key: String,
    /// Requested value
    pub value: String,
}
