//! Semantic-to-concrete filter adapter
//!
//! Maps [`SemanticFilters`] onto the endpoint's [`ConcreteFilter`] vocabulary,
//! emitting a filter only when the discovery catalog advertised the matching
//! capability. Attributes without a supported counterpart are dropped, never
//! substituted: materials do not fall back to tags, sizes do not fall back to
//! a generic option.
//!
//! Emission order is fixed: product type, colors, sizes, materials, price,
//! sales tags, availability.

use crate::catalog::AvailableFilterCatalog;
use serde::Serialize;
use shelfscout_domain::{ConcreteFilter, PriceFilter, ProductMetafield, SemanticFilters};
use std::collections::HashSet;
use std::fmt;

/// Variant option name for colors
pub const COLOR_OPTION: &str = "Color";

/// Variant option name for sizes
pub const SIZE_OPTION: &str = "Size";

/// Metafield key for materials
pub const MATERIAL_KEY: &str = "material";

/// Why a semantic attribute produced no concrete filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The catalog does not advertise the capability
    Unsupported,
    /// Price range has no upper bound
    MissingPriceMax,
    /// Price range minimum exceeds its maximum
    InvalidPriceRange,
    /// The endpoint has no filter kind for this attribute
    NoConcreteKind,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DropReason::Unsupported => "not advertised by the catalog",
            DropReason::MissingPriceMax => "price has no maximum",
            DropReason::InvalidPriceRange => "price minimum exceeds maximum",
            DropReason::NoConcreteKind => "no concrete filter kind",
        };
        f.write_str(text)
    }
}

/// A semantic attribute that was not translated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedAttribute {
    /// Semantic attribute name (`colors`, `materials`, ...)
    pub attribute: String,
    /// Reason for the drop
    pub reason: DropReason,
}

impl fmt::Display for DroppedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attribute, self.reason)
    }
}

/// Adapter output together with what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adaptation {
    /// Concrete filters, in emission order
    pub filters: Vec<ConcreteFilter>,
    /// Attributes that produced nothing
    pub dropped: Vec<DroppedAttribute>,
}

/// Stateless semantic-to-concrete mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterAdapter;

impl FilterAdapter {
    /// Translate semantic filters into the concrete filters the catalog accepts
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfscout_domain::{ConcreteFilter, SemanticFilters};
    /// use shelfscout_search::{AvailableFilterCatalog, FilterAdapter};
    ///
    /// let filters: SemanticFilters =
    ///     serde_json::from_str(r#"{"colors": ["blue"], "productType": "shirts"}"#).unwrap();
    /// let catalog = AvailableFilterCatalog::empty()
    ///     .with_product_type()
    ///     .with_variant_option("Color");
    ///
    /// assert_eq!(
    ///     FilterAdapter::adapt(&filters, &catalog),
    ///     vec![
    ///         ConcreteFilter::ProductType("Shirts".into()),
    ///         ConcreteFilter::variant_option("Color", "Blue"),
    ///     ]
    /// );
    /// ```
    pub fn adapt(filters: &SemanticFilters, catalog: &AvailableFilterCatalog) -> Vec<ConcreteFilter> {
        Self::adapt_with_report(filters, catalog).filters
    }

    /// Same as [`FilterAdapter::adapt`], also reporting dropped attributes
    pub fn adapt_with_report(
        filters: &SemanticFilters,
        catalog: &AvailableFilterCatalog,
    ) -> Adaptation {
        let mut out = Adaptation::default();

        let product_type = filters
            .product_type
            .as_deref()
            .map(title_case)
            .filter(|p| !p.is_empty());
        if let Some(product_type) = product_type {
            if catalog.supports_product_type() {
                out.filters.push(ConcreteFilter::ProductType(product_type));
            } else {
                out.record_drop("productType", DropReason::Unsupported);
            }
        }

        if !filters.colors.is_empty() {
            match catalog.variant_option(COLOR_OPTION) {
                Some(name) => {
                    for color in distinct(&filters.colors, title_case) {
                        out.filters.push(ConcreteFilter::variant_option(name, color));
                    }
                }
                None => out.record_drop("colors", DropReason::Unsupported),
            }
        }

        if !filters.sizes.is_empty() {
            match catalog.variant_option(SIZE_OPTION) {
                Some(name) => {
                    for size in distinct(&filters.sizes, |s| s.trim().to_uppercase()) {
                        out.filters.push(ConcreteFilter::variant_option(name, size));
                    }
                }
                None => out.record_drop("sizes", DropReason::Unsupported),
            }
        }

        if !filters.materials.is_empty() {
            match catalog.metafield_for_key(MATERIAL_KEY) {
                Some(field) => {
                    for material in distinct(&filters.materials, title_case) {
                        out.filters
                            .push(ConcreteFilter::ProductMetafield(ProductMetafield {
                                namespace: field.namespace.clone(),
                                key: field.key.clone(),
                                value: material,
                            }));
                    }
                }
                None => out.record_drop("materials", DropReason::Unsupported),
            }
        }

        if let Some(price) = filters.price {
            if !catalog.supports_price() {
                out.record_drop("price", DropReason::Unsupported);
            } else {
                match price.max {
                    None => out.record_drop("price", DropReason::MissingPriceMax),
                    Some(max) => {
                        let min = price.min.unwrap_or(0.0);
                        if min > max {
                            out.record_drop("price", DropReason::InvalidPriceRange);
                        } else {
                            out.filters.push(ConcreteFilter::Price(PriceFilter { min, max }));
                        }
                    }
                }
            }
        }

        if !filters.sales.is_empty() {
            if catalog.supports_tag() {
                for tag in distinct(&filters.sales, |s| s.trim().to_string()) {
                    out.filters.push(ConcreteFilter::Tag(tag));
                }
            } else {
                out.record_drop("sales", DropReason::Unsupported);
            }
        }

        if let Some(available) = filters.available {
            if catalog.supports_available() {
                out.filters.push(ConcreteFilter::Available(available));
            } else {
                out.record_drop("available", DropReason::Unsupported);
            }
        }

        if !filters.brands.is_empty() {
            out.record_drop("brands", DropReason::NoConcreteKind);
        }
        for attribute in filters.extra.keys() {
            out.record_drop(attribute, DropReason::NoConcreteKind);
        }

        out
    }
}

impl Adaptation {
    fn record_drop(&mut self, attribute: &str, reason: DropReason) {
        self.dropped.push(DroppedAttribute {
            attribute: attribute.to_string(),
            reason,
        });
    }
}

/// Normalise values, skipping blanks and later duplicates
fn distinct(values: &[String], normalise: impl Fn(&str) -> String) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| normalise(v))
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Capitalise each word and lowercase the rest, collapsing whitespace
///
/// Hyphenated words are capitalised per segment ("t-shirt" becomes "T-Shirt").
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalise)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
