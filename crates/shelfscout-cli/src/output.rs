//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use shelfscout_batch::{BatchMetrics, Progress};
use shelfscout_domain::{IntentExtraction, ItemRecord, ReducedProduct};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extracted intent.
    pub fn format_intent(&self, intent: &IntentExtraction) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(intent)?),
            OutputFormat::Quiet => Ok(intent.clean_query.clone()),
            OutputFormat::Table => Ok(self.intent_table(intent)),
        }
    }

    fn intent_table(&self, intent: &IntentExtraction) -> String {
        let filters = &intent.filters;
        let mut rows = vec![
            ("Clean query", intent.clean_query.clone()),
            ("Keywords", intent.keywords.join(", ")),
            ("Confidence", format!("{:.2}", intent.confidence)),
        ];
        if let Some(product_type) = &filters.product_type {
            rows.push(("Product type", product_type.clone()));
        }
        for (label, values) in [
            ("Colors", &filters.colors),
            ("Sizes", &filters.sizes),
            ("Materials", &filters.materials),
            ("Brands", &filters.brands),
            ("Sales", &filters.sales),
        ] {
            if !values.is_empty() {
                rows.push((label, values.join(", ")));
            }
        }
        if let Some(price) = &filters.price {
            rows.push(("Price", price_span(price.min, price.max, None)));
        }
        if let Some(available) = filters.available {
            rows.push(("In stock only", available.to_string()));
        }
        if !intent.reasoning.is_empty() {
            rows.push(("Reasoning", intent.reasoning.clone()));
        }
        key_value_table(&rows)
    }

    /// Format the record of one processed query.
    pub fn format_record(&self, record: &ItemRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(self.record_line(record)),
            OutputFormat::Table => Ok(self.record_table(record)),
        }
    }

    fn record_line(&self, record: &ItemRecord) -> String {
        match (&record.failure, record.is_success()) {
            (None, true) => format!("{}\tok\t{}", record.row_number, record.product_count()),
            (Some(kind), true) => format!("{}\tdegraded\t{}", record.row_number, kind),
            (kind, false) => format!(
                "{}\tfailed\t{}",
                record.row_number,
                kind.map(|k| k.as_str()).unwrap_or("unknown")
            ),
        }
    }

    fn record_table(&self, record: &ItemRecord) -> String {
        let mut rows = vec![("Input", record.input_text.clone())];
        if let Some(query) = &record.discovery_query {
            rows.push(("Discovery query", query.clone()));
        }
        if !record.available_filters.is_empty() {
            rows.push(("Available filters", record.available_filters.join(", ")));
        }
        if let Some(query) = &record.targeted_query {
            rows.push(("Targeted query", query.clone()));
        }
        if !record.filters_used.is_empty() {
            let filters: Vec<String> = record.filters_used.iter().map(|f| f.to_string()).collect();
            rows.push(("Filters used", filters.join(", ")));
        }
        if let Some(reduction) = &record.reduction {
            rows.push((
                "Reduction",
                format!(
                    "{} -> {} bytes ({:.1}%)",
                    reduction.original_size, reduction.reduced_size, reduction.reduction_percent
                ),
            ));
        }
        rows.push(("Time", format!("{} ms", record.processing_time_ms)));

        let mut out = key_value_table(&rows);
        out.push('\n');

        match (&record.error_message, record.is_success()) {
            (Some(message), true) => out.push_str(&self.warning(message)),
            (Some(message), false) => out.push_str(&self.error(message)),
            (None, _) => {}
        }

        if let Some(result) = &record.result {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.products_table(&result.products));
        }
        out
    }

    fn products_table(&self, products: &[ReducedProduct]) -> String {
        if products.is_empty() {
            return self.colorize("No products found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Title", "Type", "Price", "Sizes", "Available"]);

        for product in products {
            builder.push_record([
                product.title.clone(),
                product.product_type.clone().unwrap_or_default(),
                price_span(product.price_min, product.price_max, product.currency.as_deref()),
                product.sizes.join(" "),
                match product.available {
                    Some(true) => "yes".to_string(),
                    Some(false) => "no".to_string(),
                    None => "-".to_string(),
                },
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format batch metrics.
    pub fn format_metrics(&self, metrics: &BatchMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(metrics)?),
            OutputFormat::Quiet => Ok(format!("{}/{}", metrics.succeeded, metrics.processed)),
            OutputFormat::Table => Ok(metrics.summary()),
        }
    }

    /// One line of batch progress.
    pub fn progress(&self, progress: &Progress<'_>) -> String {
        let record = progress.record;
        let prefix = format!("[{}/{}] row {}", progress.processed, progress.total, record.row_number);
        match (&record.error_message, record.is_success()) {
            (None, true) => self.success(&format!("{}: {} product(s)", prefix, record.product_count())),
            (Some(message), true) => self.warning(&format!("{}: {}", prefix, message)),
            (message, false) => self.error(&format!(
                "{}: {}",
                prefix,
                message.as_deref().unwrap_or("unknown error")
            )),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn key_value_table(rows: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key.to_string(), value.clone()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Render a price span such as `49.00-59.00 USD`.
pub fn price_span(min: Option<f64>, max: Option<f64>, currency: Option<&str>) -> String {
    let span = match (min, max) {
        (Some(min), Some(max)) if (min - max).abs() < f64::EPSILON => format!("{:.2}", min),
        (Some(min), Some(max)) => format!("{:.2}-{:.2}", min, max),
        (Some(min), None) => format!("from {:.2}", min),
        (None, Some(max)) => format!("up to {:.2}", max),
        (None, None) => return "-".to_string(),
    };
    match currency {
        Some(currency) => format!("{} {}", span, currency),
        None => span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfscout_domain::{
        ConcreteFilter, FailureKind, ItemStatus, ReducedSearchResult, SemanticFilters, WorkItem,
    };

    fn create_test_record() -> ItemRecord {
        let mut record = ItemRecord::for_item(&WorkItem::new(3, "blue shirts"));
        record.status = ItemStatus::Success;
        record.discovery_query = Some("shirts".to_string());
        record.targeted_query = Some("blue shirts".to_string());
        record.filters_used = vec![ConcreteFilter::variant_option("Color", "Blue")];
        record.result = Some(ReducedSearchResult {
            products: vec![ReducedProduct {
                id: "p1".to_string(),
                title: "Oxford Shirt".to_string(),
                price_min: Some(49.0),
                price_max: Some(59.0),
                currency: Some("USD".to_string()),
                sizes: vec!["S".to_string(), "M".to_string()],
                available: Some(true),
                ..ReducedProduct::default()
            }],
            pagination: None,
        });
        record
    }

    fn create_test_intent() -> IntentExtraction {
        IntentExtraction {
            keywords: vec!["blue".to_string(), "shirts".to_string()],
            filters: SemanticFilters {
                product_type: Some("shirts".to_string()),
                colors: vec!["blue".to_string()],
                ..SemanticFilters::default()
            },
            clean_query: "blue shirts".to_string(),
            confidence: 0.9,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_record_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains("Targeted query"));
        assert!(output.contains("Oxford Shirt"));
        assert!(output.contains("49.00-59.00 USD"));
        assert!(output.contains("S M"));
    }

    #[test]
    fn test_record_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        let parsed: ItemRecord = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, create_test_record());
    }

    #[test]
    fn test_record_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_record(&create_test_record()).unwrap(), "3\tok\t1");

        let mut failed = ItemRecord::for_item(&WorkItem::new(4, "x"));
        failed.failure = Some(FailureKind::Discovery);
        assert_eq!(formatter.format_record(&failed).unwrap(), "4\tfailed\tdiscovery");
    }

    #[test]
    fn test_failed_record_shows_error() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut record = ItemRecord::for_item(&WorkItem::new(1, "socks"));
        record.failure = Some(FailureKind::Discovery);
        record.error_message = Some("discovery search failed: timeout".to_string());
        let output = formatter.format_record(&record).unwrap();
        assert!(output.contains("✗ discovery search failed: timeout"));
        assert!(!output.contains("No products found"));
    }

    #[test]
    fn test_intent_formats() {
        let intent = create_test_intent();
        let table = Formatter::new(OutputFormat::Table, false).format_intent(&intent).unwrap();
        assert!(table.contains("Product type"));
        assert!(table.contains("Colors"));
        assert!(!table.contains("Materials"));

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_intent(&intent).unwrap();
        assert_eq!(quiet, "blue shirts");

        let json = Formatter::new(OutputFormat::Json, false).format_intent(&intent).unwrap();
        assert!(json.contains("\"cleanQuery\": \"blue shirts\""));
    }

    #[test]
    fn test_metrics_formats() {
        let mut metrics = BatchMetrics::new();
        metrics.record_item(&create_test_record());
        let quiet = Formatter::new(OutputFormat::Quiet, false).format_metrics(&metrics).unwrap();
        assert_eq!(quiet, "1/1");
        let table = Formatter::new(OutputFormat::Table, false).format_metrics(&metrics).unwrap();
        assert!(table.contains("Processed: 1"));
    }

    #[test]
    fn test_progress_line() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let record = create_test_record();
        let line = formatter.progress(&Progress {
            processed: 2,
            total: 5,
            record: &record,
        });
        assert_eq!(line, "✓ [2/5] row 3: 1 product(s)");
    }

    #[test]
    fn test_price_span() {
        assert_eq!(price_span(Some(10.0), Some(10.0), Some("EUR")), "10.00 EUR");
        assert_eq!(price_span(None, Some(50.0), None), "up to 50.00");
        assert_eq!(price_span(None, None, Some("USD")), "-");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
