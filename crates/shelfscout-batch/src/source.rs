//! Work-item sources
//!
//! Supported formats, chosen by file extension:
//!
//! - `.txt`: one query per line; blank lines and `#` comments are ignored
//! - `.json`: an array (or an object with a `data` or `items` array) of
//!   strings or objects
//! - `.jsonl`: one string or object per line; unreadable lines are skipped
//!   with a warning
//!
//! Objects carry the query in `input_text` (or `query`) and may carry
//! `prior_output` from an earlier run. Row numbers are 1-based positions in
//! the source: the line number for line formats, the array index plus one
//! for `.json`.

use crate::error::BatchError;
use serde_json::Value;
use shelfscout_domain::WorkItem;
use std::path::Path;
use tracing::{info, warn};

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// One query per line
    Text,
    /// JSON array
    Json,
    /// JSON Lines
    JsonLines,
}

impl SourceFormat {
    /// Detect the format from a file extension
    pub fn detect(path: &Path) -> Result<Self, BatchError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "txt" => Ok(SourceFormat::Text),
            "json" => Ok(SourceFormat::Json),
            "jsonl" | "ndjson" => Ok(SourceFormat::JsonLines),
            other => Err(BatchError::Source(format!(
                "unsupported input format '.{}' (expected .txt, .json or .jsonl)",
                other
            ))),
        }
    }
}

/// Load work items from a file
pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<WorkItem>, BatchError> {
    let path = path.as_ref();
    let format = SourceFormat::detect(path)?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| BatchError::Source(format!("cannot read {}: {}", path.display(), e)))?;

    let items = parse_items(&text, format)?;
    info!(path = %path.display(), ?format, items = items.len(), "Loaded work items");
    Ok(items)
}

/// Parse work items from text in the given format
pub fn parse_items(text: &str, format: SourceFormat) -> Result<Vec<WorkItem>, BatchError> {
    match format {
        SourceFormat::Text => Ok(parse_text(text)),
        SourceFormat::Json => parse_json(text),
        SourceFormat::JsonLines => Ok(parse_json_lines(text)),
    }
}

fn parse_text(text: &str) -> Vec<WorkItem> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(WorkItem::new(index + 1, line))
            }
        })
        .collect()
}

fn parse_json(text: &str) -> Result<Vec<WorkItem>, BatchError> {
    let value: Value = serde_json::from_str(text)?;
    let entries = match &value {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(obj) => match obj.get("data").or_else(|| obj.get("items")) {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => std::slice::from_ref(&value),
        },
        _ => {
            return Err(BatchError::Source(
                "JSON input must be an array or an object".to_string(),
            ))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            item_from_value(index + 1, entry)
                .ok_or_else(|| BatchError::Source(format!("entry {} has no input_text or query", index + 1)))
        })
        .collect()
}

fn parse_json_lines(text: &str) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(entry) => match item_from_value(line_no, &entry) {
                Some(item) => items.push(item),
                None => warn!(line = line_no, "Skipping entry without input_text or query"),
            },
            Err(e) => warn!(line = line_no, "Skipping invalid JSON: {}", e),
        }
    }
    items
}

fn item_from_value(row_number: usize, entry: &Value) -> Option<WorkItem> {
    match entry {
        Value::String(text) => Some(WorkItem::new(row_number, text.trim())),
        Value::Object(obj) => {
            let input = obj
                .get("input_text")
                .or_else(|| obj.get("query"))
                .and_then(Value::as_str)?;
            let mut item = WorkItem::new(row_number, input.trim());
            match obj.get("prior_output") {
                Some(Value::String(output)) => item = item.with_prior_output(output.as_str()),
                Some(Value::Null) | None => {}
                Some(other) => item = item.with_prior_output(other.to_string()),
            }
            Some(item)
        }
        _ => None,
    }
}
