//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format all results as pretty-printed JSON.
//!
//! Does NOT handle:
//! - Other output formats.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use crate::formatters::{FileSummary, Formatter};

/// JSON formatter.
pub struct JsonFormatter;

fn pretty(value: &impl serde::Serialize) -> Result<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

impl Formatter for JsonFormatter {
    fn format_files(&self, files: &[FileSummary]) -> Result<String> {
        pretty(&files)
    }

    fn format_properties(&self, properties: &BTreeMap<String, String>) -> Result<String> {
        pretty(properties)
    }

    fn format_value(&self, key: &str, value: &str) -> Result<String> {
        pretty(&json!({ "key": key, "value": value }))
    }

    fn format_transformed(&self, value: &str) -> Result<String> {
        pretty(&json!({ "value": value }))
    }
}
