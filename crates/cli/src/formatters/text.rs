//! Text formatter implementation.
//!
//! Responsibilities:
//! - Format results for terminals and shell pipelines.
//!
//! Does NOT handle:
//! - Other output formats.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::formatters::{FileSummary, Formatter};

/// Text formatter.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_files(&self, files: &[FileSummary]) -> Result<String> {
        if files.is_empty() {
            return Ok("No property files found.\n".to_string());
        }

        let mut output = String::from("FILE\tKEYS\n");
        for summary in files {
            output.push_str(&format!("{}\t{}\n", summary.file, summary.keys));
        }
        Ok(output)
    }

    fn format_properties(&self, properties: &BTreeMap<String, String>) -> Result<String> {
        Ok(properties
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect())
    }

    fn format_value(&self, _key: &str, value: &str) -> Result<String> {
        Ok(format!("{}\n", value))
    }

    fn format_transformed(&self, value: &str) -> Result<String> {
        Ok(format!("{}\n", value))
    }
}
