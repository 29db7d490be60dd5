//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide text and JSON renderings of command results.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - Text output for property maps is `key=value`, one entry per line, sorted.
//! - JSON output is always valid JSON, including for empty results (`{}` or `[]`).
//! - Every rendering ends with a newline.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: text, json", s),
        }
    }
}

/// One loaded logical file, as shown by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file: String,
    pub keys: usize,
}

/// Trait for formatting command output.
pub trait Formatter {
    /// Format the loaded files.
    fn format_files(&self, files: &[FileSummary]) -> Result<String>;

    /// Format a whole property map.
    fn format_properties(&self, properties: &BTreeMap<String, String>) -> Result<String>;

    /// Format one key and its value.
    fn format_value(&self, key: &str, value: &str) -> Result<String>;

    /// Format the result of `encrypt` or `decrypt`.
    fn format_transformed(&self, value: &str) -> Result<String>;
}

/// Get a formatter for the specified format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests;
