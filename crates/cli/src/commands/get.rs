//! Get command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use krausening_core::Locations;

use crate::error::CliError;
use crate::formatters::{OutputFormat, get_formatter};

pub fn run(
    file: &str,
    key: Option<&str>,
    locations: Locations,
    subfolder: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let formatter = get_formatter(format);
    let engine = super::load_engine(locations, subfolder);

    let set = engine
        .get_properties(file)
        .ok_or_else(|| CliError::FileNotFound(file.to_string()))?;

    let output = match key {
        Some(key) => {
            let value = set
                .get(key)
                .with_context(|| format!("Failed to read '{}' from {}", key, file))?
                .ok_or_else(|| CliError::KeyNotFound {
                    file: file.to_string(),
                    key: key.to_string(),
                })?;
            formatter.format_value(key, &value)?
        }
        None => {
            let resolved: BTreeMap<String, String> = set
                .resolved()
                .with_context(|| format!("Failed to read {}", file))?
                .into_iter()
                .collect();
            formatter.format_properties(&resolved)?
        }
    };

    print!("{}", output);
    Ok(())
}
