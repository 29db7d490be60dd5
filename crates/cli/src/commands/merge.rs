//! Merge command implementation.

use anyhow::{Context, Result};
use krausening_core::{ConfigSource, KrauseningFactory, Locations, MergePolicy, MergedProperties};

use crate::formatters::{OutputFormat, get_formatter};

pub fn run(
    files: &[String],
    policy: MergePolicy,
    strict: bool,
    locations: Locations,
    subfolder: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    let mut source = ConfigSource::new(files.iter().cloned())
        .with_merge_policy(policy)
        .strict(strict);
    if let Some(subfolder) = subfolder {
        source = source.with_override_subfolder(subfolder);
    }

    let factory = KrauseningFactory::new(locations);
    let handle = factory
        .create(source)
        .with_context(|| format!("Failed to merge {} with policy {}", files.join(", "), policy))?;
    let snapshot = handle.properties()?;
    let merged = MergedProperties::clone(&snapshot).into_map();

    print!("{}", get_formatter(format).format_properties(&merged)?);
    Ok(())
}
