//! List command implementation.

use anyhow::Result;
use krausening_core::{Locations, ScanOutcome};
use tracing::info;

use crate::formatters::{FileSummary, OutputFormat, get_formatter};

pub fn run(locations: Locations, subfolder: Option<&str>, output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let engine = super::load_engine(locations, subfolder);

    if let Some(report) = engine.last_load() {
        for (layer, outcome) in [
            ("base", &report.base),
            ("extensions", &report.extensions),
            ("override", &report.override_layer),
        ] {
            if let ScanOutcome::Found(files) = outcome {
                info!(layer, files = files.len(), "Layer contributed files");
            }
        }
        for failed in &report.failed_files {
            eprintln!("Warning: could not read {}", failed.display());
        }
    }

    let managed = engine.managed();
    let files: Vec<FileSummary> = managed
        .file_names()
        .into_iter()
        .filter_map(|name| {
            managed.get(name).map(|set| FileSummary {
                file: name.to_string(),
                keys: set.len(),
            })
        })
        .collect();

    print!("{}", get_formatter(format).format_files(&files)?);
    Ok(())
}
