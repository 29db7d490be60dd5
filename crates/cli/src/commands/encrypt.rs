//! Encrypt command implementation.

use anyhow::{Context, Result};
use krausening_core::Locations;

use crate::formatters::{OutputFormat, get_formatter};

pub fn run(value: &str, locations: &Locations, output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let encryptor = super::encryptor(locations)?;

    let wrapped = encryptor
        .encrypt_value(value)
        .context("Failed to encrypt value")?;

    print!("{}", get_formatter(format).format_transformed(&wrapped)?);
    Ok(())
}
