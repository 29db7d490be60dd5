//! Decrypt command implementation.

use anyhow::{Context, Result};
use krausening_core::Locations;

use crate::formatters::{OutputFormat, get_formatter};

pub fn run(value: &str, locations: &Locations, output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let encryptor = super::encryptor(locations)?;

    let plaintext = encryptor
        .decrypt_value(value)
        .context("Failed to decrypt value; check the master password")?;

    print!("{}", get_formatter(format).format_transformed(&plaintext)?);
    Ok(())
}
