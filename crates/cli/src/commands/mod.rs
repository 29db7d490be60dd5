//! CLI command implementations.

pub mod decrypt;
pub mod encrypt;
pub mod get;
pub mod list;
pub mod merge;

use std::sync::Arc;

use anyhow::Result;
use krausening_core::constants::MASTER_PASSWORD_VAR;
use krausening_core::{InstanceRegistry, Krausening, Locations, PropertyEncryptor};

use crate::error::CliError;

/// Loads the engine for `subfolder` (the default engine when `None`).
pub fn load_engine(locations: Locations, subfolder: Option<&str>) -> Arc<Krausening> {
    InstanceRegistry::new(locations).instance(subfolder)
}

/// An encryptor for the configured master password.
pub fn encryptor(locations: &Locations) -> Result<PropertyEncryptor> {
    let password = locations
        .master_password
        .clone()
        .ok_or(CliError::PasswordRequired(MASTER_PASSWORD_VAR))?;
    Ok(PropertyEncryptor::new(password))
}
