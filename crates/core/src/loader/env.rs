//! Location configuration from environment variables.
//!
//! Responsibilities:
//! - Read the `KRAUSENING_*` environment variables into a `Locations` value.
//! - Let embedding applications pin locations instead (`LocationSource::Fixed`).
//! - Gate optional `.env` loading behind `DOTENV_DISABLED`.
//!
//! Does NOT handle:
//! - Scanning or loading the locations (see `engine.rs`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - `LocationSource::Environment` is re-read on every load, never cached.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::constants::{
    BASE_LOCATION_VAR, DOTENV_DISABLED_VAR, EXTENSIONS_LOCATION_VAR, MASTER_PASSWORD_VAR,
    OVERRIDE_EXTENSIONS_LOCATION_VAR,
};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// The directories and master password used by one load pass.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    /// Primary, required directory of property files.
    pub base: Option<PathBuf>,
    /// Optional directory whose files overlay the base.
    pub extensions: Option<PathBuf>,
    /// Root under which override subfolders live.
    pub override_root: Option<PathBuf>,
    /// Master password enabling decryption of `ENC(...)` values.
    pub master_password: Option<SecretString>,
}

impl Locations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads all locations from the `KRAUSENING_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            base: env_var_or_none(BASE_LOCATION_VAR).map(PathBuf::from),
            extensions: env_var_or_none(EXTENSIONS_LOCATION_VAR).map(PathBuf::from),
            override_root: env_var_or_none(OVERRIDE_EXTENSIONS_LOCATION_VAR).map(PathBuf::from),
            master_password: env_var_or_none(MASTER_PASSWORD_VAR)
                .map(|p| SecretString::new(p.into())),
        }
    }

    /// Set the base location.
    pub fn with_base(mut self, path: impl Into<PathBuf>) -> Self {
        self.base = Some(path.into());
        self
    }

    /// Set the extensions location.
    pub fn with_extensions(mut self, path: impl Into<PathBuf>) -> Self {
        self.extensions = Some(path.into());
        self
    }

    /// Set the override root.
    pub fn with_override_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_root = Some(path.into());
        self
    }

    /// Set the master password.
    pub fn with_master_password(mut self, password: impl Into<String>) -> Self {
        self.master_password = Some(SecretString::new(password.into().into()));
        self
    }
}

/// Where an engine obtains its locations on each load.
#[derive(Debug, Clone, Default)]
pub enum LocationSource {
    /// Re-read the `KRAUSENING_*` environment variables on every load.
    #[default]
    Environment,
    /// Always use these locations.
    Fixed(Locations),
}

impl LocationSource {
    pub fn resolve(&self) -> Locations {
        match self {
            Self::Environment => Locations::from_env(),
            Self::Fixed(locations) => locations.clone(),
        }
    }
}

impl From<Locations> for LocationSource {
    fn from(locations: Locations) -> Self {
        Self::Fixed(locations)
    }
}

/// Errors raised while loading a `.env` file.
#[derive(Error, Debug)]
pub enum DotenvError {
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    Parse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    Io { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    Unknown,
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Load `KRAUSENING_*` variables from a `.env` file if present.
///
/// Missing `.env` files are silently ignored, as is everything when
/// `DOTENV_DISABLED` is `true` or `1`.
///
/// # Errors
///
/// Returns an error if the `.env` file exists but has invalid syntax or
/// cannot be read.
pub fn load_dotenv() -> Result<(), DotenvError> {
    if dotenv_disabled() {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(io_err)) if io_err.kind() == ErrorKind::NotFound => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => Err(DotenvError::Parse { error_index: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(DotenvError::Io {
            kind: io_err.kind(),
        }),
        Err(_) => Err(DotenvError::Unknown),
    }
}
