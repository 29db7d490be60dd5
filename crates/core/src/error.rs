//! Error types for property loading, merging, and reading.
//!
//! Responsibilities:
//! - Define the error variants surfaced to callers of the engine.
//! - Wrap lower-level encryption failures with the offending key.
//!
//! Does NOT handle:
//! - Missing or empty locations, which are logged and tolerated.
//! - Per-file read failures during a load, which are logged and skipped.
//!
//! Invariants:
//! - Decryption and duplicate-key errors always name the offending key(s).
//! - Error messages never include decrypted values.

use thiserror::Error;

use crate::encryption::EncryptionError;

/// Errors surfaced by the Krausening engine and its consumers.
#[derive(Error, Debug)]
pub enum KrauseningError {
    #[error("Failed to decrypt property '{key}': {source}")]
    Decryption {
        key: String,
        #[source]
        source: EncryptionError,
    },

    #[error("The following duplicate property key(s) were found: {}", .keys.join(", "))]
    DuplicateKeys { keys: Vec<String> },

    #[error("No property files were declared for this configuration")]
    NoSources,

    #[error("Declared property file(s) were not loaded from any location: {}", .files.join(", "))]
    MissingSources { files: Vec<String> },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Encryption error: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KrauseningError>;
