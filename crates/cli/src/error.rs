//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map library and CLI errors to those exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use krausening_core::{EncryptionError, KrauseningError};
use thiserror::Error;

/// Structured exit codes for the `krausening` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// A property file or key was not found in any location.
    NotFound = 4,

    /// Duplicate keys under fail-on-duplicate, or a value that cannot be decrypted.
    ///
    /// Scripts should fix the property files or the password, not retry.
    MergeOrDecryptionFailed = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// Failures detected by the CLI itself rather than the library.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Property file '{0}' was not loaded from any location")]
    FileNotFound(String),

    #[error("Key '{key}' is not defined in {file}")]
    KeyNotFound { file: String, key: String },

    #[error("A master password is required; pass --password or set {0}")]
    PasswordRequired(&'static str),
}

impl From<&KrauseningError> for ExitCode {
    fn from(err: &KrauseningError) -> Self {
        match err {
            KrauseningError::Decryption { .. }
            | KrauseningError::DuplicateKeys { .. }
            | KrauseningError::Encryption(_) => ExitCode::MergeOrDecryptionFailed,
            KrauseningError::MissingSources { .. } => ExitCode::NotFound,
            KrauseningError::NoSources
            | KrauseningError::InvalidValue { .. }
            | KrauseningError::Io(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&CliError> for ExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::FileNotFound(_) | CliError::KeyNotFound { .. } => ExitCode::NotFound,
            CliError::PasswordRequired(_) => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<KrauseningError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<CliError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<EncryptionError>().is_some() {
                return ExitCode::MergeOrDecryptionFailed;
            }
        }

        ExitCode::GeneralError
    }
}
