//! Centralized constants for the Krausening workspace.
//!
//! Environment variable names, file conventions, and defaults shared by the
//! engine, the consumer layer, and the CLI.

use std::time::Duration;

// =============================================================================
// Location Configuration
// =============================================================================

/// Location of the base set of `.properties` files.
pub const BASE_LOCATION_VAR: &str = "KRAUSENING_BASE";

/// Location of a set of extension `.properties` files layered over the base.
pub const EXTENSIONS_LOCATION_VAR: &str = "KRAUSENING_EXTENSIONS";

/// Root directory holding per-deployment override subfolders.
pub const OVERRIDE_EXTENSIONS_LOCATION_VAR: &str = "KRAUSENING_OVERRIDE_EXTENSIONS";

/// Master password used to decrypt `ENC(...)` property values.
pub const MASTER_PASSWORD_VAR: &str = "KRAUSENING_PASSWORD";

/// Init parameter a hosting container uses to name the override subfolder.
pub const OVERRIDE_EXTENSIONS_SUBFOLDER_PARAM: &str = "override.extensions.subfolder";

/// Disables `.env` loading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// File Conventions
// =============================================================================

/// Only files ending in this suffix (case-sensitive) are loaded.
pub const PROPERTIES_SUFFIX: &str = ".properties";

/// Prefix marking an encrypted property value.
pub const ENCRYPTED_VALUE_PREFIX: &str = "ENC(";

/// Suffix marking an encrypted property value.
pub const ENCRYPTED_VALUE_SUFFIX: &str = ")";

// =============================================================================
// Encryption Layout
// =============================================================================

/// Length of the per-value Argon2 salt.
pub const SALT_LEN: usize = 16;

/// Length of the AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// Length of the AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

// =============================================================================
// Hot Reload
// =============================================================================

/// Default interval between asynchronous reload checks.
pub const DEFAULT_HOT_RELOAD_INTERVAL: Duration = Duration::from_secs(5);

/// Smallest interval the scheduler will honour.
pub const MIN_HOT_RELOAD_INTERVAL: Duration = Duration::from_millis(10);

/// Overrides the default asynchronous reload interval, in milliseconds.
pub const HOT_RELOAD_INTERVAL_VAR: &str = "KRAUSENING_RELOAD_INTERVAL_MS";
