//! Layered, optionally encrypted `.properties` configuration.
//!
//! Property files are loaded from a base location, overlaid by an extensions
//! location and then by a per-deployment override subfolder. Values wrapped
//! in `ENC(...)` are decrypted when a master password is configured. Several
//! files can be merged into one view under a chosen policy and kept fresh by
//! synchronous or asynchronous hot reload.

pub mod constants;
pub mod consumer;
pub mod encryption;
pub mod error;
pub mod loader;
pub mod merge;
pub mod properties;
pub mod registry;
pub mod reload;
pub mod scanner;

pub use consumer::{ConfigHandle, ConfigSource, KrauseningFactory};
pub use encryption::{EncryptionError, PropertyEncryptor};
pub use error::{KrauseningError, Result};
pub use loader::{Krausening, LoadReport, LocationSource, Locations, ManagedProperties};
pub use merge::{MergePolicy, MergedProperties};
pub use properties::PropertySet;
pub use registry::InstanceRegistry;
pub use reload::{HotReload, ReloadMode};
pub use scanner::{LocationKind, ScanOutcome};
