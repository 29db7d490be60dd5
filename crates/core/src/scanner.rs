//! Discovery of `.properties` files within one location.
//!
//! Responsibilities:
//! - List regular files whose names end in `.properties` (case-sensitive).
//! - Report unconfigured, missing, unreadable, and empty locations distinctly.
//!
//! Does NOT handle:
//! - Reading file contents (see `loader::engine`).
//!
//! Invariants:
//! - Scanning never fails; every problem is logged and yields zero files.
//! - Found files are returned sorted by path so loads are deterministic.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{
    BASE_LOCATION_VAR, EXTENSIONS_LOCATION_VAR, OVERRIDE_EXTENSIONS_LOCATION_VAR,
    PROPERTIES_SUFFIX,
};

/// The layer a location contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Base,
    Extensions,
    Override,
}

impl LocationKind {
    /// The environment variable that configures this layer.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Base => BASE_LOCATION_VAR,
            Self::Extensions => EXTENSIONS_LOCATION_VAR,
            Self::Override => OVERRIDE_EXTENSIONS_LOCATION_VAR,
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Result of scanning one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No path was configured for this layer.
    NotConfigured,
    /// A path was configured but does not exist.
    Missing(PathBuf),
    /// The path exists but could not be listed.
    Unreadable(PathBuf),
    /// The path exists but holds no `.properties` files.
    Empty(PathBuf),
    /// The `.properties` files found, sorted by path.
    Found(Vec<PathBuf>),
}

impl ScanOutcome {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Found(files) => files,
            _ => &[],
        }
    }
}

/// Returns true if the file name carries the `.properties` suffix.
pub fn is_properties_file(name: &str) -> bool {
    name.ends_with(PROPERTIES_SUFFIX)
}

/// Lists the `.properties` files at `location`.
pub fn scan_location(location: Option<&Path>, kind: LocationKind) -> ScanOutcome {
    let Some(location) = location.filter(|p| !p.as_os_str().is_empty()) else {
        tracing::warn!(location = %kind, "No location configured");
        return ScanOutcome::NotConfigured;
    };

    if !location.exists() {
        tracing::warn!(
            location = %kind,
            path = %location.display(),
            "Location refers to a path that does not exist"
        );
        return ScanOutcome::Missing(location.to_path_buf());
    }

    let entries = match std::fs::read_dir(location) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(
                location = %kind,
                path = %location.display(),
                error = %e,
                "Could not list location"
            );
            return ScanOutcome::Unreadable(location.to_path_buf());
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_properties_file)
        })
        .collect();

    if files.is_empty() {
        tracing::warn!(
            location = %kind,
            path = %location.display(),
            "No files were found within location"
        );
        return ScanOutcome::Empty(location.to_path_buf());
    }

    files.sort();
    ScanOutcome::Found(files)
}
