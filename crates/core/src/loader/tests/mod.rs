//! Tests for the layered loader.
//!
//! Responsibilities:
//! - Test layer ordering across base, extensions, and override locations.
//! - Test absence semantics for unconfigured, missing, and empty locations.
//! - Test decrypting loads and consistent snapshots under concurrent reloads.
//! - Test `.env` loading.
//!
//! Invariants:
//! - Tests pin locations with `Locations` instead of mutating the process
//!   environment, except where the environment itself is under test.
//! - Tests touching process-global state use `env_lock()` or `serial_test`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use crate::loader::Locations;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// A temporary base/extensions/override tree.
pub struct PropertyTree {
    dir: TempDir,
}

impl PropertyTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for layer in ["base", "extensions", "override"] {
            fs::create_dir_all(dir.path().join(layer)).unwrap();
        }
        Self { dir }
    }

    pub fn base(&self) -> PathBuf {
        self.dir.path().join("base")
    }

    pub fn extensions(&self) -> PathBuf {
        self.dir.path().join("extensions")
    }

    pub fn override_root(&self) -> PathBuf {
        self.dir.path().join("override")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `<layer dir>/<file_name>`, creating parents.
    pub fn write(&self, layer: impl AsRef<Path>, file_name: &str, contents: &str) -> PathBuf {
        let dir = self.dir.path().join(layer);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Locations with base and extensions set, and the override root.
    pub fn locations(&self) -> Locations {
        Locations::new()
            .with_base(self.base())
            .with_extensions(self.extensions())
            .with_override_root(self.override_root())
    }
}
