//! Shared test utilities for krausening CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide an on-disk base/extensions/override property tree.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - No `KRAUSENING_*` variable leaks in from the host.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `krausening` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Location and password env vars are cleared to ensure no leakage from the host.
pub fn krausening_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("krausening");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("KRAUSENING_BASE")
        .env_remove("KRAUSENING_EXTENSIONS")
        .env_remove("KRAUSENING_OVERRIDE_EXTENSIONS")
        .env_remove("KRAUSENING_PASSWORD")
        .env_remove("RUST_LOG");

    cmd
}

/// A temporary base/extensions/override layout.
pub struct PropertyTree {
    dir: TempDir,
}

impl PropertyTree {
    pub fn new() -> Self {
        let tree = Self {
            dir: TempDir::new().unwrap(),
        };
        for layer in ["base", "extensions", "override"] {
            fs::create_dir_all(tree.dir.path().join(layer)).unwrap();
        }
        tree
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layer(&self, layer: &str) -> PathBuf {
        self.dir.path().join(layer)
    }

    /// Writes `contents` to `<layer>/<file>`, creating nested layers as needed.
    pub fn write(&self, layer: &str, file: &str, contents: &str) -> &Self {
        let dir = self.layer(layer);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        self
    }

    /// A hermetic command pointed at this tree's base, extensions and override root.
    pub fn cmd(&self) -> Command {
        let mut cmd = krausening_cmd();
        cmd.arg("--base")
            .arg(self.layer("base"))
            .arg("--extensions")
            .arg(self.layer("extensions"))
            .arg("--override-root")
            .arg(self.layer("override"));
        cmd
    }
}
