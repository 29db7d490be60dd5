//! File fingerprints and change detection.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::loader::Locations;

/// What a tracked path looked like when last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    exists: bool,
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn observe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                exists: true,
                modified: meta.modified().ok(),
                len: meta.len(),
            },
            Err(_) => Self {
                exists: false,
                modified: None,
                len: 0,
            },
        }
    }
}

/// Every path that could supply one of `file_names`, across the base and
/// extensions locations. Paths need not exist yet; a file appearing later
/// counts as a change.
///
/// Relative locations are resolved against the working directory at arming
/// time, so a later `chdir` does not move the watch.
pub fn tracked_paths<S: AsRef<str>>(locations: &Locations, file_names: &[S]) -> Vec<PathBuf> {
    [locations.base.as_deref(), locations.extensions.as_deref()]
        .into_iter()
        .flatten()
        .flat_map(|dir| {
            file_names
                .iter()
                .map(move |name| absolute_or_raw(dir.join(name.as_ref())))
        })
        .collect()
}

fn absolute_or_raw(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// Last observed fingerprint of each tracked path.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    entries: Vec<(PathBuf, Fingerprint)>,
}

impl WatchState {
    /// Observes `paths` now.
    pub fn arm(paths: Vec<PathBuf>) -> Self {
        let entries = paths
            .into_iter()
            .map(|path| {
                let fingerprint = Fingerprint::observe(&path);
                (path, fingerprint)
            })
            .collect();
        Self { entries }
    }

    /// Tracked paths whose fingerprint differs from the last observation.
    pub fn changed(&self) -> Vec<&Path> {
        self.entries
            .iter()
            .filter(|(path, seen)| Fingerprint::observe(path) != *seen)
            .map(|(path, _)| path.as_path())
            .collect()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(path, _)| path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// An empty watch never reports a change.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
