//! The layered property loading engine.
//!
//! Responsibilities:
//! - Load base, extensions, and override-subfolder locations in that order,
//!   overlaying each file onto the set for its logical file name.
//! - Create decrypting property sets when a master password is configured.
//! - Publish each load as a new immutable collection.
//!
//! Does NOT handle:
//! - Choosing which engine a consumer uses (see `registry.rs`).
//! - Watching files for changes (see `reload`).
//!
//! Invariants:
//! - Every load rebuilds the whole collection; readers see either the
//!   previous collection or the new one, never a partial rebuild.
//! - Without a base location nothing is loaded, not even extensions.
//! - Later layers win key-by-key: override > extensions > base.
//! - A file that cannot be read is skipped; the rest of the load continues.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::env::{LocationSource, Locations};
use crate::constants::{BASE_LOCATION_VAR, MASTER_PASSWORD_VAR};
use crate::encryption::PropertyEncryptor;
use crate::error::Result;
use crate::merge::{MergePolicy, MergedProperties};
use crate::properties::PropertySet;
use crate::scanner::{LocationKind, ScanOutcome, scan_location};

/// All property sets produced by one load, keyed by logical file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedProperties {
    files: HashMap<String, Arc<PropertySet>>,
}

impl ManagedProperties {
    /// Returns the set for a logical file name, or `None` if no location
    /// produced a file with that name.
    pub fn get(&self, file_name: &str) -> Option<Arc<PropertySet>> {
        self.files.get(file_name).cloned()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    /// Logical file names, sorted.
    pub fn file_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The subset of `file_names` that this collection does not hold.
    pub fn missing<S: AsRef<str>>(&self, file_names: &[S]) -> Vec<String> {
        file_names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect()
    }
}

/// What one load pass found in each layer.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub base: ScanOutcome,
    pub extensions: ScanOutcome,
    pub override_layer: ScanOutcome,
    /// Files that matched but could not be read.
    pub failed_files: Vec<PathBuf>,
    /// Whether the sets of this load decrypt `ENC(...)` values.
    pub decrypting: bool,
    pub elapsed: Duration,
}

impl LoadReport {
    fn skipped() -> Self {
        Self {
            base: ScanOutcome::NotConfigured,
            extensions: ScanOutcome::NotConfigured,
            override_layer: ScanOutcome::NotConfigured,
            failed_files: Vec::new(),
            decrypting: false,
            elapsed: Duration::ZERO,
        }
    }
}

/// Accumulates one load pass before it is published.
struct CollectionBuilder {
    files: HashMap<String, PropertySet>,
    encryptor: Option<Arc<PropertyEncryptor>>,
    failed_files: Vec<PathBuf>,
}

impl CollectionBuilder {
    fn new(encryptor: Option<Arc<PropertyEncryptor>>) -> Self {
        Self {
            files: HashMap::new(),
            encryptor,
            failed_files: Vec::new(),
        }
    }

    fn empty_set(&self) -> PropertySet {
        match &self.encryptor {
            Some(encryptor) => PropertySet::decrypting(Arc::clone(encryptor)),
            None => PropertySet::plain(),
        }
    }

    fn load_location(&mut self, location: &Path, kind: LocationKind) -> ScanOutcome {
        let outcome = scan_location(Some(location), kind);

        for file in outcome.files() {
            let Some(file_name) = file.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };

            let text = match std::fs::read_to_string(file) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(
                        path = %file.display(),
                        error = %e,
                        "Could not read the file"
                    );
                    self.failed_files.push(file.clone());
                    continue;
                }
            };

            if !self.files.contains_key(&file_name) {
                let set = self.empty_set();
                self.files.insert(file_name.clone(), set);
            }
            if let Some(set) = self.files.get_mut(&file_name) {
                set.overlay_text(&text);
            }
        }

        outcome
    }

    fn finish(self) -> ManagedProperties {
        ManagedProperties {
            files: self
                .files
                .into_iter()
                .map(|(name, set)| (name, Arc::new(set)))
                .collect(),
        }
    }
}

/// One layered loader: a location source, an optional override subfolder,
/// and the most recently loaded collection.
#[derive(Debug)]
pub struct Krausening {
    source: LocationSource,
    override_subfolder: RwLock<Option<String>>,
    managed: RwLock<Arc<ManagedProperties>>,
    last_load: RwLock<Option<Arc<LoadReport>>>,
    load_lock: Mutex<()>,
}

impl Krausening {
    /// Creates an engine without loading anything yet.
    pub fn new(source: impl Into<LocationSource>) -> Self {
        Self {
            source: source.into(),
            override_subfolder: RwLock::new(None),
            managed: RwLock::new(Arc::new(ManagedProperties::default())),
            last_load: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Creates an engine scoped to an override subfolder and loads it.
    pub fn load(source: impl Into<LocationSource>, override_subfolder: Option<&str>) -> Self {
        let engine = Self::new(source);
        engine.set_override_subfolder(override_subfolder);
        engine.load_properties();
        engine
    }

    /// Changes the override subfolder consulted by the next load.
    ///
    /// Blank identifiers clear the subfolder. Does not reload.
    pub fn set_override_subfolder(&self, subfolder: Option<&str>) {
        let subfolder = subfolder
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        *self
            .override_subfolder
            .write()
            .unwrap_or_else(PoisonError::into_inner) = subfolder;
    }

    pub fn override_subfolder(&self) -> Option<String> {
        self.override_subfolder
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The locations the next load would use.
    pub fn locations(&self) -> Locations {
        self.source.resolve()
    }

    /// Rebuilds the whole collection from the configured locations.
    ///
    /// Safe to call at any time and from any thread; concurrent loads are
    /// serialized and readers keep whichever collection they already hold.
    pub fn load_properties(&self) -> Arc<LoadReport> {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        tracing::debug!("Loading Krausening properties...");

        let locations = self.source.resolve();
        let encryptor = encryption_foundation(&locations);
        let decrypting = encryptor.is_some();
        let mut builder = CollectionBuilder::new(encryptor);
        let mut report = LoadReport::skipped();
        report.decrypting = decrypting;

        match locations.base.as_deref() {
            None => {
                tracing::warn!(
                    "Without a {} set, Krausening cannot load any properties!",
                    BASE_LOCATION_VAR
                );
            }
            Some(base) => {
                tracing::info!(path = %base.display(), "Krausening base location");
                report.base = builder.load_location(base, LocationKind::Base);

                report.extensions = match locations.extensions.as_deref() {
                    Some(extensions) => {
                        tracing::info!(
                            path = %extensions.display(),
                            "Krausening extensions location"
                        );
                        builder.load_location(extensions, LocationKind::Extensions)
                    }
                    None => {
                        tracing::warn!(location = %LocationKind::Extensions, "No location set");
                        ScanOutcome::NotConfigured
                    }
                };

                report.override_layer = self.load_override(&mut builder, &locations);
            }
        }

        report.failed_files = std::mem::take(&mut builder.failed_files);
        let managed = Arc::new(builder.finish());
        let file_count = managed.len();
        *self.managed.write().unwrap_or_else(PoisonError::into_inner) = managed;

        report.elapsed = start.elapsed();
        tracing::debug!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            files = file_count,
            "Loaded Krausening properties"
        );

        let report = Arc::new(report);
        *self.last_load.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::clone(&report));
        report
    }

    fn load_override(&self, builder: &mut CollectionBuilder, locations: &Locations) -> ScanOutcome {
        let subfolder = self.override_subfolder();
        match (subfolder.as_deref(), locations.override_root.as_deref()) {
            (Some(subfolder), Some(root)) => {
                builder.load_location(&root.join(subfolder), LocationKind::Override)
            }
            (Some(subfolder), None) => {
                tracing::error!(
                    subfolder,
                    "Trying to use an override subfolder without {} set",
                    LocationKind::Override
                );
                ScanOutcome::NotConfigured
            }
            (None, Some(root)) => {
                tracing::debug!(
                    path = %root.display(),
                    "Override root set without a subfolder; override layer skipped"
                );
                ScanOutcome::NotConfigured
            }
            (None, None) => ScanOutcome::NotConfigured,
        }
    }

    /// Returns the set for a logical file name, or `None` if it was never
    /// loaded. A loaded file with no keys yields an empty set.
    pub fn get_properties(&self, file_name: &str) -> Option<Arc<PropertySet>> {
        self.managed().get(file_name)
    }

    /// The current collection. Holding it pins a consistent view.
    pub fn managed(&self) -> Arc<ManagedProperties> {
        Arc::clone(&self.managed.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The report of the most recent load, if any load has run.
    pub fn last_load(&self) -> Option<Arc<LoadReport>> {
        self.last_load
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merges the named sets, in declaration order, under `policy`.
    ///
    /// Names that were never loaded are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKeys` under `FailOnDuplicateKey` when a key appears
    /// in more than one set, or `Decryption` when a value cannot be decrypted.
    pub fn merge_and_get<S: AsRef<str>>(
        &self,
        file_names: &[S],
        policy: MergePolicy,
    ) -> Result<MergedProperties> {
        let managed = self.managed();
        let mut sets = Vec::with_capacity(file_names.len());

        for name in file_names.iter().map(AsRef::as_ref) {
            match managed.get(name) {
                Some(set) => sets.push(set),
                None => tracing::warn!(file = name, "Property file was not loaded; skipping"),
            }
        }

        let sets: Vec<&PropertySet> = sets.iter().map(Arc::as_ref).collect();
        policy.merge(&sets)
    }
}

fn encryption_foundation(locations: &Locations) -> Option<Arc<PropertyEncryptor>> {
    match &locations.master_password {
        Some(password) => {
            tracing::info!(
                "{} configured, Krausening will support encrypted property values.",
                MASTER_PASSWORD_VAR
            );
            Some(Arc::new(PropertyEncryptor::new(password.clone())))
        }
        None => {
            tracing::warn!(
                "No {} set, Krausening will not support encrypted property values!",
                MASTER_PASSWORD_VAR
            );
            None
        }
    }
}
