//! Registry of engines keyed by override subfolder.
//!
//! Responsibilities:
//! - Create at most one `Krausening` engine per override subfolder.
//! - Provide the default engine (no subfolder) and container bootstrap.
//!
//! Does NOT handle:
//! - Loading or merging properties (see `loader`).
//!
//! Invariants:
//! - Lookups and creations happen under one lock; concurrent requests for
//!   the same subfolder observe the same engine.
//! - Engines live as long as the registry; there is no eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::loader::{Krausening, LocationSource};

/// Key of the default engine, which has no override subfolder.
const DEFAULT_KEY: &str = "";

/// Get-or-create table of engines, one per override subfolder.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    source: LocationSource,
    instances: Mutex<HashMap<String, Arc<Krausening>>>,
}

impl InstanceRegistry {
    /// Creates an empty registry whose engines read locations from `source`.
    pub fn new(source: impl Into<LocationSource>) -> Self {
        Self {
            source: source.into(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// The engine without an override subfolder, loading it on first use.
    pub fn default_instance(&self) -> Arc<Krausening> {
        self.instance(None)
    }

    /// The engine for `override_subfolder`, loading it on first use.
    ///
    /// A blank or absent subfolder selects the default engine.
    pub fn instance(&self, override_subfolder: Option<&str>) -> Arc<Krausening> {
        let key = override_subfolder
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_KEY);

        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = instances.get(key) {
            return Arc::clone(existing);
        }

        tracing::debug!(subfolder = key, "Creating Krausening instance");
        let subfolder = (key != DEFAULT_KEY).then_some(key);
        let engine = Arc::new(Krausening::load(self.source.clone(), subfolder));
        instances.insert(key.to_string(), Arc::clone(&engine));
        engine
    }

    /// Points the default engine at `override_subfolder` and reloads it.
    ///
    /// This is the startup hook for a hosting container that scopes one
    /// deployment's overrides. A blank identifier does nothing.
    pub fn bootstrap(&self, override_subfolder: &str) {
        if override_subfolder.trim().is_empty() {
            return;
        }

        let engine = self.default_instance();
        engine.set_override_subfolder(Some(override_subfolder));
        engine.load_properties();
        tracing::info!(
            subfolder = override_subfolder.trim(),
            "Default Krausening instance bootstrapped with override subfolder"
        );
    }

    /// Number of engines created so far.
    pub fn len(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Locations;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn tree() -> (TempDir, Locations) {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        let overrides = dir.path().join("override");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(overrides.join("tenant-a")).unwrap();
        fs::create_dir_all(overrides.join("tenant-b")).unwrap();

        fs::write(base.join("app.properties"), "key=base\nshared=base\n").unwrap();
        fs::write(
            overrides.join("tenant-a").join("app.properties"),
            "key=a\na.only=1\n",
        )
        .unwrap();
        fs::write(overrides.join("tenant-b").join("app.properties"), "key=b\n").unwrap();

        let locations = Locations::new()
            .with_base(base)
            .with_override_root(overrides);
        (dir, locations)
    }

    fn key(engine: &Krausening, key: &str) -> Option<String> {
        engine
            .get_properties("app.properties")
            .unwrap()
            .get(key)
            .unwrap()
    }

    #[test]
    fn test_same_subfolder_returns_same_instance() {
        let (_dir, locations) = tree();
        let registry = InstanceRegistry::new(locations);

        let first = registry.instance(Some("tenant-a"));
        let second = registry.instance(Some(" tenant-a "));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_blank_subfolder_is_default_instance() {
        let (_dir, locations) = tree();
        let registry = InstanceRegistry::new(locations);

        let default = registry.default_instance();
        assert!(Arc::ptr_eq(&default, &registry.instance(Some(""))));
        assert!(Arc::ptr_eq(&default, &registry.instance(None)));
        assert_eq!(default.override_subfolder(), None);
    }

    #[test]
    fn test_instances_are_isolated() {
        let (_dir, locations) = tree();
        let registry = InstanceRegistry::new(locations);

        let a = registry.instance(Some("tenant-a"));
        let b = registry.instance(Some("tenant-b"));
        let default = registry.default_instance();

        assert_eq!(key(&a, "key").as_deref(), Some("a"));
        assert_eq!(key(&b, "key").as_deref(), Some("b"));
        assert_eq!(key(&default, "key").as_deref(), Some("base"));

        assert_eq!(key(&a, "a.only").as_deref(), Some("1"));
        assert_eq!(key(&b, "a.only"), None);
        assert_eq!(key(&b, "shared").as_deref(), Some("base"));
    }

    #[test]
    fn test_concurrent_requests_create_one_instance() {
        let (_dir, locations) = tree();
        let registry = Arc::new(InstanceRegistry::new(locations));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.instance(Some("tenant-a")))
            })
            .collect();

        let engines: Vec<Arc<Krausening>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(engines.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_bootstrap_scopes_default_instance() {
        let (_dir, locations) = tree();
        let registry = InstanceRegistry::new(locations);

        registry.bootstrap("tenant-b");
        let default = registry.default_instance();
        assert_eq!(default.override_subfolder().as_deref(), Some("tenant-b"));
        assert_eq!(key(&default, "key").as_deref(), Some("b"));
    }

    #[test]
    fn test_bootstrap_with_blank_subfolder_is_noop() {
        let (_dir, locations) = tree();
        let registry = InstanceRegistry::new(locations);

        registry.bootstrap("  ");
        assert!(registry.is_empty());
    }
}
