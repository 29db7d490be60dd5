//! Composition root tying the registry, merging, and hot reload together.

use std::sync::{Arc, Mutex, PoisonError};

use super::ConfigSource;
use super::handle::{ConfigHandle, HandleState};
use crate::error::{KrauseningError, Result};
use crate::loader::LocationSource;
use crate::registry::InstanceRegistry;
use crate::reload::{ReloadMode, ReloadMonitor, ReloadScheduler};

/// Creates `ConfigHandle`s from one registry of engines.
///
/// Asynchronous reloads run on a scheduler thread that starts with the first
/// asynchronous handle and stops when the factory is dropped.
#[derive(Debug)]
pub struct KrauseningFactory {
    registry: InstanceRegistry,
    scheduler: Mutex<Option<ReloadScheduler>>,
}

impl KrauseningFactory {
    pub fn new(source: impl Into<LocationSource>) -> Self {
        Self::with_registry(InstanceRegistry::new(source))
    }

    /// A factory whose engines read the `KRAUSENING_*` environment variables
    /// on every load.
    pub fn from_env() -> Self {
        Self::new(LocationSource::Environment)
    }

    pub fn with_registry(registry: InstanceRegistry) -> Self {
        Self {
            registry,
            scheduler: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    /// Merges the declared files and arms hot reload if requested.
    ///
    /// # Errors
    ///
    /// Returns `NoSources` when no files are declared, the merge error of
    /// the first merge, or `Io` if the scheduler thread cannot start.
    pub fn create(&self, source: ConfigSource) -> Result<ConfigHandle> {
        if source.files.is_empty() {
            return Err(KrauseningError::NoSources);
        }

        let engine = self.registry.instance(source.override_subfolder.as_deref());
        let hot_reload = source.hot_reload;
        let files = source.files.clone();
        let state = Arc::new(HandleState::new(Arc::clone(&engine), source)?);

        let Some(hot_reload) = hot_reload else {
            return Ok(ConfigHandle::new(state, None, None));
        };

        let owner = Arc::downgrade(&state);
        let monitor = Arc::new(ReloadMonitor::arm(engine, files, move || {
            match owner.upgrade() {
                Some(state) => state.remerge(),
                None => Ok(()),
            }
        }));

        if hot_reload.mode == ReloadMode::Async {
            let mut scheduler = self.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
            if scheduler.is_none() {
                *scheduler = Some(ReloadScheduler::start()?);
            }
            if let Some(scheduler) = scheduler.as_ref() {
                scheduler.schedule(&monitor, hot_reload.interval);
            }
        }

        tracing::debug!(mode = ?hot_reload.mode, "Hot reload armed");
        Ok(ConfigHandle::new(state, Some(monitor), Some(hot_reload.mode)))
    }
}
