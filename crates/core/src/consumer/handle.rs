//! Live view over one consumer's merged properties.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::ConfigSource;
use crate::error::{KrauseningError, Result};
use crate::loader::Krausening;
use crate::merge::MergedProperties;
use crate::reload::{ReloadMode, ReloadMonitor};

type Listener = Arc<dyn Fn(&MergedProperties) + Send + Sync>;

/// Shared state behind every clone of a handle.
pub(super) struct HandleState {
    engine: Arc<Krausening>,
    source: ConfigSource,
    merged: RwLock<Arc<MergedProperties>>,
    generation: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl HandleState {
    pub(super) fn new(engine: Arc<Krausening>, source: ConfigSource) -> Result<Self> {
        let merged = merge_source(&engine, &source)?;
        Ok(Self {
            engine,
            source,
            merged: RwLock::new(Arc::new(merged)),
            generation: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Re-merges from the engine's current collection and notifies listeners.
    /// On failure the previous snapshot stays in place.
    pub(super) fn remerge(&self) -> Result<()> {
        let merged = Arc::new(merge_source(&self.engine, &self.source)?);
        *self.merged.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&merged);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, files = ?self.source.files, "Properties re-merged");

        // Run unlocked; a listener may reload this handle.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &listeners {
            listener(&merged);
        }
        Ok(())
    }

    fn snapshot(&self) -> Arc<MergedProperties> {
        Arc::clone(&self.merged.read().unwrap_or_else(PoisonError::into_inner))
    }
}

fn merge_source(engine: &Krausening, source: &ConfigSource) -> Result<MergedProperties> {
    if source.strict {
        let missing = engine.managed().missing(&source.files);
        if !missing.is_empty() {
            return Err(KrauseningError::MissingSources { files: missing });
        }
    }
    engine.merge_and_get(&source.files, source.merge_policy)
}

/// A consumer's live merged properties. Clones share one snapshot.
///
/// With synchronous hot reload every read first checks the tracked files.
/// With asynchronous hot reload the factory's scheduler refreshes the
/// snapshot in the background.
#[derive(Clone)]
pub struct ConfigHandle {
    state: Arc<HandleState>,
    monitor: Option<Arc<ReloadMonitor>>,
    mode: Option<ReloadMode>,
}

impl fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("source", &self.state.source)
            .field("generation", &self.generation())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ConfigHandle {
    pub(super) fn new(
        state: Arc<HandleState>,
        monitor: Option<Arc<ReloadMonitor>>,
        mode: Option<ReloadMode>,
    ) -> Self {
        Self {
            state,
            monitor,
            mode,
        }
    }

    /// The current merged snapshot.
    ///
    /// # Errors
    ///
    /// In synchronous mode, returns the re-merge error when a change was
    /// detected but the new files cannot be merged.
    pub fn properties(&self) -> Result<Arc<MergedProperties>> {
        if self.mode == Some(ReloadMode::Sync)
            && let Some(monitor) = &self.monitor
        {
            monitor.check_and_reload()?;
        }
        Ok(self.state.snapshot())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.properties()?.get(key).map(str::to_string))
    }

    pub fn get_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .get(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Reloads the engine from disk and re-merges now.
    pub fn reload(&self) -> Result<()> {
        self.state.engine.load_properties();
        self.state.remerge()
    }

    /// Number of re-merges since the handle was created.
    pub fn generation(&self) -> u64 {
        self.state.generation.load(Ordering::Acquire)
    }

    /// Calls `listener` with the new snapshot after every re-merge.
    ///
    /// Listeners run on the thread that triggered the re-merge. A listener
    /// registered during a notification first runs on the next re-merge.
    pub fn on_reload(&self, listener: impl Fn(&MergedProperties) + Send + Sync + 'static) {
        self.state
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn source(&self) -> &ConfigSource {
        &self.state.source
    }

    pub fn engine(&self) -> &Arc<Krausening> {
        &self.state.engine
    }

    pub fn reload_mode(&self) -> Option<ReloadMode> {
        self.mode
    }
}
