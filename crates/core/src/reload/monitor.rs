//! The check-and-reload routine shared by both reload modes.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::watch::{WatchState, tracked_paths};
use crate::error::Result;
use crate::loader::Krausening;

type OnReload = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// Watches the files behind one consumer and reloads its engine on change.
pub struct ReloadMonitor {
    engine: Arc<Krausening>,
    file_names: Vec<String>,
    watch: Mutex<WatchState>,
    on_reload: OnReload,
}

impl fmt::Debug for ReloadMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadMonitor")
            .field("file_names", &self.file_names)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

impl ReloadMonitor {
    /// Arms a watch over every base and extensions path that could supply
    /// one of `file_names`. Without configured locations the watch is empty
    /// and never fires.
    pub fn arm(
        engine: Arc<Krausening>,
        file_names: Vec<String>,
        on_reload: impl Fn() -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        let watch = WatchState::arm(tracked_paths(&engine.locations(), &file_names));
        if watch.is_empty() {
            tracing::warn!(
                files = ?file_names,
                "No locations to watch; hot reload will never fire"
            );
        } else {
            tracing::debug!(tracked = watch.len(), "Hot reload watch armed");
        }

        Self {
            engine,
            file_names,
            watch: Mutex::new(watch),
            on_reload: Box::new(on_reload),
        }
    }

    /// Reloads the engine if any tracked file changed, then re-arms the
    /// watch and runs the owner callback.
    ///
    /// Returns whether a reload happened. Concurrent callers are serialized;
    /// only the first one to see a change reloads.
    ///
    /// # Errors
    ///
    /// Returns the owner callback's error. The watch is re-armed regardless,
    /// so a failing callback is not retried until the files change again.
    pub fn check_and_reload(&self) -> Result<bool> {
        let mut watch = self.watch.lock().unwrap_or_else(PoisonError::into_inner);

        let changed = watch.changed();
        if changed.is_empty() {
            return Ok(false);
        }
        tracing::debug!(changed = ?changed, "Property files changed; reloading");

        self.engine.load_properties();
        *watch = WatchState::arm(tracked_paths(&self.engine.locations(), &self.file_names));
        drop(watch);

        (self.on_reload)()?;
        Ok(true)
    }

    pub fn engine(&self) -> &Arc<Krausening> {
        &self.engine
    }
}
