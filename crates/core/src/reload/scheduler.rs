//! Background scheduler for asynchronous reload checks.
//!
//! One thread serves every asynchronous watch registered with a scheduler.
//! It holds monitors weakly; a monitor whose owner has been dropped is
//! pruned on its next tick, so re-arming watches does not leak.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::monitor::ReloadMonitor;
use crate::constants::MIN_HOT_RELOAD_INTERVAL;
use crate::error::Result;

enum Command {
    Watch(ScheduledWatch),
    Stop,
}

struct ScheduledWatch {
    monitor: Weak<ReloadMonitor>,
    interval: Duration,
    next_due: Instant,
}

/// Owns the background reload thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct ReloadScheduler {
    commands: Sender<Command>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReloadScheduler {
    /// Spawns the scheduler thread.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the thread cannot be spawned.
    pub fn start() -> Result<Self> {
        let (commands, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("krausening-reload".to_string())
            .spawn(move || run_scheduler_loop(rx))?;

        tracing::debug!("Hot reload scheduler started");
        Ok(Self {
            commands,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Checks `monitor` every `interval` until the monitor is dropped or the
    /// scheduler stops.
    pub fn schedule(&self, monitor: &Arc<ReloadMonitor>, interval: Duration) {
        let interval = interval.max(MIN_HOT_RELOAD_INTERVAL);
        let watch = ScheduledWatch {
            monitor: Arc::downgrade(monitor),
            interval,
            next_due: Instant::now() + interval,
        };
        if self.commands.send(Command::Watch(watch)).is_err() {
            tracing::warn!("Hot reload scheduler is not running; watch ignored");
        }
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Stop);
        let handle = self
            .handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && handle.thread().id() != thread::current().id()
        {
            let _ = handle.join();
        }
    }
}

fn run_scheduler_loop(rx: Receiver<Command>) {
    let mut watches: Vec<ScheduledWatch> = Vec::new();

    loop {
        let command = match watches.iter().map(|w| w.next_due).min() {
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(due) => rx.recv_timeout(due.saturating_duration_since(Instant::now())),
        };

        match command {
            Ok(Command::Watch(watch)) => {
                tracing::debug!(interval_ms = watch.interval.as_millis() as u64, "Watch scheduled");
                watches.push(watch);
            }
            Ok(Command::Stop) => {
                tracing::debug!("Hot reload scheduler received stop signal, exiting");
                break;
            }
            Err(RecvTimeoutError::Timeout) => run_due(&mut watches),
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("Hot reload scheduler channel disconnected, exiting");
                break;
            }
        }
    }
}

fn run_due(watches: &mut Vec<ScheduledWatch>) {
    let now = Instant::now();

    watches.retain_mut(|watch| {
        if watch.next_due > now {
            return true;
        }
        let Some(monitor) = watch.monitor.upgrade() else {
            tracing::debug!("Watch owner dropped; unscheduling");
            return false;
        };

        if let Err(e) = monitor.check_and_reload() {
            tracing::error!(error = %e, "Asynchronous hot reload failed");
        }
        watch.next_due = Instant::now() + watch.interval;
        true
    });
}
