//! Consumer handle tests.
//!
//! Responsibilities:
//! - Test merging declared files through the factory.
//! - Test strict mode, subfolder selection, and manual reload.
//! - Test synchronous and asynchronous hot reload end to end.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::*;
use crate::error::KrauseningError;
use crate::loader::Locations;
use crate::reload::ReloadMode;

struct Tree {
    _dir: TempDir,
    base: PathBuf,
    overrides: PathBuf,
}

impl Tree {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base");
        let overrides = dir.path().join("override");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(overrides.join("tenant")).unwrap();

        fs::write(base.join("db.properties"), "db.host=localhost\ndb.port=5432\n").unwrap();
        fs::write(base.join("app.properties"), "app.name=brewery\nshared=app\n").unwrap();
        fs::write(base.join("extra.properties"), "shared=extra\n").unwrap();
        fs::write(overrides.join("tenant").join("db.properties"), "db.host=tenant-db\n").unwrap();

        Self {
            _dir: dir,
            base,
            overrides,
        }
    }

    fn factory(&self) -> KrauseningFactory {
        KrauseningFactory::new(
            Locations::new()
                .with_base(&self.base)
                .with_override_root(&self.overrides),
        )
    }
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_create_merges_declared_files() {
    let tree = Tree::new();
    let handle = tree
        .factory()
        .create(ConfigSource::new(["db.properties", "app.properties"]))
        .unwrap();

    assert_eq!(handle.get("db.host").unwrap().as_deref(), Some("localhost"));
    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("brewery"));
    assert_eq!(handle.get_or("missing", "fallback").unwrap(), "fallback");
    assert_eq!(handle.generation(), 0);
    assert_eq!(handle.reload_mode(), None);
}

#[test]
fn test_no_declared_files_is_an_error() {
    let tree = Tree::new();
    let err = tree
        .factory()
        .create(ConfigSource::new(Vec::<String>::new()))
        .unwrap_err();
    assert!(matches!(err, KrauseningError::NoSources));
}

#[test]
fn test_default_policy_fails_on_duplicates() {
    let tree = Tree::new();
    let err = tree
        .factory()
        .create(ConfigSource::new(["app.properties", "extra.properties"]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "The following duplicate property key(s) were found: shared"
    );
}

#[test]
fn test_selected_policy_resolves_duplicates() {
    let tree = Tree::new();
    let factory = tree.factory();

    let last = factory
        .create(
            ConfigSource::new(["app.properties", "extra.properties"])
                .with_merge_policy(MergePolicy::LastTakesPrecedence),
        )
        .unwrap();
    let first = factory
        .create(
            ConfigSource::new(["app.properties", "extra.properties"])
                .with_merge_policy(MergePolicy::FirstTakesPrecedence),
        )
        .unwrap();

    assert_eq!(last.get("shared").unwrap().as_deref(), Some("extra"));
    assert_eq!(first.get("shared").unwrap().as_deref(), Some("app"));
}

#[test]
fn test_missing_file_is_skipped_unless_strict() {
    let tree = Tree::new();
    let factory = tree.factory();

    let lenient = factory
        .create(ConfigSource::new(["db.properties", "absent.properties"]))
        .unwrap();
    assert_eq!(lenient.properties().unwrap().len(), 2);

    let err = factory
        .create(ConfigSource::new(["db.properties", "absent.properties"]).strict(true))
        .unwrap_err();
    match err {
        KrauseningError::MissingSources { files } => assert_eq!(files, vec!["absent.properties"]),
        other => panic!("expected MissingSources, got {other:?}"),
    }
}

#[test]
fn test_override_subfolder_selects_scoped_engine() {
    let tree = Tree::new();
    let factory = tree.factory();

    let scoped = factory
        .create(ConfigSource::file("db.properties").with_override_subfolder("tenant"))
        .unwrap();
    let default = factory.create(ConfigSource::file("db.properties")).unwrap();

    assert_eq!(scoped.get("db.host").unwrap().as_deref(), Some("tenant-db"));
    assert_eq!(scoped.get("db.port").unwrap().as_deref(), Some("5432"));
    assert_eq!(default.get("db.host").unwrap().as_deref(), Some("localhost"));
    assert_eq!(factory.registry().len(), 2);
}

#[test]
fn test_manual_reload_bumps_generation_and_notifies() {
    let tree = Tree::new();
    let handle = tree.factory().create(ConfigSource::file("app.properties")).unwrap();

    let seen = Arc::new(AtomicU64::new(0));
    let observer = Arc::clone(&seen);
    handle.on_reload(move |merged| {
        if merged.get("app.name") == Some("renamed") {
            observer.fetch_add(1, Ordering::SeqCst);
        }
    });

    fs::write(tree.base.join("app.properties"), "app.name=renamed\n").unwrap();
    handle.reload().unwrap();

    assert_eq!(handle.generation(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("renamed"));
}

#[test]
fn test_listener_may_reload_its_own_handle() {
    let tree = Tree::new();
    let handle = tree.factory().create(ConfigSource::file("app.properties")).unwrap();

    let reloaded_inside = Arc::new(AtomicBool::new(false));
    let nested = handle.clone();
    let flag = Arc::clone(&reloaded_inside);
    handle.on_reload(move |_| {
        if !flag.swap(true, Ordering::SeqCst) {
            nested.reload().unwrap();
        }
    });

    let (done_tx, done_rx) = mpsc::channel();
    let outer = handle.clone();
    thread::spawn(move || {
        let _ = done_tx.send(outer.reload().is_ok());
    });

    assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    assert!(reloaded_inside.load(Ordering::SeqCst));
    assert_eq!(handle.generation(), 2);
}

#[test]
fn test_clones_share_one_snapshot() {
    let tree = Tree::new();
    let handle = tree.factory().create(ConfigSource::file("app.properties")).unwrap();
    let clone = handle.clone();

    fs::write(tree.base.join("app.properties"), "app.name=shared-view\n").unwrap();
    handle.reload().unwrap();

    assert_eq!(clone.generation(), 1);
    assert_eq!(clone.get("app.name").unwrap().as_deref(), Some("shared-view"));
}

#[test]
fn test_sync_reload_observes_change_on_next_read() {
    let tree = Tree::new();
    let handle = tree
        .factory()
        .create(ConfigSource::file("app.properties").with_hot_reload(HotReload::sync()))
        .unwrap();
    assert_eq!(handle.reload_mode(), Some(ReloadMode::Sync));
    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("brewery"));

    fs::write(tree.base.join("app.properties"), "app.name=hot-swapped\n").unwrap();

    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("hot-swapped"));
    assert_eq!(handle.generation(), 1);
}

#[test]
fn test_sync_reload_surfaces_merge_failure_and_keeps_snapshot() {
    let tree = Tree::new();
    let handle = tree
        .factory()
        .create(
            ConfigSource::new(["app.properties", "db.properties"])
                .with_hot_reload(HotReload::sync()),
        )
        .unwrap();

    fs::write(tree.base.join("db.properties"), "db.host=x\napp.name=collision\n").unwrap();

    assert!(matches!(
        handle.get("app.name"),
        Err(KrauseningError::DuplicateKeys { .. })
    ));
    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("brewery"));
    assert_eq!(handle.generation(), 0);
}

#[test]
fn test_async_reload_observes_change_without_reads() {
    let tree = Tree::new();
    let factory = tree.factory();
    let handle = factory
        .create(
            ConfigSource::file("app.properties")
                .with_hot_reload(HotReload::asynchronous(Duration::from_millis(20))),
        )
        .unwrap();

    fs::write(tree.base.join("app.properties"), "app.name=timer-driven\n").unwrap();

    assert!(wait_for(|| handle.generation() >= 1));
    assert_eq!(handle.get("app.name").unwrap().as_deref(), Some("timer-driven"));
}

#[test]
fn test_config_source_deserializes_with_defaults() {
    let source: ConfigSource =
        serde_json::from_str(r#"{ "files": ["a.properties", "b.properties"] }"#).unwrap();

    assert_eq!(source, ConfigSource::new(["a.properties", "b.properties"]));
    assert_eq!(source.merge_policy, MergePolicy::FailOnDuplicateKey);
    assert!(source.hot_reload.is_none());
    assert!(!source.strict);
}
