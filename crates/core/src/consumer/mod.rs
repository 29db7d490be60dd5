//! Consumer-facing configuration handles.
//!
//! Responsibilities:
//! - Describe what a consumer needs (`ConfigSource`): files, merge policy,
//!   hot reload, and override subfolder.
//! - Build live `ConfigHandle`s from a `KrauseningFactory` composition root.
//!
//! Does NOT handle:
//! - Typed accessors over the merged values; callers parse strings themselves.
//!
//! Invariants:
//! - A handle's merged snapshot is replaced wholesale, never edited in place.
//! - `generation()` increases by one on every successful re-merge.

mod factory;
mod handle;

pub use factory::KrauseningFactory;
pub use handle::ConfigHandle;

use serde::{Deserialize, Serialize};

use crate::merge::MergePolicy;
use crate::reload::HotReload;

/// One consumer's declaration of the property files it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Logical file names, in declaration order.
    pub files: Vec<String>,
    #[serde(default)]
    pub merge_policy: MergePolicy,
    #[serde(default)]
    pub hot_reload: Option<HotReload>,
    /// Selects the engine scoped to this override subfolder.
    #[serde(default)]
    pub override_subfolder: Option<String>,
    /// Fail when a declared file was not produced by any location.
    #[serde(default)]
    pub strict: bool,
}

impl ConfigSource {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            merge_policy: MergePolicy::default(),
            hot_reload: None,
            override_subfolder: None,
            strict: false,
        }
    }

    /// A source reading a single file.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new([name])
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_hot_reload(mut self, hot_reload: HotReload) -> Self {
        self.hot_reload = Some(hot_reload);
        self
    }

    pub fn with_override_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.override_subfolder = Some(subfolder.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests;
