//! Merging several property sets into one flat result.
//!
//! Responsibilities:
//! - Implement the three merge policies over sets in declaration order.
//! - Resolve encrypted values so merged results hold plaintext only.
//!
//! Does NOT handle:
//! - Looking up sets by file name (see `loader::Krausening::merge_and_get`).
//!
//! Invariants:
//! - `FailOnDuplicateKey` either succeeds completely or fails naming every
//!   duplicated key; no partial result is returned.
//! - `FirstTakesPrecedence` overwrites right-to-left, so the first declared
//!   set that defines a key supplies its value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KrauseningError, Result};
use crate::properties::PropertySet;

/// How keys defined by more than one declared file are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Fail if any key is defined by more than one set.
    #[default]
    FailOnDuplicateKey,
    /// The last declared set defining a key wins.
    LastTakesPrecedence,
    /// The first declared set defining a key wins.
    FirstTakesPrecedence,
}

impl MergePolicy {
    /// Merges `sets`, given in declaration order, into one result.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKeys` under `FailOnDuplicateKey` when any key is
    /// reintroduced, or `Decryption` when a value cannot be decrypted.
    pub fn merge(self, sets: &[&PropertySet]) -> Result<MergedProperties> {
        match self {
            Self::FailOnDuplicateKey => fail_on_duplicate_key(sets),
            Self::LastTakesPrecedence => overwrite_in_order(sets.iter().copied()),
            Self::FirstTakesPrecedence => overwrite_in_order(sets.iter().rev().copied()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailOnDuplicateKey => "fail-on-duplicate-key",
            Self::LastTakesPrecedence => "last-takes-precedence",
            Self::FirstTakesPrecedence => "first-takes-precedence",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = KrauseningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fail-on-duplicate-key" | "fail-on-duplicate-property-key" | "fail-on-duplicate" => {
                Ok(Self::FailOnDuplicateKey)
            }
            "last-takes-precedence" | "last-wins" | "last" => Ok(Self::LastTakesPrecedence),
            "first-takes-precedence" | "first-wins" | "first" => Ok(Self::FirstTakesPrecedence),
            _ => Err(KrauseningError::InvalidValue {
                var: "merge policy".to_string(),
                message: format!(
                    "'{}' is not one of fail-on-duplicate-key, last-takes-precedence, first-takes-precedence",
                    s
                ),
            }),
        }
    }
}

fn fail_on_duplicate_key(sets: &[&PropertySet]) -> Result<MergedProperties> {
    let mut merged = BTreeMap::new();
    let mut duplicates = BTreeSet::new();

    for set in sets {
        for key in set.keys() {
            if merged.contains_key(key) {
                duplicates.insert(key.to_string());
            } else if let Some(value) = set.get(key)? {
                merged.insert(key.to_string(), value);
            }
        }
    }

    if !duplicates.is_empty() {
        return Err(KrauseningError::DuplicateKeys {
            keys: duplicates.into_iter().collect(),
        });
    }

    Ok(MergedProperties { entries: merged })
}

fn overwrite_in_order<'a>(sets: impl Iterator<Item = &'a PropertySet>) -> Result<MergedProperties> {
    let mut merged = BTreeMap::new();
    for set in sets {
        merged.extend(set.resolved()?);
    }
    Ok(MergedProperties { entries: merged })
}

/// A flat, plaintext key/value view with no tie to its source files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedProperties {
    entries: BTreeMap<String, String>,
}

impl MergedProperties {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl From<BTreeMap<String, String>> for MergedProperties {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}
