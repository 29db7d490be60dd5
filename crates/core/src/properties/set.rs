//! Key/value property sets, optionally decrypting.
//!
//! Responsibilities:
//! - Hold the string pairs loaded for one logical file name.
//! - Overlay further files onto an existing set (later layers win).
//! - Decrypt `ENC(...)` values on read when the set is decrypting.
//!
//! Does NOT handle:
//! - Discovering or reading files (see `loader::engine`).
//! - Merging several sets together (see `merge`).
//!
//! Invariants:
//! - A plain set never decrypts; marked values are returned verbatim.
//! - A decrypting set never returns ciphertext for a marked value; a failed
//!   decryption is an error naming the key.

use std::collections::HashMap;
use std::sync::Arc;

use super::format;
use crate::encryption::PropertyEncryptor;
use crate::error::{KrauseningError, Result};

/// The properties loaded for one logical file name.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    entries: HashMap<String, String>,
    encryptor: Option<Arc<PropertyEncryptor>>,
}

impl PropertySet {
    /// Creates an empty set that returns values verbatim.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Creates an empty set that decrypts marked values with `encryptor`.
    pub fn decrypting(encryptor: Arc<PropertyEncryptor>) -> Self {
        Self {
            entries: HashMap::new(),
            encryptor: Some(encryptor),
        }
    }

    /// Creates a plain set from pairs, mostly useful for tests and merging.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            encryptor: None,
        }
    }

    pub fn is_decrypting(&self) -> bool {
        self.encryptor.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Overlays `.properties` text onto this set, replacing existing keys.
    pub fn overlay_text(&mut self, text: &str) {
        format::load_into(text, &mut self.entries);
    }

    /// Sets a raw (possibly still encrypted) value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the stored form of a value without decrypting it.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the logical value of a key, decrypting it when required.
    ///
    /// # Errors
    ///
    /// Returns `KrauseningError::Decryption` if the value is marked as
    /// encrypted, this set is decrypting, and decryption fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entries.get(key) {
            Some(value) => self.resolve(key, value).map(Some),
            None => Ok(None),
        }
    }

    /// Resolves every entry to its logical value.
    ///
    /// # Errors
    ///
    /// Fails on the first value that cannot be decrypted.
    pub fn resolved(&self) -> Result<HashMap<String, String>> {
        self.entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), self.resolve(key, value)?)))
            .collect()
    }

    fn resolve(&self, key: &str, value: &str) -> Result<String> {
        match &self.encryptor {
            Some(encryptor) if PropertyEncryptor::is_encrypted(value) => encryptor
                .decrypt_value(value)
                .map_err(|source| KrauseningError::Decryption {
                    key: key.to_string(),
                    source,
                }),
            _ => Ok(value.to_string()),
        }
    }
}

impl PartialEq for PropertySet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.is_decrypting() == other.is_decrypting()
    }
}

impl Eq for PropertySet {}
