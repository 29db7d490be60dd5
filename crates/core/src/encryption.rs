//! Encryption of individual property values.
//!
//! Responsibilities:
//! - Provide AES-256-GCM encryption and decryption.
//! - Derive keys from the master password using Argon2id.
//! - Wrap and unwrap the `ENC(...)` marker used inside property files.
//!
//! Does NOT handle:
//! - Deciding which property sets decrypt (see `properties::PropertySet`).
//! - Reading the master password from the environment (see `loader::env`).
//!
//! Invariants:
//! - Every encrypted value carries its own random salt and nonce, encoded as
//!   base64(`salt || nonce || ciphertext+tag`) inside the marker.
//! - Decryption failures are always errors; ciphertext is never returned as
//!   if it were plaintext.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::Argon2;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::constants::{
    ENCRYPTED_VALUE_PREFIX, ENCRYPTED_VALUE_SUFFIX, NONCE_LEN, SALT_LEN, TAG_LEN,
};

/// Errors that can occur during encryption operations.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Malformed encrypted value: {0}")]
    MalformedPayload(String),
}

pub type Result<T> = std::result::Result<T, EncryptionError>;

/// Core cryptographic logic for AES-256-GCM.
pub struct Encryptor;

impl Encryptor {
    /// Encrypts data using AES-256-GCM.
    /// Returns (ciphertext + tag, nonce).
    pub fn encrypt(data: &[u8], key: &[u8; 32]) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
        let cipher = Aes256Gcm::new(key.into());
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        Ok((ciphertext, nonce_bytes))
    }

    /// Decrypts data using AES-256-GCM.
    pub fn decrypt(ciphertext: &[u8], key: &[u8; 32], nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(key.into());
        let nonce = Nonce::from_slice(nonce);

        cipher.decrypt(nonce, ciphertext).map_err(|_| {
            EncryptionError::DecryptionFailed("wrong password or tampered value".to_string())
        })
    }

    /// Derives a 32-byte key from a password and salt using Argon2id.
    pub fn derive_key(password: &SecretString, salt: &[u8]) -> Result<[u8; 32]> {
        let argon2 = Argon2::default();
        let mut key = [0u8; 32];
        argon2
            .hash_password_into(password.expose_secret().as_bytes(), salt, &mut key)
            .map_err(|e| EncryptionError::KeyDerivationFailed(e.to_string()))?;
        Ok(key)
    }

    /// Generates a random salt for key derivation.
    pub fn generate_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        salt
    }
}

/// Encrypts and decrypts property values under one master password.
///
/// Every decrypting property set created by one engine load shares a single
/// `PropertyEncryptor`, so they all have the same decryption capability.
pub struct PropertyEncryptor {
    password: SecretString,
    // Derived keys by salt.
    keys: Mutex<HashMap<[u8; SALT_LEN], [u8; 32]>>,
}

impl fmt::Debug for PropertyEncryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyEncryptor")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl PropertyEncryptor {
    pub fn new(password: SecretString) -> Self {
        Self {
            password,
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if the value is wrapped in the `ENC(...)` marker.
    pub fn is_encrypted(value: &str) -> bool {
        Self::unwrap_marker(value).is_some()
    }

    /// Returns the payload inside an `ENC(...)` marker, if present.
    pub fn unwrap_marker(value: &str) -> Option<&str> {
        value
            .trim()
            .strip_prefix(ENCRYPTED_VALUE_PREFIX)
            .and_then(|rest| rest.strip_suffix(ENCRYPTED_VALUE_SUFFIX))
    }

    /// Encrypts a plaintext value, returning the full `ENC(...)` form.
    pub fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        let salt = Encryptor::generate_salt();
        let key = self.key_for(&salt)?;
        let (ciphertext, nonce) = Encryptor::encrypt(plaintext.as_bytes(), &key)?;

        let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&salt);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);

        Ok(format!(
            "{}{}{}",
            ENCRYPTED_VALUE_PREFIX,
            STANDARD.encode(payload),
            ENCRYPTED_VALUE_SUFFIX
        ))
    }

    /// Decrypts a value given either in `ENC(...)` form or as a bare payload.
    pub fn decrypt_value(&self, value: &str) -> Result<String> {
        let payload = Self::unwrap_marker(value).unwrap_or_else(|| value.trim());
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| EncryptionError::MalformedPayload(format!("invalid base64: {}", e)))?;

        if bytes.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(EncryptionError::MalformedPayload(
                "payload too short".to_string(),
            ));
        }

        let (salt_bytes, rest) = bytes.split_at(SALT_LEN);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(salt_bytes);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        let key = self.key_for(&salt)?;
        let plaintext = Encryptor::decrypt(ciphertext, &key, &nonce)?;

        String::from_utf8(plaintext).map_err(|_| {
            EncryptionError::DecryptionFailed("plaintext is not valid UTF-8".to_string())
        })
    }

    fn key_for(&self, salt: &[u8; SALT_LEN]) -> Result<[u8; 32]> {
        if let Some(key) = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(salt)
        {
            return Ok(*key);
        }

        let key = Encryptor::derive_key(&self.password, salt)?;
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*salt, key);
        Ok(key)
    }
}
