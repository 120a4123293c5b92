//! Key store capability consumed by the authentication core.
//!
//! The core never lists, creates or deletes keys. It asks for exactly one half
//! of a key pair by identifier: the private half to sign with the active key,
//! the public half to verify whatever `kid` a presented token names.
//!
//! [`InMemoryKeyStore`] is the in-process variant used by tests and local
//! development. Services provide their own implementation (for example one
//! backed by a directory of PEM files or a secret manager).

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors surfaced by a [`KeyStore`] lookup.
///
/// These propagate out of token verification unchanged so callers can tell a
/// rotation gap (`UnknownKey`) from a bad signature. They are not meant to be
/// shown to end users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    /// No key with this identifier is known.
    #[error("key {0:?} is unknown to the key store")]
    UnknownKey(String),

    /// The key exists but its material could not be loaded.
    #[error("key material for {key_id:?} is invalid: {reason}")]
    InvalidKeyMaterial { key_id: String, reason: String },

    /// The backing store could not be reached.
    #[error("key store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves key identifiers to RSA key material.
///
/// Implementations own their concurrency and latency behavior. Callers treat
/// every lookup as potentially blocking and potentially failing, and never
/// retry.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Resolve the private key used for signing with `key_id`.
    async fn private_key(&self, key_id: &str) -> Result<EncodingKey, KeyStoreError>;

    /// Resolve the public key used to verify tokens signed with `key_id`.
    async fn public_key(&self, key_id: &str) -> Result<DecodingKey, KeyStoreError>;
}

#[derive(Clone)]
struct KeyEntry {
    private: Option<EncodingKey>,
    public: DecodingKey,
}

/// A [`KeyStore`] backed by a map held in memory.
///
/// Keys can be added and retired while the store is shared, which is how
/// rotation is exercised in tests: retiring a key drops its private half but
/// keeps it available for verifying tokens it already signed.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<String, KeyEntry>>,
}

impl InMemoryKeyStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an RSA key pair from PEM-encoded halves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` if either PEM cannot be parsed, or
    /// `Unavailable` if the internal lock is poisoned.
    pub fn insert_rsa_pem(
        &self,
        key_id: &str,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<(), KeyStoreError> {
        let private = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| invalid_material(key_id, &e))?;
        let public =
            DecodingKey::from_rsa_pem(public_pem).map_err(|e| invalid_material(key_id, &e))?;

        self.write_entry(
            key_id,
            KeyEntry {
                private: Some(private),
                public,
            },
        )
    }

    /// Add (or replace) a verify-only RSA public key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyMaterial` if the PEM cannot be parsed, or
    /// `Unavailable` if the internal lock is poisoned.
    pub fn insert_rsa_public_pem(&self, key_id: &str, public_pem: &[u8]) -> Result<(), KeyStoreError> {
        let public =
            DecodingKey::from_rsa_pem(public_pem).map_err(|e| invalid_material(key_id, &e))?;

        self.write_entry(
            key_id,
            KeyEntry {
                private: None,
                public,
            },
        )
    }

    /// Drop the private half of a key, leaving it usable for verification only.
    ///
    /// Returns `false` if the key was not present.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the internal lock is poisoned.
    pub fn retire(&self, key_id: &str) -> Result<bool, KeyStoreError> {
        let mut keys = self.keys.write().map_err(|_| poisoned())?;
        Ok(keys.get_mut(key_id).map_or(false, |entry| {
            entry.private = None;
            true
        }))
    }

    /// Remove a key entirely. Tokens signed with it stop verifying.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the internal lock is poisoned.
    pub fn remove(&self, key_id: &str) -> Result<bool, KeyStoreError> {
        let mut keys = self.keys.write().map_err(|_| poisoned())?;
        Ok(keys.remove(key_id).is_some())
    }

    fn write_entry(&self, key_id: &str, entry: KeyEntry) -> Result<(), KeyStoreError> {
        let mut keys = self.keys.write().map_err(|_| poisoned())?;
        keys.insert(key_id.to_string(), entry);
        Ok(())
    }

    fn read_entry(&self, key_id: &str) -> Result<KeyEntry, KeyStoreError> {
        let keys = self.keys.read().map_err(|_| poisoned())?;
        keys.get(key_id)
            .cloned()
            .ok_or_else(|| KeyStoreError::UnknownKey(key_id.to_string()))
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn private_key(&self, key_id: &str) -> Result<EncodingKey, KeyStoreError> {
        self.read_entry(key_id)?
            .private
            .ok_or_else(|| KeyStoreError::UnknownKey(key_id.to_string()))
    }

    async fn public_key(&self, key_id: &str) -> Result<DecodingKey, KeyStoreError> {
        Ok(self.read_entry(key_id)?.public)
    }
}

fn invalid_material(key_id: &str, err: &jsonwebtoken::errors::Error) -> KeyStoreError {
    KeyStoreError::InvalidKeyMaterial {
        key_id: key_id.to_string(),
        reason: err.to_string(),
    }
}

fn poisoned() -> KeyStoreError {
    KeyStoreError::Unavailable("in-memory key store lock poisoned".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing::{PRIMARY_PRIVATE_PEM, PRIMARY_PUBLIC_PEM, SECONDARY_PUBLIC_PEM};

    #[tokio::test]
    async fn test_lookup_both_halves() {
        let store = InMemoryKeyStore::new();
        store
            .insert_rsa_pem("k1", PRIMARY_PRIVATE_PEM.as_bytes(), PRIMARY_PUBLIC_PEM.as_bytes())
            .unwrap();

        assert!(store.private_key("k1").await.is_ok());
        assert!(store.public_key("k1").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let store = InMemoryKeyStore::new();

        assert_eq!(
            store.private_key("missing").await.err(),
            Some(KeyStoreError::UnknownKey("missing".to_string()))
        );
        assert_eq!(
            store.public_key("missing").await.err(),
            Some(KeyStoreError::UnknownKey("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_public_only_key_cannot_sign() {
        let store = InMemoryKeyStore::new();
        store
            .insert_rsa_public_pem("verify-only", SECONDARY_PUBLIC_PEM.as_bytes())
            .unwrap();

        assert!(store.public_key("verify-only").await.is_ok());
        assert!(matches!(
            store.private_key("verify-only").await,
            Err(KeyStoreError::UnknownKey(_))
        ));
    }

    #[tokio::test]
    async fn test_retire_keeps_public_half() {
        let store = InMemoryKeyStore::new();
        store
            .insert_rsa_pem("k1", PRIMARY_PRIVATE_PEM.as_bytes(), PRIMARY_PUBLIC_PEM.as_bytes())
            .unwrap();

        assert!(store.retire("k1").unwrap());
        assert!(!store.retire("never-added").unwrap());

        assert!(store.private_key("k1").await.is_err());
        assert!(store.public_key("k1").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_drops_key() {
        let store = InMemoryKeyStore::new();
        store
            .insert_rsa_public_pem("k1", PRIMARY_PUBLIC_PEM.as_bytes())
            .unwrap();

        assert!(store.remove("k1").unwrap());
        assert!(!store.remove("k1").unwrap());
        assert!(store.public_key("k1").await.is_err());
    }

    #[test]
    fn test_invalid_pem_is_rejected() {
        let store = InMemoryKeyStore::new();
        let err = store
            .insert_rsa_pem("bad", b"not a pem", PRIMARY_PUBLIC_PEM.as_bytes())
            .unwrap_err();

        assert!(matches!(
            err,
            KeyStoreError::InvalidKeyMaterial { ref key_id, .. } if key_id == "bad"
        ));
    }
}
