//! Key store backed by a directory of PEM files.
//!
//! Layout: `<keys_dir>/<kid>.private.pem` and `<keys_dir>/<kid>.public.pem`.
//! Files are read on every lookup, so rotating keys is a file operation: drop
//! in a new pair and restart with a new `ACTIVE_KEY_ID`, delete an old
//! `.private.pem` to retire a key, delete its `.public.pem` to revoke it.

use crate::config::is_valid_key_id;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretBox};
use common::{KeyStore, KeyStoreError};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Which half of a key pair to load.
#[derive(Debug, Clone, Copy)]
enum KeyHalf {
    Private,
    Public,
}

impl KeyHalf {
    fn suffix(self) -> &'static str {
        match self {
            KeyHalf::Private => "private.pem",
            KeyHalf::Public => "public.pem",
        }
    }
}

/// [`KeyStore`] reading RSA PEM files from a directory.
#[derive(Debug, Clone)]
pub struct PemDirectoryKeyStore {
    dir: PathBuf,
}

impl PemDirectoryKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key_id: &str, half: KeyHalf) -> Result<PathBuf, KeyStoreError> {
        // The kid comes from an untrusted token header; never let it escape the directory.
        if !is_valid_key_id(key_id) {
            return Err(KeyStoreError::UnknownKey(key_id.to_string()));
        }
        Ok(self.dir.join(format!("{key_id}.{}", half.suffix())))
    }

    async fn read_pem(&self, key_id: &str, half: KeyHalf) -> Result<SecretBox<Vec<u8>>, KeyStoreError> {
        let path = self.path_for(key_id, half)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(SecretBox::new(Box::new(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(KeyStoreError::UnknownKey(key_id.to_string()))
            }
            Err(e) => {
                tracing::error!(
                    target: "ws.auth.key_store",
                    key_id = %key_id,
                    error = %e,
                    "Failed to read key file"
                );
                Err(KeyStoreError::Unavailable(format!(
                    "failed to read {} key for {key_id}",
                    half.suffix()
                )))
            }
        }
    }
}

#[async_trait]
impl KeyStore for PemDirectoryKeyStore {
    #[instrument(skip_all, name = "ws.key_store.private_key")]
    async fn private_key(&self, key_id: &str) -> Result<EncodingKey, KeyStoreError> {
        let pem = self.read_pem(key_id, KeyHalf::Private).await?;
        EncodingKey::from_rsa_pem(pem.expose_secret()).map_err(|e| {
            KeyStoreError::InvalidKeyMaterial {
                key_id: key_id.to_string(),
                reason: e.to_string(),
            }
        })
    }

    #[instrument(skip_all, name = "ws.key_store.public_key")]
    async fn public_key(&self, key_id: &str) -> Result<DecodingKey, KeyStoreError> {
        let pem = self.read_pem(key_id, KeyHalf::Public).await?;
        DecodingKey::from_rsa_pem(pem.expose_secret()).map_err(|e| {
            KeyStoreError::InvalidKeyMaterial {
                key_id: key_id.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::testing::{PRIMARY_PRIVATE_PEM, PRIMARY_PUBLIC_PEM};

    fn keys_dir_with_primary() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("k1.private.pem"), PRIMARY_PRIVATE_PEM).unwrap();
        std::fs::write(dir.path().join("k1.public.pem"), PRIMARY_PUBLIC_PEM).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_loads_both_halves() {
        let dir = keys_dir_with_primary();
        let store = PemDirectoryKeyStore::new(dir.path());

        assert!(store.private_key("k1").await.is_ok());
        assert!(store.public_key("k1").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_unknown_key() {
        let dir = keys_dir_with_primary();
        let store = PemDirectoryKeyStore::new(dir.path());

        assert_eq!(
            store.public_key("k2").await.err(),
            Some(KeyStoreError::UnknownKey("k2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_retired_key_verifies_but_cannot_sign() {
        let dir = keys_dir_with_primary();
        std::fs::remove_file(dir.path().join("k1.private.pem")).unwrap();
        let store = PemDirectoryKeyStore::new(dir.path());

        assert!(matches!(
            store.private_key("k1").await,
            Err(KeyStoreError::UnknownKey(_))
        ));
        assert!(store.public_key("k1").await.is_ok());
    }

    #[tokio::test]
    async fn test_path_traversal_kid_is_unknown() {
        let dir = keys_dir_with_primary();
        let store = PemDirectoryKeyStore::new(dir.path().join("nested"));

        for kid in ["../k1", "..", "k1/../k1", "/etc/passwd"] {
            assert!(
                matches!(store.public_key(kid).await, Err(KeyStoreError::UnknownKey(_))),
                "{kid:?} must not resolve"
            );
        }
    }

    #[tokio::test]
    async fn test_corrupt_pem_is_invalid_material() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.public.pem"), "not a pem").unwrap();
        let store = PemDirectoryKeyStore::new(dir.path());

        assert!(matches!(
            store.public_key("bad").await,
            Err(KeyStoreError::InvalidKeyMaterial { .. })
        ));
    }
}
