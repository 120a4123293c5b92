//! Test fixtures: RSA key pairs and a pre-seeded in-memory key store.
//!
//! Available in this crate's own tests and to other crates through the
//! `test-utils` feature. These keys are public; never load them outside tests.

use crate::key_store::InMemoryKeyStore;
use std::sync::Arc;

/// Key id of the primary fixture pair.
pub const PRIMARY_KEY_ID: &str = "test-key-primary";

/// Key id of the secondary fixture pair (rotation target).
pub const SECONDARY_KEY_ID: &str = "test-key-secondary";

/// Primary RSA-2048 private key (PKCS#1 PEM).
pub const PRIMARY_PRIVATE_PEM: &str = include_str!("../fixtures/rsa_primary.private.pem");

/// Primary RSA-2048 public key (SPKI PEM).
pub const PRIMARY_PUBLIC_PEM: &str = include_str!("../fixtures/rsa_primary.public.pem");

/// Secondary RSA-2048 private key (PKCS#1 PEM).
pub const SECONDARY_PRIVATE_PEM: &str = include_str!("../fixtures/rsa_secondary.private.pem");

/// Secondary RSA-2048 public key (SPKI PEM).
pub const SECONDARY_PUBLIC_PEM: &str = include_str!("../fixtures/rsa_secondary.public.pem");

/// A private key that no fixture store trusts. Useful for forging signatures.
pub const UNTRUSTED_PRIVATE_PEM: &str = include_str!("../fixtures/rsa_untrusted.private.pem");

/// Build an in-memory store holding the primary and secondary pairs.
///
/// # Panics
///
/// Panics if the embedded fixtures fail to parse, which means the fixture
/// files themselves are broken.
#[must_use]
#[allow(clippy::expect_used)]
pub fn in_memory_key_store() -> InMemoryKeyStore {
    let store = InMemoryKeyStore::new();
    store
        .insert_rsa_pem(
            PRIMARY_KEY_ID,
            PRIMARY_PRIVATE_PEM.as_bytes(),
            PRIMARY_PUBLIC_PEM.as_bytes(),
        )
        .expect("primary fixture key pair should parse");
    store
        .insert_rsa_pem(
            SECONDARY_KEY_ID,
            SECONDARY_PRIVATE_PEM.as_bytes(),
            SECONDARY_PUBLIC_PEM.as_bytes(),
        )
        .expect("secondary fixture key pair should parse");
    store
}

/// [`in_memory_key_store`] behind an `Arc<dyn KeyStore>`.
#[must_use]
pub fn key_store() -> Arc<dyn crate::key_store::KeyStore> {
    Arc::new(in_memory_key_store())
}
