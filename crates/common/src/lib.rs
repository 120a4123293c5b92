//! Authentication core and shared types for the workspace service.
//!
//! - [`key_store`]: the key resolution capability and an in-memory variant
//! - [`claims`]: token payload and the role authorization check
//! - [`auth_context`]: RS256 token issuance and verification
//! - [`scope`]: immutable request scope carrying verified claims

#![warn(clippy::pedantic)]

/// Module for authentication error types
pub mod error;

/// Module for identifier types
pub mod types;

/// Module for common configuration
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for low-level JWT helpers (size limits, header inspection, iat)
pub mod jwt;

/// Module for the key store capability
pub mod key_store;

/// Module for token claims and role checks
pub mod claims;

/// Module for token issuance and verification
pub mod auth_context;

/// Module for the per-request claims carrier
pub mod scope;

/// RSA fixtures and a seeded key store for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth_context::AuthenticationContext;
pub use claims::Claims;
pub use error::{AuthError, RejectReason};
pub use key_store::{InMemoryKeyStore, KeyStore, KeyStoreError};
pub use scope::RequestScope;
