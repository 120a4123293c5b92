//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate with usage guidance
//! for this workspace. Use these types for all sensitive values like database
//! credentials, tokens, and private key material.
//!
//! # Compile-Time Safety
//!
//! The key insight is that `SecretBox<T>` and `SecretString` implement `Debug`
//! with redaction, so any code that derives `Debug` on a struct containing secrets
//! will automatically get safe logging behavior. This makes it **impossible** to
//! accidentally log secrets via `{:?}` or tracing.
//!
//! # Memory Safety
//!
//! Secrets are automatically zeroized when dropped, preventing sensitive
//! data from lingering in memory after use.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct DbSettings {
//!     host: String,
//!     url: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let settings = DbSettings {
//!     host: "db".to_string(),
//!     url: SecretString::from("postgresql://ws:hunter2@db/workspaces"),
//! };
//!
//! // This is safe - url is redacted
//! println!("{:?}", settings);
//!
//! // To access the actual value, you must explicitly call expose_secret()
//! let url: &str = settings.url.expose_secret();
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - Database connection strings (they embed credentials)
//! - Bearer tokens handled outside the authentication core
//!
//! Use `SecretBox<T>` for:
//! - Raw PEM key material read from disk (`SecretBox<Vec<u8>>`)

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
