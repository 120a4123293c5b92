//! Builder patterns for test tokens
//!
//! `TestClaimsBuilder` produces [`common::Claims`]. Sign them through the
//! service's own `AuthenticationContext` for valid tokens, or with
//! [`TestClaimsBuilder::sign_with`] to forge tokens the service must reject.

use chrono::{Duration, Utc};
use common::Claims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Builder for test claims
///
/// # Example
/// ```rust,ignore
/// let claims = TestClaimsBuilder::new()
///     .for_subject("alice")
///     .with_role("USER")
///     .expires_in(600)
///     .build();
/// ```
pub struct TestClaimsBuilder {
    claims: Claims,
}

impl TestClaimsBuilder {
    /// Claims for `test-subject` with no roles, valid for one hour.
    pub fn new() -> Self {
        Self {
            claims: Claims::issue("test-subject", Vec::new(), Utc::now(), Duration::hours(1)),
        }
    }

    /// Set the subject
    pub fn for_subject(mut self, subject: &str) -> Self {
        self.claims.sub = subject.to_string();
        self
    }

    /// Add a role
    pub fn with_role(mut self, role: &str) -> Self {
        self.claims.roles.push(role.to_string());
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set the not-before time in seconds from now
    pub fn not_before_in(mut self, seconds: i64) -> Self {
        self.claims.nbf = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Build the claims
    pub fn build(self) -> Claims {
        self.claims
    }

    /// Sign the claims directly with an RS256 private key, bypassing the
    /// service's key store.
    ///
    /// # Panics
    ///
    /// Panics if `private_pem` is not an RSA private key.
    pub fn sign_with(self, key_id: Option<&str>, private_pem: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = key_id.map(str::to_string);
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .expect("test private key should parse");
        encode(&header, &self.claims, &key).expect("test token should encode")
    }
}

impl Default for TestClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
