//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions over compact JWS tokens. These decode
//! the header and payload only; signature checks belong to the service.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn segment(token: &str, index: usize) -> Vec<u8> {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no segment {index}"));
    URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT segment {index}: {e}"))
}

fn header(token: &str) -> JwtHeader {
    serde_json::from_slice(&segment(token, 0)).expect("Failed to parse JWT header")
}

fn claims(token: &str) -> JwtClaims {
    serde_json::from_slice(&segment(token, 1)).expect("Failed to parse JWT claims")
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_has_role("USER")
///     .assert_signed_by("test-key-primary");
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a three-part RS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token grants the specified role
    fn assert_has_role(&self, role: &str) -> &Self;

    /// Assert that the token header names the specified key
    fn assert_signed_by(&self, key_id: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts = self.split('.').count();
        assert_eq!(
            parts, 3,
            "JWT must have 3 parts (header.payload.signature), got {parts}"
        );

        let header = header(self);
        assert_eq!(header.alg, "RS256", "Expected RS256 algorithm");
        claims(self);

        self
    }

    fn assert_has_role(&self, role: &str) -> &Self {
        let claims = claims(self);
        assert!(
            claims.roles.iter().any(|r| r == role),
            "Token does not grant role '{}'. Granted roles: {:?}",
            role,
            claims.roles
        );
        self
    }

    fn assert_signed_by(&self, key_id: &str) -> &Self {
        let header = header(self);
        assert_eq!(
            header.kid.as_deref(),
            Some(key_id),
            "Expected key_id '{}', got {:?}",
            key_id,
            header.kid
        );
        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let expires_in = claims(self).exp - chrono::Utc::now().timestamp();

        // Allow 5-second tolerance for slow test machines
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {seconds} seconds, but expires in {expires_in} seconds"
        );
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = claims(self);
        assert_eq!(
            claims.sub, subject,
            "Expected subject '{}', got '{}'",
            subject, claims.sub
        );
        self
    }
}
