//! Low-level JWT helpers used by the authentication core.
//!
//! This module owns the pieces of token handling that happen *around* the
//! cryptographic check performed by `jsonwebtoken`:
//! - Size limits applied before any parsing
//! - Inspection of the unverified header (`alg` and `kid`)
//! - Clock skew constants and `iat` validation
//!
//! # Security
//!
//! Nothing returned by [`inspect_header`] is trusted. The `alg` value is only
//! compared against the pinned algorithm and the `kid` value is only used as a
//! lookup key into the server-side key store.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// The only signing algorithm issued and accepted by this system.
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before base64 decoding or any
/// signature work. A typical RS256 token with a handful of roles is well
/// under 1KB.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Default clock skew tolerance for `iat` values issued slightly in the future.
///
/// `exp` and `nbf` are not given any leeway.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(60);

/// Upper bound for a configured clock skew tolerance (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while inspecting a token before signature verification.
///
/// Messages are intentionally identical so that nothing about the failure
/// leaks to a client that formats the error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token is not three base64url segments with a JSON object header.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token `iat` claim is further in the future than the clock skew allows.
    #[error("The access token is invalid or expired")]
    IatTooFarInFuture,
}

// =============================================================================
// Header Inspection
// =============================================================================

/// The `kid` header field as found in an unverified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIdHint {
    /// No `kid` field.
    Missing,
    /// A `kid` field whose JSON value is not a string.
    NotAString,
    /// A string `kid`, possibly empty. The key store decides whether it resolves.
    Present(String),
}

/// Header fields read from a token before its signature has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedHeader {
    /// The declared `alg`, if it was a string.
    pub alg: Option<String>,
    /// The declared `kid`.
    pub kid: KeyIdHint,
}

impl UnverifiedHeader {
    /// Whether the declared algorithm is exactly `expected`.
    #[must_use]
    pub fn declares_algorithm(&self, expected: &str) -> bool {
        self.alg.as_deref() == Some(expected)
    }
}

/// Parse the header segment of a compact JWT without verifying anything.
///
/// # Errors
///
/// - `TokenTooLarge` if the token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` if the token does not have three segments, or the
///   header is not base64url-encoded JSON object
pub fn inspect_header(token: &str) -> Result<UnverifiedHeader, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    let (Some(header_part), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(target: "common.jwt", "Token rejected: invalid JWT format");
        return Err(JwtValidationError::MalformedToken);
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtValidationError::MalformedToken
    })?;

    let Some(fields) = header.as_object() else {
        tracing::debug!(target: "common.jwt", "Token rejected: header is not a JSON object");
        return Err(JwtValidationError::MalformedToken);
    };

    let alg = fields
        .get("alg")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string);

    let kid = match fields.get("kid") {
        None => KeyIdHint::Missing,
        Some(serde_json::Value::String(s)) => KeyIdHint::Present(s.clone()),
        Some(_) => KeyIdHint::NotAString,
    };

    Ok(UnverifiedHeader { alg, kid })
}

// =============================================================================
// iat Validation
// =============================================================================

/// Validate the `iat` (issued-at) claim with clock skew tolerance.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat` is more than
/// `clock_skew` ahead of the current time.
pub fn validate_iat(iat: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_iat_at(iat, clock_skew, now)
}

/// Deterministic `iat` validation against an explicit `now` timestamp.
pub(crate) fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // Safe cast: clock_skew is bounded to MAX_CLOCK_SKEW (600 seconds)
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now + clock_skew_secs;

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn token_with_header(header: &str) -> String {
        format!("{}.payload.signature", URL_SAFE_NO_PAD.encode(header))
    }

    #[test]
    fn test_constants() {
        assert_eq!(SIGNING_ALGORITHM, "RS256");
        assert_eq!(MAX_JWT_SIZE_BYTES, 8192);
        assert!(DEFAULT_CLOCK_SKEW <= MAX_CLOCK_SKEW);
        assert_eq!(MAX_CLOCK_SKEW, Duration::from_secs(600));
    }

    // -------------------------------------------------------------------------
    // inspect_header Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_inspect_header_valid() {
        let token = token_with_header(r#"{"alg":"RS256","typ":"JWT","kid":"key-2024-01"}"#);

        let header = inspect_header(&token).unwrap();
        assert!(header.declares_algorithm("RS256"));
        assert_eq!(header.kid, KeyIdHint::Present("key-2024-01".to_string()));
    }

    #[test]
    fn test_inspect_header_missing_kid() {
        let token = token_with_header(r#"{"alg":"RS256","typ":"JWT"}"#);
        assert_eq!(inspect_header(&token).unwrap().kid, KeyIdHint::Missing);
    }

    #[test]
    fn test_inspect_header_empty_kid_is_present() {
        let token = token_with_header(r#"{"alg":"RS256","kid":""}"#);
        assert_eq!(inspect_header(&token).unwrap().kid, KeyIdHint::Present(String::new()));
    }

    #[test]
    fn test_inspect_header_non_string_kid() {
        for kid in ["12345", "true", "null", r#"["a"]"#, r#"{"k":"v"}"#] {
            let token = token_with_header(&format!(r#"{{"alg":"RS256","kid":{kid}}}"#));
            assert_eq!(
                inspect_header(&token).unwrap().kid,
                KeyIdHint::NotAString,
                "kid value {kid} should not be accepted as a string"
            );
        }
    }

    #[test]
    fn test_inspect_header_other_algorithm() {
        let token = token_with_header(r#"{"alg":"none","kid":"k"}"#);
        let header = inspect_header(&token).unwrap();
        assert!(!header.declares_algorithm("RS256"));

        let token = token_with_header(r#"{"kid":"k"}"#);
        assert_eq!(inspect_header(&token).unwrap().alg, None);
    }

    #[test]
    fn test_inspect_header_wrong_segment_count() {
        for token in ["", "not-a-jwt", "a.b", "a.b.c.d"] {
            assert_eq!(
                inspect_header(token),
                Err(JwtValidationError::MalformedToken),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_inspect_header_invalid_base64() {
        assert_eq!(
            inspect_header("!!!invalid!!!.payload.signature"),
            Err(JwtValidationError::MalformedToken)
        );
    }

    #[test]
    fn test_inspect_header_not_an_object() {
        assert_eq!(
            inspect_header(&token_with_header("not-json")),
            Err(JwtValidationError::MalformedToken)
        );
        assert_eq!(
            inspect_header(&token_with_header(r#"["RS256"]"#)),
            Err(JwtValidationError::MalformedToken)
        );
    }

    #[test]
    fn test_inspect_header_oversized_token() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        assert_eq!(
            inspect_header(&oversized),
            Err(JwtValidationError::TokenTooLarge)
        );
    }

    #[test]
    fn test_inspect_header_at_size_limit() {
        let header_b64 = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"key"}"#);
        let remaining = MAX_JWT_SIZE_BYTES - header_b64.len() - 2;
        let payload_len = remaining / 2;
        let token = format!(
            "{}.{}.{}",
            header_b64,
            "a".repeat(payload_len),
            "b".repeat(remaining - payload_len)
        );
        assert_eq!(token.len(), MAX_JWT_SIZE_BYTES);

        let header = inspect_header(&token).unwrap();
        assert_eq!(header.kid, KeyIdHint::Present("key".to_string()));
    }

    // -------------------------------------------------------------------------
    // validate_iat Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_iat_current_and_past() {
        let now = chrono::Utc::now().timestamp();
        assert!(validate_iat(now, DEFAULT_CLOCK_SKEW).is_ok());
        assert!(validate_iat(now - 86_400, DEFAULT_CLOCK_SKEW).is_ok());
    }

    #[test]
    fn test_validate_iat_at_boundary() {
        let now = 1_700_000_000;
        let skew = Duration::from_secs(60);

        assert!(validate_iat_at(now + 60, skew, now).is_ok());
        assert_eq!(
            validate_iat_at(now + 61, skew, now),
            Err(JwtValidationError::IatTooFarInFuture)
        );
    }

    #[test]
    fn test_validate_iat_zero_skew() {
        let now = 1_700_000_000;
        assert!(validate_iat_at(now, Duration::ZERO, now).is_ok());
        assert!(validate_iat_at(now + 1, Duration::ZERO, now).is_err());
    }
}
