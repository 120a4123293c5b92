//! Token issuance and verification bound to one active signing key.
//!
//! An [`AuthenticationContext`] signs new tokens with its active key and
//! verifies presented tokens with whatever public key the token's `kid`
//! resolves to in the key store. Rotation is done by building a new context
//! for the new active key; tokens signed by older keys keep verifying for as
//! long as the key store still resolves their `kid`.
//!
//! # Security
//!
//! - The accepted algorithm is pinned to [`SIGNING_ALGORITHM`] and checked
//!   before any key lookup
//! - The verification key is never chosen from anything but the `kid` lookup
//! - All signature and temporal failures collapse to
//!   [`AuthError::TokenAuthority`]
//!
//! ```rust,ignore
//! let context = AuthenticationContext::new("key-2024-01", key_store).await?;
//! let token = context.generate_token(&claims).await?;
//! let verified = context.read_claims_from_token(&token).await?;
//! ```

use crate::claims::Claims;
use crate::error::{AuthError, RejectReason};
use crate::jwt::{
    inspect_header, validate_iat, JwtValidationError, KeyIdHint, DEFAULT_CLOCK_SKEW,
    MAX_CLOCK_SKEW, SIGNING_ALGORITHM,
};
use crate::key_store::KeyStore;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Signs and verifies tokens for one active key.
///
/// All fields are fixed at construction, so a context can be shared behind an
/// `Arc` and used by any number of concurrent callers without locking.
pub struct AuthenticationContext {
    active_key_id: String,
    key_store: Arc<dyn KeyStore>,
    algorithm: Algorithm,
    clock_skew: Duration,
}

impl std::fmt::Debug for AuthenticationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationContext")
            .field("active_key_id", &self.active_key_id)
            .field("algorithm", &self.algorithm)
            .field("clock_skew", &self.clock_skew)
            .finish_non_exhaustive()
    }
}

impl AuthenticationContext {
    /// Build a context that signs with `active_key_id`.
    ///
    /// The private key is resolved once here so that a context can never exist
    /// for a key that cannot sign. It is not cached; every issuance resolves it
    /// again.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound` if the key store cannot resolve the private key
    /// - `SigningMethodNotFound` if the pinned algorithm is unsupported
    #[instrument(skip_all)]
    pub async fn new(
        active_key_id: impl Into<String>,
        key_store: Arc<dyn KeyStore>,
    ) -> Result<Self, AuthError> {
        let active_key_id = active_key_id.into();

        if let Err(e) = key_store.private_key(&active_key_id).await {
            tracing::warn!(
                target: "common.auth",
                key_id = %active_key_id,
                error = %e,
                "Active signing key does not resolve"
            );
            return Err(AuthError::KeyNotFound);
        }

        let algorithm = Algorithm::from_str(SIGNING_ALGORITHM).map_err(|e| {
            tracing::error!(target: "common.auth", error = %e, "Signing algorithm unavailable");
            AuthError::SigningMethodNotFound
        })?;

        tracing::info!(
            target: "common.auth",
            key_id = %active_key_id,
            algorithm = SIGNING_ALGORITHM,
            "Authentication context ready"
        );

        Ok(Self {
            active_key_id,
            key_store,
            algorithm,
            clock_skew: DEFAULT_CLOCK_SKEW,
        })
    }

    /// Replace the clock skew tolerance for the `iat` future check.
    ///
    /// `exp` and `nbf` are always checked without leeway. Values above
    /// [`MAX_CLOCK_SKEW`] are clamped.
    #[must_use]
    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew.min(MAX_CLOCK_SKEW);
        self
    }

    /// The key identifier written into every token this context issues.
    #[must_use]
    pub fn active_key_id(&self) -> &str {
        &self.active_key_id
    }

    /// The pinned signing algorithm.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The configured clock skew tolerance.
    #[must_use]
    pub fn clock_skew(&self) -> Duration {
        self.clock_skew
    }

    /// Sign `claims` with the active key and return the compact token.
    ///
    /// The header carries `alg`, `typ: "JWT"` and `kid` set to the active key.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound` if the active key no longer resolves (revoked after
    ///   construction)
    /// - `Signing` if the cryptographic operation fails
    #[instrument(skip_all)]
    pub async fn generate_token(&self, claims: &Claims) -> Result<String, AuthError> {
        let encoding_key = self
            .key_store
            .private_key(&self.active_key_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: "common.auth",
                    key_id = %self.active_key_id,
                    error = %e,
                    "Active signing key no longer resolves"
                );
                AuthError::KeyNotFound
            })?;

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.active_key_id.clone());

        encode(&header, claims, &encoding_key).map_err(|e| {
            tracing::error!(target: "common.auth", error = %e, "JWT signing operation failed");
            AuthError::Signing(e.to_string())
        })
    }

    /// Verify a compact token and return its claims unchanged.
    ///
    /// # Verification Order
    ///
    /// 1. Size bound and header shape
    /// 2. `alg` must equal the pinned algorithm (before any key lookup)
    /// 3. `kid` must be a string and resolve in the key store
    /// 4. Signature, `exp` and `nbf` (no leeway)
    /// 5. `iat` must not be further in the future than the clock skew
    ///
    /// # Errors
    ///
    /// - `KidNotFound` / `KidInvalidType` for a missing or non-string `kid`
    /// - `KeyStore` with the key store's own error if `kid` does not resolve
    /// - `TokenAuthority` for everything else
    #[instrument(skip_all)]
    pub async fn read_claims_from_token(&self, token: &str) -> Result<Claims, AuthError> {
        let header = inspect_header(token).map_err(|e| match e {
            JwtValidationError::TokenTooLarge => reject(RejectReason::TokenTooLarge),
            _ => reject(RejectReason::Malformed),
        })?;

        if !header.declares_algorithm(SIGNING_ALGORITHM) {
            tracing::debug!(
                target: "common.auth",
                declared = ?header.alg,
                "Token rejected: unexpected signing algorithm"
            );
            return Err(reject(RejectReason::UnexpectedAlgorithm));
        }

        let key_id = match header.kid {
            KeyIdHint::Present(key_id) => key_id,
            KeyIdHint::Missing => {
                tracing::debug!(target: "common.auth", "Token rejected: kid header missing");
                return Err(AuthError::KidNotFound);
            }
            KeyIdHint::NotAString => {
                tracing::debug!(target: "common.auth", "Token rejected: kid header not a string");
                return Err(AuthError::KidInvalidType);
            }
        };

        let decoding_key = self.key_store.public_key(&key_id).await.map_err(|e| {
            tracing::debug!(
                target: "common.auth",
                key_id = %key_id,
                error = %e,
                "Token rejected: verification key did not resolve"
            );
            AuthError::KeyStore(e)
        })?;

        let token_data = decode::<Claims>(token, &decoding_key, &self.validation())
            .map_err(|e| reject(reason_for(e.kind())))?;

        if let Some(iat) = token_data.claims.iat {
            validate_iat(iat, self.clock_skew).map_err(|_| reject(RejectReason::IssuedInFuture))?;
        }

        Ok(token_data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

fn reject(reason: RejectReason) -> AuthError {
    tracing::debug!(
        target: "common.auth",
        reason = reason.as_str(),
        "Token rejected: authority cannot be confirmed"
    );
    AuthError::TokenAuthority(reason)
}

fn reason_for(kind: &ErrorKind) -> RejectReason {
    match kind {
        ErrorKind::ExpiredSignature => RejectReason::Expired,
        ErrorKind::ImmatureSignature => RejectReason::NotYetValid,
        ErrorKind::InvalidAlgorithm => RejectReason::UnexpectedAlgorithm,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            RejectReason::Malformed
        }
        ErrorKind::Json(_)
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject => RejectReason::InvalidClaims,
        _ => RejectReason::InvalidSignature,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::key_store::{InMemoryKeyStore, KeyStoreError};
    use crate::testing::{self, PRIMARY_KEY_ID, SECONDARY_KEY_ID};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Utc;
    use jsonwebtoken::EncodingKey;

    fn sample_claims() -> Claims {
        Claims::issue(
            "user-42",
            vec!["USER".to_string(), "AUDITOR".to_string()],
            Utc::now(),
            chrono::Duration::hours(1),
        )
        .with_issuer("workspace-service")
        .with_audience("workspace-api")
    }

    async fn primary_context() -> AuthenticationContext {
        AuthenticationContext::new(PRIMARY_KEY_ID, testing::key_store())
            .await
            .unwrap()
    }

    /// Sign arbitrary claims JSON with the primary private key and a custom header.
    fn sign_raw(header: &Header, claims: &serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(testing::PRIMARY_PRIVATE_PEM.as_bytes()).unwrap();
        encode(header, claims, &key).unwrap()
    }

    fn rs256_header(kid: Option<&str>) -> Header {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(ToString::to_string);
        header
    }

    fn flip_byte(token: &str, segment: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(ToString::to_string).collect();
        let target = parts.get_mut(segment).unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(target.as_bytes()).unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0x01;
        *target = URL_SAFE_NO_PAD.encode(bytes);
        parts.join(".")
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_new_with_resolvable_key() {
        let context = primary_context().await;
        assert_eq!(context.active_key_id(), PRIMARY_KEY_ID);
        assert_eq!(context.algorithm(), Algorithm::RS256);
        assert_eq!(context.clock_skew(), DEFAULT_CLOCK_SKEW);
    }

    #[tokio::test]
    async fn test_new_with_unknown_key_fails() {
        let result = AuthenticationContext::new("no-such-key", testing::key_store()).await;
        assert!(matches!(result, Err(AuthError::KeyNotFound)));
    }

    #[tokio::test]
    async fn test_new_with_verify_only_key_fails() {
        let store = InMemoryKeyStore::new();
        store
            .insert_rsa_public_pem("verify-only", testing::PRIMARY_PUBLIC_PEM.as_bytes())
            .unwrap();

        let result = AuthenticationContext::new("verify-only", Arc::new(store)).await;
        assert!(matches!(result, Err(AuthError::KeyNotFound)));
    }

    #[tokio::test]
    async fn test_clock_skew_is_clamped() {
        let context = primary_context()
            .await
            .with_clock_skew(Duration::from_secs(3600));
        assert_eq!(context.clock_skew(), MAX_CLOCK_SKEW);
    }

    // -------------------------------------------------------------------------
    // Issuance
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_token_header() {
        let context = primary_context().await;
        let token = context.generate_token(&sample_claims()).await.unwrap();

        assert_eq!(token.split('.').count(), 3);
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some(PRIMARY_KEY_ID));
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[tokio::test]
    async fn test_generate_token_after_key_revoked() {
        let store = Arc::new(testing::in_memory_key_store());
        let context = AuthenticationContext::new(PRIMARY_KEY_ID, store.clone())
            .await
            .unwrap();

        store.retire(PRIMARY_KEY_ID).unwrap();

        let result = context.generate_token(&sample_claims()).await;
        assert!(matches!(result, Err(AuthError::KeyNotFound)));
    }

    // -------------------------------------------------------------------------
    // Round trip
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_round_trip_preserves_all_claims() {
        let context = primary_context().await;
        let claims = sample_claims();

        let token = context.generate_token(&claims).await.unwrap();
        let verified = context.read_claims_from_token(&token).await.unwrap();

        assert_eq!(verified, claims);
        assert_eq!(verified.roles, vec!["USER", "AUDITOR"]);
    }

    #[tokio::test]
    async fn test_round_trip_minimal_claims() {
        let context = primary_context().await;
        let claims = Claims {
            iss: None,
            sub: "svc".to_string(),
            aud: None,
            exp: Utc::now().timestamp() + 600,
            nbf: None,
            iat: None,
            jti: None,
            roles: vec![],
        };

        let token = context.generate_token(&claims).await.unwrap();
        assert_eq!(context.read_claims_from_token(&token).await.unwrap(), claims);
    }

    // -------------------------------------------------------------------------
    // Tamper detection
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_tampered_payload_rejected() {
        let context = primary_context().await;
        let token = context.generate_token(&sample_claims()).await.unwrap();

        let err = context
            .read_claims_from_token(&flip_byte(&token, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenAuthority(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_tampered_signature_rejected() {
        let context = primary_context().await;
        let token = context.generate_token(&sample_claims()).await.unwrap();

        let err = context
            .read_claims_from_token(&flip_byte(&token, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::TokenAuthority(RejectReason::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn test_signature_from_other_key_rejected() {
        // Signed by the untrusted key but claiming the primary kid
        let key = EncodingKey::from_rsa_pem(testing::UNTRUSTED_PRIVATE_PEM.as_bytes()).unwrap();
        let token = encode(&rs256_header(Some(PRIMARY_KEY_ID)), &sample_claims(), &key).unwrap();

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::TokenAuthority(RejectReason::InvalidSignature)
        ));
    }

    // -------------------------------------------------------------------------
    // Algorithm pinning
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_hs256_token_rejected() {
        // Classic confusion attack: HMAC keyed with the public key bytes
        let key = EncodingKey::from_secret(testing::PRIMARY_PUBLIC_PEM.as_bytes());
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(PRIMARY_KEY_ID.to_string());
        let token = encode(&header, &sample_claims(), &key).unwrap();

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::TokenAuthority(RejectReason::UnexpectedAlgorithm)
        ));
    }

    #[tokio::test]
    async fn test_rs512_token_rejected_even_if_validly_signed() {
        let key = EncodingKey::from_rsa_pem(testing::PRIMARY_PRIVATE_PEM.as_bytes()).unwrap();
        let mut header = Header::new(Algorithm::RS512);
        header.kid = Some(PRIMARY_KEY_ID.to_string());
        let token = encode(&header, &sample_claims(), &key).unwrap();

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::UnexpectedAlgorithm));
    }

    #[tokio::test]
    async fn test_alg_none_rejected_before_kid_lookup() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"user-42","exp":9999999999}"#);
        let token = format!("{header}.{payload}.");

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        // No kid at all, yet the algorithm check wins because it runs first
        assert_eq!(err.reject_reason(), Some(RejectReason::UnexpectedAlgorithm));
    }

    // -------------------------------------------------------------------------
    // Key resolution
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_missing_kid() {
        let token = sign_raw(&rs256_header(None), &serde_json::to_value(sample_claims()).unwrap());

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::KidNotFound));
    }

    #[tokio::test]
    async fn test_non_string_kid() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT","kid":42}"#);
        let valid = primary_context()
            .await
            .generate_token(&sample_claims())
            .await
            .unwrap();
        let rest = valid.split_once('.').unwrap().1;
        let token = format!("{header}.{rest}");

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::KidInvalidType));
    }

    #[tokio::test]
    async fn test_empty_kid_is_resolved_by_key_store() {
        let token = sign_raw(
            &rs256_header(Some("")),
            &serde_json::to_value(sample_claims()).unwrap(),
        );

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(err.is_untrusted_token());
        match err {
            AuthError::KeyStore(KeyStoreError::UnknownKey(kid)) => assert!(kid.is_empty()),
            other => panic!("expected KeyStore(UnknownKey), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_kid_surfaces_key_store_error() {
        let token = sign_raw(
            &rs256_header(Some("retired-long-ago")),
            &serde_json::to_value(sample_claims()).unwrap(),
        );

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        match err {
            AuthError::KeyStore(KeyStoreError::UnknownKey(kid)) => {
                assert_eq!(kid, "retired-long-ago");
            }
            other => panic!("expected KeyStore(UnknownKey), got {other:?}"),
        }
    }

    // -------------------------------------------------------------------------
    // Temporal validation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "user-42",
            "exp": now - 3600,
            "iat": now - 7200,
            "roles": ["USER"],
        });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::TokenAuthority(RejectReason::Expired)
        ));
        assert_eq!(err.to_string(), "token authority cannot be confirmed");
    }

    #[tokio::test]
    async fn test_expired_seconds_ago_rejected() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({ "sub": "user-42", "exp": now - 5 });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        // Clock skew covers iat only; it never extends a token's lifetime.
        let err = primary_context()
            .await
            .with_clock_skew(Duration::from_secs(600))
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::TokenAuthority(RejectReason::Expired)
        ));
    }

    #[tokio::test]
    async fn test_not_before_seconds_ahead_rejected() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "user-42",
            "exp": now + 3600,
            "nbf": now + 5,
        });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::NotYetValid));
    }

    #[tokio::test]
    async fn test_not_yet_valid_rejected() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "user-42",
            "exp": now + 7200,
            "nbf": now + 3600,
        });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::NotYetValid));
    }

    #[tokio::test]
    async fn test_iat_in_future_rejected() {
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "user-42",
            "exp": now + 7200,
            "iat": now + 3600,
        });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::IssuedInFuture));
    }

    #[tokio::test]
    async fn test_missing_exp_rejected() {
        let claims = serde_json::json!({ "sub": "user-42", "roles": ["ADMIN"] });
        let token = sign_raw(&rs256_header(Some(PRIMARY_KEY_ID)), &claims);

        let err = primary_context()
            .await
            .read_claims_from_token(&token)
            .await
            .unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::InvalidClaims));
    }

    // -------------------------------------------------------------------------
    // Malformed input
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_garbage_and_oversized_tokens() {
        let context = primary_context().await;

        let err = context.read_claims_from_token("garbage").await.unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::Malformed));

        let oversized = "a".repeat(crate::jwt::MAX_JWT_SIZE_BYTES + 1);
        let err = context.read_claims_from_token(&oversized).await.unwrap_err();
        assert_eq!(err.reject_reason(), Some(RejectReason::TokenTooLarge));
    }

    // -------------------------------------------------------------------------
    // Rotation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_rotation_keeps_old_tokens_verifiable() {
        let store = Arc::new(testing::in_memory_key_store());
        let old_context = AuthenticationContext::new(PRIMARY_KEY_ID, store.clone())
            .await
            .unwrap();
        let old_token = old_context.generate_token(&sample_claims()).await.unwrap();

        // Rotate: new active key, old key retired to verify-only
        let new_context = AuthenticationContext::new(SECONDARY_KEY_ID, store.clone())
            .await
            .unwrap();
        store.retire(PRIMARY_KEY_ID).unwrap();

        let new_token = new_context.generate_token(&sample_claims()).await.unwrap();
        assert_eq!(
            jsonwebtoken::decode_header(&new_token).unwrap().kid.as_deref(),
            Some(SECONDARY_KEY_ID)
        );

        // Both contexts verify both tokens; verification follows the token's kid
        for context in [&old_context, &new_context] {
            assert!(context.read_claims_from_token(&old_token).await.is_ok());
            assert!(context.read_claims_from_token(&new_token).await.is_ok());
        }

        // Deleting the old key is what finally invalidates its tokens
        store.remove(PRIMARY_KEY_ID).unwrap();
        let err = new_context
            .read_claims_from_token(&old_token)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::KeyStore(KeyStoreError::UnknownKey(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_use() {
        let context = Arc::new(primary_context().await);
        let mut handles = Vec::new();

        for i in 0..16 {
            let context = Arc::clone(&context);
            handles.push(tokio::spawn(async move {
                let claims = Claims::issue(
                    format!("user-{i}"),
                    vec!["USER".to_string()],
                    Utc::now(),
                    chrono::Duration::minutes(5),
                );
                let token = context.generate_token(&claims).await.unwrap();
                let verified = context.read_claims_from_token(&token).await.unwrap();
                assert_eq!(verified, claims);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
