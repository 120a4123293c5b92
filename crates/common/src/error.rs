//! Error types for the authentication core.

use crate::key_store::KeyStoreError;
use thiserror::Error;

/// Internal reason a presented token failed the authority check.
///
/// Never shown to clients. Used for debug logging and as a metrics label so
/// operators can tell an expiry spike from a forged-signature spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Larger than the configured size bound.
    TokenTooLarge,
    /// Not a parseable compact JWT.
    Malformed,
    /// Header declares an algorithm other than the pinned one.
    UnexpectedAlgorithm,
    /// Signature does not verify against the resolved public key.
    InvalidSignature,
    /// `exp` is in the past.
    Expired,
    /// `nbf` is in the future.
    NotYetValid,
    /// `iat` is further in the future than the clock skew allows.
    IssuedInFuture,
    /// Payload decoded but does not have the expected claim shape.
    InvalidClaims,
}

impl RejectReason {
    /// Stable snake_case label for logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TokenTooLarge => "token_too_large",
            Self::Malformed => "malformed",
            Self::UnexpectedAlgorithm => "unexpected_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::IssuedInFuture => "issued_in_future",
            Self::InvalidClaims => "invalid_claims",
        }
    }
}

/// Errors raised by token issuance, verification and request-scope access.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The active signing key does not resolve in the key store.
    #[error("active signing key not found in key store")]
    KeyNotFound,

    /// The fixed signing algorithm is not supported by the JWT runtime.
    #[error("signing method not found")]
    SigningMethodNotFound,

    /// Token header carries no `kid`.
    #[error("kid header not found in token")]
    KidNotFound,

    /// Token header carries a `kid` that is not a string.
    #[error("kid header value must be a string")]
    KidInvalidType,

    /// Signature, temporal or shape validation failed.
    ///
    /// The message is the same for every reason; use
    /// [`AuthError::reject_reason`] for the internal cause.
    #[error("token authority cannot be confirmed")]
    TokenAuthority(RejectReason),

    /// The key store failed to resolve the token's `kid`.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// The signing operation itself failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Claims were requested from a request scope nobody authenticated.
    #[error("user claims missing from request scope")]
    ClaimsMissing,
}

impl AuthError {
    /// The internal reason code for a `TokenAuthority` failure.
    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::TokenAuthority(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Whether this error means the presented token must be rejected, as
    /// opposed to a server-side fault.
    #[must_use]
    pub fn is_untrusted_token(&self) -> bool {
        matches!(
            self,
            Self::KidNotFound
                | Self::KidInvalidType
                | Self::TokenAuthority(_)
                | Self::KeyStore(KeyStoreError::UnknownKey(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_authority_message_is_generic() {
        let reasons = [
            RejectReason::TokenTooLarge,
            RejectReason::Malformed,
            RejectReason::UnexpectedAlgorithm,
            RejectReason::InvalidSignature,
            RejectReason::Expired,
            RejectReason::NotYetValid,
            RejectReason::IssuedInFuture,
            RejectReason::InvalidClaims,
        ];

        for reason in reasons {
            let err = AuthError::TokenAuthority(reason);
            assert_eq!(err.to_string(), "token authority cannot be confirmed");
            assert!(!err.to_string().contains(reason.as_str()));
            assert_eq!(err.reject_reason(), Some(reason));
        }
    }

    #[test]
    fn test_key_store_error_is_transparent() {
        let err: AuthError = KeyStoreError::UnknownKey("k9".to_string()).into();
        assert_eq!(err.to_string(), r#"key "k9" is unknown to the key store"#);
        assert_eq!(err.reject_reason(), None);
    }

    #[test]
    fn test_is_untrusted_token() {
        assert!(AuthError::KidNotFound.is_untrusted_token());
        assert!(AuthError::KidInvalidType.is_untrusted_token());
        assert!(AuthError::TokenAuthority(RejectReason::Expired).is_untrusted_token());
        assert!(AuthError::from(KeyStoreError::UnknownKey("k".into())).is_untrusted_token());

        assert!(!AuthError::KeyNotFound.is_untrusted_token());
        assert!(!AuthError::ClaimsMissing.is_untrusted_token());
        assert!(
            !AuthError::from(KeyStoreError::Unavailable("down".into())).is_untrusted_token()
        );
    }
}
