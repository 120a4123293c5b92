//! Authentication middleware for protected routes.
//!
//! Every request gets a [`RequestScope`] from `assign_request_scope`.
//! `require_auth` then verifies the Bearer token and replaces that scope with
//! one carrying the verified claims. Handlers read the scope from request
//! extensions and authorize against it.

use crate::errors::WsError;
use crate::observability::metrics::record_token_validation;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::{AuthError, AuthenticationContext, KeyStoreError, RequestScope};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Token verifier bound to the key store.
    pub auth: Arc<AuthenticationContext>,
}

/// Attach a fresh, unauthenticated [`RequestScope`] to the request.
pub async fn assign_request_scope(mut req: Request, next: Next) -> Response {
    if req.extensions().get::<RequestScope>().is_none() {
        let scope = RequestScope::start();
        tracing::trace!(target: "ws.middleware.scope", trace_id = %scope.trace_id(), "Request scope assigned");
        req.extensions_mut().insert(scope);
    }
    next.run(req).await
}

/// Extract Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, WsError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "ws.middleware.auth", "Missing Authorization header");
            WsError::InvalidToken("Missing Authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "ws.middleware.auth", "Invalid Authorization header format");
        WsError::InvalidToken("Invalid Authorization header format".to_string())
    })
}

/// Metrics label for a failed verification.
fn rejection_label(err: &AuthError) -> &'static str {
    match err {
        AuthError::TokenAuthority(reason) => reason.as_str(),
        AuthError::KidNotFound => "kid_not_found",
        AuthError::KidInvalidType => "kid_invalid_type",
        AuthError::KeyStore(KeyStoreError::UnknownKey(_)) => "unknown_key",
        AuthError::KeyStore(_) => "key_store_error",
        _ => "internal",
    }
}

/// Authentication middleware.
///
/// # Response
///
/// - Returns 401 Unauthorized if token is missing or invalid
/// - Returns 500 if the key store cannot be read
/// - Continues to next handler with an authenticated `RequestScope` in
///   extensions if token is valid
#[instrument(skip_all, name = "ws.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, WsError> {
    let token = extract_bearer_token(&req)?;

    let claims = match state.auth.read_claims_from_token(token).await {
        Ok(claims) => claims,
        Err(err) => {
            let label = rejection_label(&err);
            record_token_validation("rejected", label);
            tracing::debug!(target: "ws.middleware.auth", reason = label, "Token rejected");
            return Err(WsError::from(err));
        }
    };
    record_token_validation("accepted", "none");

    let scope = req
        .extensions()
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_else(RequestScope::start)
        .attach_claims(claims);
    req.extensions_mut().insert(scope);

    Ok(next.run(req).await)
}
